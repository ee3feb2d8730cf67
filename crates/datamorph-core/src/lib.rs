//! Datamorph Core - dot-path addressing and bidirectional document mapping
//!
//! This crate reads and writes values in nested, loosely-typed data (native
//! containers, JSON text, XML text, or adapted host objects) by
//! dot-delimited address, and transforms whole documents between shapes
//! using a declarative mapping specification that supports wildcard
//! addresses and is mechanically invertible.
//!
//! # Main Components
//!
//! - **Path Resolver**: parsed, memoized dot-paths (`path`)
//! - **Data Accessor**: uniform reads over heterogeneous roots (`accessor`)
//! - **Mapping Engine**: normalization, forward transform, hook pipeline,
//!   and inversion (`mapping`)
//! - **Output Selection**: native/JSON/XML/original re-encoding (`output`)
//!
//! # Example
//!
//! ```
//! use datamorph_core::{DataAccessor, Mapper, MappingSpec};
//! use serde_json::json;
//!
//! # fn main() -> datamorph_core::Result<()> {
//! let source = DataAccessor::from_json(r#"{"users": [{"name": "Ada"}, {"name": "Grace"}]}"#)?;
//! let spec = MappingSpec::pairs([("people.*.label", "users.*.name")]);
//!
//! let result = Mapper::new().apply(&spec, &source, json!({}))?;
//! assert_eq!(result, json!({"people": [{"label": "Ada"}, {"label": "Grace"}]}));
//! # Ok(())
//! # }
//! ```

pub mod accessor;
pub mod error;
pub mod mapping;
pub mod output;
pub mod path;

// Re-export main types for convenience
pub use accessor::{DataAccessor, FieldSource, InputFormat};
pub use error::{Error, Result};
pub use mapping::{
    invert_directives, map, map_reverse, normalize, pairs_from_object, Directive, HookContext,
    HookOutcome, HookSet, HookSetBuilder, HookStage, Mapper, MappingSpec, SourceExpression,
    Transform,
};
pub use output::{render, OutputFormat, Rendered};
pub use path::{Path, Segment};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
