//! Bidirectional, template-driven mapping engine
//!
//! This module implements the core transformation functionality: a
//! specification (flat path pairs or a nested template) normalizes into an
//! ordered directive list, the forward engine applies it over a data
//! accessor, and the reverse engine derives the back-mapping from the same
//! specification by inverting the directives.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

pub mod directive;
pub mod engine;
pub mod hooks;
pub mod invert;
pub mod normalizer;
pub mod transforms;

pub use directive::{Directive, SourceExpression};
pub use engine::Mapper;
pub use hooks::{HookContext, HookOutcome, HookSet, HookSetBuilder, HookStage};
pub use invert::invert as invert_directives;
pub use normalizer::{normalize, pairs_from_object, MappingSpec};
pub use transforms::Transform;

use crate::accessor::DataAccessor;
use crate::Result;
use serde_json::Value;

/// Map a source forward through a specification with the default engine
/// (`auto` mode, skip-null, no hooks).
///
/// # Example
///
/// ```
/// use datamorph_core::{map, DataAccessor, MappingSpec};
/// use serde_json::json;
///
/// # fn main() -> datamorph_core::Result<()> {
/// let source = DataAccessor::from_json(r#"{"user": {"name": "Ada"}}"#)?;
/// let spec = MappingSpec::pairs([("profile.name", "user.name")]);
/// let result = map(&spec, &source, json!({}))?;
/// assert_eq!(result, json!({"profile": {"name": "Ada"}}));
/// # Ok(())
/// # }
/// ```
pub fn map(spec: &MappingSpec, source: &DataAccessor, target: Value) -> Result<Value> {
    Mapper::new().apply(spec, source, target)
}

/// Map backwards: invert the specification's directives and run the
/// forward engine, so the caller's data takes the role the specification
/// assigned to the target.
pub fn map_reverse(spec: &MappingSpec, source: &DataAccessor, target: Value) -> Result<Value> {
    Mapper::new().apply_reverse(spec, source, target)
}
