//! Input kinds for the data accessor
//!
//! Strict text parsing lives here: malformed JSON at a construction boundary
//! surfaces a Parse error, while the lenient entry point in the accessor
//! degrades to an empty container. Property-bearing host objects are adapted
//! through the narrow `FieldSource` trait instead of eager flattening.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Detected format of the root value wrapped by an accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    /// Native in-memory container
    Native,
    /// Parsed from JSON text
    Json,
    /// Parsed from XML text
    Xml,
}

/// Read-named-field adapter for property-bearing host objects.
///
/// Implementors expose their fields on demand; the accessor materializes
/// them into an ordered mapping at construction. Nested structure is
/// whatever `read_field` returns.
pub trait FieldSource {
    /// Field names in source order
    fn field_names(&self) -> Vec<String>;

    /// Read one named field, or `None` when the field is absent
    fn read_field(&self, name: &str) -> Option<Value>;
}

/// Parse JSON text at a strict construction boundary.
pub(crate) fn from_json_text(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|err| Error::Parse {
        format: "JSON".to_string(),
        message: err.to_string(),
        source: Some(anyhow::Error::new(err)),
    })
}

/// Guess the text format from its first non-whitespace byte.
pub(crate) fn detect_format(text: &str) -> InputFormat {
    if text.trim_start().starts_with('<') {
        InputFormat::Xml
    } else {
        InputFormat::Json
    }
}
