//! Output format selection
//!
//! Mapping results are native value trees; this module re-encodes them for
//! callers that want text, including the `Original` selector which follows
//! the format detected when the source accessor was constructed.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

use crate::accessor::{xml, InputFormat};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Requested encoding for a mapping result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// The native container value, unencoded
    Native,
    /// JSON text
    Json,
    /// XML text
    Xml,
    /// Re-encode using the detected input format
    Original,
}

/// A rendered mapping result
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Value(Value),
    Text(String),
}

impl Rendered {
    /// The native value, when this result was not text-encoded.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Rendered::Value(value) => Some(value),
            Rendered::Text(_) => None,
        }
    }

    /// The encoded text, when this result was text-encoded.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Rendered::Value(_) => None,
            Rendered::Text(text) => Some(text),
        }
    }
}

/// Encode a value per the requested format. `detected` is the input format
/// recorded by the source accessor and only consulted for `Original`.
pub fn render(value: &Value, format: OutputFormat, detected: InputFormat) -> Result<Rendered> {
    match format {
        OutputFormat::Native => Ok(Rendered::Value(value.clone())),
        OutputFormat::Json => Ok(Rendered::Text(serde_json::to_string(value)?)),
        OutputFormat::Xml => Ok(Rendered::Text(xml::to_xml_text(value))),
        OutputFormat::Original => match detected {
            InputFormat::Native => Ok(Rendered::Value(value.clone())),
            InputFormat::Json => Ok(Rendered::Text(serde_json::to_string(value)?)),
            InputFormat::Xml => Ok(Rendered::Text(xml::to_xml_text(value))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_native() {
        let rendered = render(&json!({"a": 1}), OutputFormat::Native, InputFormat::Json).unwrap();
        assert_eq!(rendered, Rendered::Value(json!({"a": 1})));
    }

    #[test]
    fn test_render_json_text() {
        let rendered = render(&json!({"a": 1}), OutputFormat::Json, InputFormat::Native).unwrap();
        assert_eq!(rendered.as_text(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_render_xml_text() {
        let rendered =
            render(&json!({"user": {"name": "Ada"}}), OutputFormat::Xml, InputFormat::Native)
                .unwrap();
        assert_eq!(rendered.as_text(), Some("<user><name>Ada</name></user>"));
    }

    #[test]
    fn test_render_original_follows_detected() {
        let value = json!({"a": 1});
        let as_json = render(&value, OutputFormat::Original, InputFormat::Json).unwrap();
        assert_eq!(as_json.as_text(), Some(r#"{"a":1}"#));

        let as_native = render(&value, OutputFormat::Original, InputFormat::Native).unwrap();
        assert_eq!(as_native, Rendered::Value(value));
    }
}
