//! XML text conversion
//!
//! Reads XML into the ordered value tree (repeated sibling elements become
//! sequence entries, attributes become `@name` keys, text-only elements
//! become strings, mixed content keeps `#text`) and writes it back out with
//! the same conventions.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use roxmltree::{Document, Node};
use serde_json::{Map, Value};

/// Parse XML text at a strict construction boundary.
pub(crate) fn from_xml_text(text: &str) -> Result<Value> {
    let doc = Document::parse(text).map_err(|err| Error::Parse {
        format: "XML".to_string(),
        message: err.to_string(),
        source: Some(anyhow::Error::new(err)),
    })?;
    let root = doc.root_element();
    let mut map = Map::new();
    map.insert(root.tag_name().name().to_string(), element_to_value(root));
    Ok(Value::Object(map))
}

fn element_to_value(node: Node<'_, '_>) -> Value {
    let mut map = Map::new();

    for attr in node.attributes() {
        map.insert(
            format!("@{}", attr.name()),
            Value::String(attr.value().to_string()),
        );
    }

    let mut text_content = String::new();
    for child in node.children() {
        if child.is_element() {
            let key = child.tag_name().name().to_string();
            let child_value = element_to_value(child);
            match map.get_mut(&key) {
                Some(Value::Array(items)) => items.push(child_value),
                Some(existing) => {
                    let previous = existing.take();
                    *existing = Value::Array(vec![previous, child_value]);
                }
                None => {
                    map.insert(key, child_value);
                }
            }
        } else if child.is_text() {
            if let Some(text) = child.text() {
                text_content.push_str(text);
            }
        }
    }

    let trimmed = text_content.trim();
    if map.is_empty() {
        if trimmed.is_empty() {
            Value::Null
        } else {
            Value::String(trimmed.to_string())
        }
    } else {
        if !trimmed.is_empty() {
            map.insert("#text".to_string(), Value::String(trimmed.to_string()));
        }
        Value::Object(map)
    }
}

/// Encode a value tree as XML text, inverting the reader's conventions.
///
/// A single-key object at the root becomes the document element; anything
/// else is wrapped in `<root>`.
pub(crate) fn to_xml_text(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(map) if map.len() == 1 && !map.values().any(Value::is_array) => {
            if let Some((name, inner)) = map.iter().next() {
                write_element(name, inner, &mut out);
            }
        }
        // A sequence (or multi-key object) at the root needs a wrapping
        // document element to stay well-formed.
        Value::Array(items) => {
            out.push_str("<root>");
            for item in items {
                write_element("item", item, &mut out);
            }
            out.push_str("</root>");
        }
        other => write_element("root", other, &mut out),
    }
    out
}

fn write_element(name: &str, value: &Value, out: &mut String) {
    match value {
        // A sequence under a key repeats the element per entry.
        Value::Array(items) => {
            for item in items {
                write_element(name, item, out);
            }
        }
        Value::Object(map) => {
            out.push('<');
            out.push_str(name);
            for (key, attr_value) in map {
                if let Some(attr_name) = key.strip_prefix('@') {
                    out.push(' ');
                    out.push_str(attr_name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(&scalar_text(attr_value)));
                    out.push('"');
                }
            }
            let has_content = map.keys().any(|key| !key.starts_with('@'));
            if !has_content {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for (key, child) in map {
                if key == "#text" {
                    out.push_str(&escape_text(&scalar_text(child)));
                } else if !key.starts_with('@') {
                    write_element(key, child, out);
                }
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Value::Null => {
            out.push('<');
            out.push_str(name);
            out.push_str("/>");
        }
        scalar => {
            out.push('<');
            out.push_str(name);
            out.push('>');
            out.push_str(&escape_text(&scalar_text(scalar)));
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_only_element() {
        let value = from_xml_text("<user><name>Ada</name></user>").unwrap();
        assert_eq!(value, json!({"user": {"name": "Ada"}}));
    }

    #[test]
    fn test_repeated_siblings_become_sequence() {
        let value = from_xml_text(
            "<users><user>Ada</user><user>Grace</user><user>Edsger</user></users>",
        )
        .unwrap();
        assert_eq!(value, json!({"users": {"user": ["Ada", "Grace", "Edsger"]}}));
    }

    #[test]
    fn test_attributes_and_mixed_content() {
        let value = from_xml_text(r#"<note id="1">hello<to>Bob</to></note>"#).unwrap();
        assert_eq!(
            value,
            json!({"note": {"@id": "1", "to": "Bob", "#text": "hello"}})
        );
    }

    #[test]
    fn test_empty_element_is_null() {
        let value = from_xml_text("<a><b/></a>").unwrap();
        assert_eq!(value, json!({"a": {"b": null}}));
    }

    #[test]
    fn test_malformed_is_parse_error() {
        assert!(matches!(
            from_xml_text("<unclosed>"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_write_round_trip() {
        let original = "<users><user id=\"1\"><name>Ada</name></user><user id=\"2\"><name>Grace</name></user></users>";
        let value = from_xml_text(original).unwrap();
        let rendered = to_xml_text(&value);
        assert_eq!(from_xml_text(&rendered).unwrap(), value);
    }

    #[test]
    fn test_write_escapes_markup() {
        let rendered = to_xml_text(&json!({"msg": "a < b & c"}));
        assert_eq!(rendered, "<msg>a &lt; b &amp; c</msg>");
    }

    #[test]
    fn test_write_wraps_sequence_root() {
        let rendered = to_xml_text(&json!([1, 2]));
        assert_eq!(rendered, "<root><item>1</item><item>2</item></root>");
    }

    #[test]
    fn test_write_wraps_single_key_sequence_root() {
        let rendered = to_xml_text(&json!({"user": ["Ada", "Grace"]}));
        assert_eq!(
            rendered,
            "<root><user>Ada</user><user>Grace</user></root>"
        );
    }
}
