//! Diagnostic structure introspection
//!
//! Coarse type maps over a value tree, for inspection and debugging only.
//! The mapping engine never consumes these.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

use serde_json::{Map, Value};

/// Coarse type tag for one value
pub(crate) fn type_tag(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(number) => {
            if number.is_f64() {
                "float"
            } else {
                "int"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Flatten a value tree into dotted-path → type-tag entries.
///
/// Sequences contribute a single `<path>.*` entry whose tag is the
/// `|`-joined union of the element tags when they are heterogeneous.
pub(crate) fn flat_structure(root: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    walk_flat(root, String::new(), &mut out);
    out
}

fn walk_flat(node: &Value, prefix: String, out: &mut Map<String, Value>) {
    match node {
        Value::Object(map) => {
            if map.is_empty() && !prefix.is_empty() {
                out.insert(prefix, Value::String("object".to_string()));
                return;
            }
            for (key, child) in map {
                let child_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                walk_flat(child, child_prefix, out);
            }
        }
        Value::Array(items) => {
            let key = if prefix.is_empty() {
                "*".to_string()
            } else {
                format!("{prefix}.*")
            };
            out.insert(key, Value::String(union_tag(items)));
        }
        other => {
            out.insert(prefix, Value::String(type_tag(other).to_string()));
        }
    }
}

fn union_tag(items: &[Value]) -> String {
    let mut seen: Vec<&'static str> = Vec::new();
    for item in items {
        let tag = type_tag(item);
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    if seen.is_empty() {
        "array".to_string()
    } else {
        seen.join("|")
    }
}

/// Mirror the value tree, replacing every leaf with its type tag.
pub(crate) fn deep_structure(node: &Value) -> Value {
    match node {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| (key.clone(), deep_structure(child)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(deep_structure).collect()),
        other => Value::String(type_tag(other).to_string()),
    }
}
