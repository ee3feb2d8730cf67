//! Uniform read model over heterogeneous roots
//!
//! A `DataAccessor` wraps one root value, immutably, for its lifetime and
//! resolves dot-paths against it. Text-encoded roots are normalized into the
//! value tree once, at construction; wildcard paths expand depth-first in
//! source iteration order.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

pub mod input;
pub(crate) mod structure;
pub(crate) mod xml;

pub use input::{FieldSource, InputFormat};

use crate::path::{Path, Segment};
use crate::Result;
use serde_json::{Map, Value};

/// Read-only, normalized view of one root value
#[derive(Debug, Clone)]
pub struct DataAccessor {
    root: Value,
    format: InputFormat,
}

/// One concrete expansion of a wildcard path: the fully concretized path
/// text, the key/index chosen at each wildcard position, and the value.
#[derive(Debug, Clone)]
pub(crate) struct WildcardMatch {
    pub concrete_path: String,
    pub captures: Vec<Segment>,
    pub value: Value,
}

impl DataAccessor {
    /// Wrap a native container value.
    pub fn from_value(root: Value) -> Self {
        Self {
            root,
            format: InputFormat::Native,
        }
    }

    /// Parse JSON text. Malformed text fails here, at the strict
    /// construction boundary.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self {
            root: input::from_json_text(text)?,
            format: InputFormat::Json,
        })
    }

    /// Parse XML text. Malformed text fails here, at the strict
    /// construction boundary.
    pub fn from_xml(text: &str) -> Result<Self> {
        Ok(Self {
            root: xml::from_xml_text(text)?,
            format: InputFormat::Xml,
        })
    }

    /// Adapt a property-bearing host object through its `FieldSource`
    /// implementation.
    pub fn from_source(source: &dyn FieldSource) -> Self {
        let mut map = Map::new();
        for name in source.field_names() {
            if let Some(value) = source.read_field(&name) {
                map.insert(name, value);
            }
        }
        Self {
            root: Value::Object(map),
            format: InputFormat::Native,
        }
    }

    /// Loose text entry point: malformed input degrades to an empty
    /// container, so every subsequent read behaves as "missing".
    pub fn lenient(text: &str) -> Self {
        let format = input::detect_format(text);
        let root = match format {
            InputFormat::Xml => xml::from_xml_text(text),
            _ => input::from_json_text(text),
        }
        .unwrap_or_else(|err| {
            log::warn!("lenient accessor degraded to empty: {err}");
            Value::Object(Map::new())
        });
        Self { root, format }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Format detected at construction, used by the `Original` output
    /// selector.
    pub fn input_format(&self) -> InputFormat {
        self.format
    }

    /// Resolve a path to a single value.
    ///
    /// Wildcard-free paths traverse segment by segment and yield `None` on
    /// any missing key, out-of-range index, or type mismatch. A wildcard
    /// path yields its expansion as a mapping keyed by concrete path text
    /// (`None` when nothing matches).
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        let parsed = Path::parse(path)?;
        if parsed.has_wildcard() {
            let expanded = self.expand(&parsed);
            if expanded.is_empty() {
                return Ok(None);
            }
            let mut map = Map::new();
            for matched in expanded {
                map.insert(matched.concrete_path, matched.value);
            }
            return Ok(Some(Value::Object(map)));
        }
        Ok(self.resolve(&parsed).cloned())
    }

    /// `get` with a default for the missing/mismatch case.
    pub fn get_or(&self, path: &str, default: Value) -> Result<Value> {
        Ok(self.get(path)?.unwrap_or(default))
    }

    /// Expand a (typically wildcard) path into an ordered mapping from
    /// fully concretized path text to value, in source iteration order.
    pub fn get_all(&self, path: &str) -> Result<Map<String, Value>> {
        let parsed = Path::parse(path)?;
        let mut map = Map::new();
        for matched in self.expand(&parsed) {
            map.insert(matched.concrete_path, matched.value);
        }
        Ok(map)
    }

    /// Best-effort string read with default fallback.
    pub fn get_string(&self, path: &str, default: &str) -> Result<String> {
        Ok(match self.get(path)? {
            Some(Value::String(text)) => text,
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            _ => default.to_string(),
        })
    }

    /// Best-effort integer read with default fallback.
    pub fn get_int(&self, path: &str, default: i64) -> Result<i64> {
        Ok(match self.get(path)? {
            Some(Value::Number(number)) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            Some(Value::String(text)) => text.trim().parse().unwrap_or(default),
            Some(Value::Bool(flag)) => i64::from(flag),
            _ => default,
        })
    }

    /// Best-effort float read with default fallback.
    pub fn get_float(&self, path: &str, default: f64) -> Result<f64> {
        Ok(match self.get(path)? {
            Some(Value::Number(number)) => number.as_f64().unwrap_or(default),
            Some(Value::String(text)) => text.trim().parse().unwrap_or(default),
            Some(Value::Bool(flag)) => {
                if flag {
                    1.0
                } else {
                    0.0
                }
            }
            _ => default,
        })
    }

    /// Best-effort boolean read with default fallback.
    pub fn get_bool(&self, path: &str, default: bool) -> Result<bool> {
        Ok(match self.get(path)? {
            Some(Value::Bool(flag)) => flag,
            Some(Value::String(text)) => match text.to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => true,
                "false" | "no" | "0" | "off" => false,
                _ => default,
            },
            Some(Value::Number(number)) => number.as_f64().map(|f| f != 0.0).unwrap_or(default),
            _ => default,
        })
    }

    /// Sequence read; missing or non-sequence values yield an empty vec.
    pub fn get_array(&self, path: &str) -> Result<Vec<Value>> {
        Ok(match self.get(path)? {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        })
    }

    /// Flat diagnostic structure map (dotted path → coarse type tag).
    pub fn get_structure(&self) -> Map<String, Value> {
        structure::flat_structure(&self.root)
    }

    /// Nested diagnostic structure mirroring the tree shape.
    pub fn get_structure_deep(&self) -> Value {
        structure::deep_structure(&self.root)
    }

    /// Wildcard-free traversal. `None` on missing key, out-of-range index,
    /// or type mismatch.
    pub(crate) fn resolve(&self, path: &Path) -> Option<&Value> {
        let mut node = &self.root;
        for segment in path.segments() {
            node = match (segment, node) {
                (Segment::Key(key), Value::Object(map)) => map.get(key)?,
                (Segment::Index(idx), Value::Array(items)) => items.get(*idx)?,
                (Segment::Index(idx), Value::Object(map)) => map.get(&idx.to_string())?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Depth-first wildcard expansion in source iteration order.
    pub(crate) fn expand(&self, path: &Path) -> Vec<WildcardMatch> {
        let mut out = Vec::new();
        expand_into(&self.root, path.segments(), String::new(), Vec::new(), &mut out);
        out
    }
}

fn expand_into(
    node: &Value,
    segments: &[Segment],
    prefix: String,
    captures: Vec<Segment>,
    out: &mut Vec<WildcardMatch>,
) {
    let Some((head, rest)) = segments.split_first() else {
        out.push(WildcardMatch {
            concrete_path: prefix,
            captures,
            value: node.clone(),
        });
        return;
    };

    match head {
        Segment::Key(key) => {
            if let Value::Object(map) = node {
                if let Some(child) = map.get(key) {
                    expand_into(child, rest, join(&prefix, key), captures, out);
                }
            }
        }
        Segment::Index(idx) => match node {
            Value::Array(items) => {
                if let Some(child) = items.get(*idx) {
                    expand_into(child, rest, join(&prefix, idx), captures, out);
                }
            }
            Value::Object(map) => {
                if let Some(child) = map.get(&idx.to_string()) {
                    expand_into(child, rest, join(&prefix, idx), captures, out);
                }
            }
            _ => {}
        },
        Segment::Wildcard => match node {
            Value::Object(map) => {
                for (key, child) in map {
                    let mut caps = captures.clone();
                    caps.push(Segment::Key(key.clone()));
                    expand_into(child, rest, join(&prefix, key), caps, out);
                }
            }
            Value::Array(items) => {
                for (idx, child) in items.iter().enumerate() {
                    let mut caps = captures.clone();
                    caps.push(Segment::Index(idx));
                    expand_into(child, rest, join(&prefix, idx), caps, out);
                }
            }
            _ => {}
        },
    }
}

fn join(prefix: &str, segment: impl std::fmt::Display) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}
