//! Named value transforms
//!
//! Transforms are the pipe-chained names in an embedded expression
//! (`{{ user.name | trim | upper }}`). They run before any hook and are
//! best-effort: non-string values pass through unchanged.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named, order-sensitive value transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// Strip leading/trailing whitespace
    Trim,
    /// Uppercase the whole string
    Upper,
    /// Lowercase the whole string
    Lower,
    /// Uppercase the first character, lowercase the rest
    Capitalize,
}

impl Transform {
    /// Resolve a transform by its specification name.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "trim" => Ok(Transform::Trim),
            "upper" => Ok(Transform::Upper),
            "lower" => Ok(Transform::Lower),
            "capitalize" => Ok(Transform::Capitalize),
            other => Err(Error::Spec {
                message: format!("unknown transform '{other}'"),
                context: Some("expected one of: trim, upper, lower, capitalize".to_string()),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::Trim => "trim",
            Transform::Upper => "upper",
            Transform::Lower => "lower",
            Transform::Capitalize => "capitalize",
        }
    }

    /// Apply to one value. Non-strings pass through unchanged.
    pub fn apply(&self, value: &Value) -> Value {
        let Value::String(text) = value else {
            return value.clone();
        };
        let transformed = match self {
            Transform::Trim => text.trim().to_string(),
            Transform::Upper => text.to_uppercase(),
            Transform::Lower => text.to_lowercase(),
            Transform::Capitalize => {
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            }
        };
        Value::String(transformed)
    }
}

/// Apply a transform chain in order.
pub fn apply_chain(transforms: &[Transform], value: Value) -> Value {
    transforms
        .iter()
        .fold(value, |current, transform| transform.apply(&current))
}
