//! Normalized mapping directives
//!
//! A directive pairs one target path with one source expression and an
//! optional transform chain. Directive lists keep declaration order; the
//! engines never reorder them.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

use super::transforms::Transform;
use crate::path::Path;
use crate::{Error, Result};
use serde_json::Value;
use std::sync::Arc;

/// Source side of a directive: a constant or a single path reference
#[derive(Debug, Clone, PartialEq)]
pub enum SourceExpression {
    /// A literal constant written as-is
    Literal(Value),
    /// A single source-path reference, resolved through the accessor
    Reference(Arc<Path>),
}

/// One normalized mapping directive
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub target: Arc<Path>,
    pub source: SourceExpression,
    pub transforms: Vec<Transform>,
}

impl Directive {
    /// Source pattern text for hook contexts (empty for literals).
    pub fn source_pattern(&self) -> String {
        match &self.source {
            SourceExpression::Literal(_) => String::new(),
            SourceExpression::Reference(path) => path.to_string(),
        }
    }

    /// Whether the directive can participate in inversion.
    pub fn is_invertible(&self) -> bool {
        matches!(self.source, SourceExpression::Reference(_))
    }

    /// Enforce the wildcard-arity invariant: the target consumes exactly
    /// the keys/indices the source enumeration captures, so the counts
    /// must match. This replaces silent truncation with an explicit error.
    pub fn validate_arity(&self) -> Result<()> {
        let target_count = self.target.wildcard_count();
        let source_count = match &self.source {
            SourceExpression::Literal(_) => 0,
            SourceExpression::Reference(path) => path.wildcard_count(),
        };
        if target_count != source_count {
            return Err(Error::InvariantViolation {
                message: format!(
                    "wildcard count mismatch: target '{}' has {}, source '{}' has {}",
                    self.target,
                    target_count,
                    self.source_pattern(),
                    source_count
                ),
            });
        }
        Ok(())
    }
}
