//! Directive inversion for reverse mapping
//!
//! Reverse mapping derives a back-mapping from the same specification:
//! every directive exchanges its source and target roles, and the forward
//! engine re-runs the inverted list. Only single-path-reference directives
//! are invertible; literals fail fast.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

use super::directive::{Directive, SourceExpression};
use crate::{Error, Result};

/// Invert a directive list by swapping source and target roles.
///
/// Transform chains are carried over unchanged; round-trip closure is only
/// guaranteed for transform-free directives. A directive whose source is a
/// literal constant has no source path to write back to and fails fast.
pub fn invert(directives: &[Directive]) -> Result<Vec<Directive>> {
    directives
        .iter()
        .map(|directive| match &directive.source {
            SourceExpression::Literal(_) => Err(Error::InvariantViolation {
                message: format!(
                    "directive targeting '{}' has a literal source and cannot be inverted",
                    directive.target
                ),
            }),
            SourceExpression::Reference(path) => {
                let inverted = Directive {
                    target: path.clone(),
                    source: SourceExpression::Reference(directive.target.clone()),
                    transforms: directive.transforms.clone(),
                };
                inverted.validate_arity()?;
                Ok(inverted)
            }
        })
        .collect()
}
