//! Dot-path segment parser
//!
//! Splits dot-delimited path text into typed segments with position-carrying
//! error reporting. Parsing is pure: identical input always yields identical
//! segments.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

use super::Segment;
use crate::{Error, Result};

/// Parse path text into segments.
///
/// The empty string parses to the empty (root) path. An empty segment from
/// adjacent delimiters, or a leading/trailing delimiter on non-empty input,
/// is a syntax error.
pub fn parse_segments(text: &str) -> Result<Vec<Segment>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();
    let mut position = 0usize;
    for part in text.split('.') {
        if part.is_empty() {
            return Err(Error::PathSyntax {
                message: "empty segment".to_string(),
                path: text.to_string(),
                position,
            });
        }
        segments.push(classify(part));
        position += part.len() + 1;
    }
    Ok(segments)
}

/// Classify one raw segment.
///
/// `*` is a wildcard, all-ASCII-digit text is a sequence index, everything
/// else is a mapping key. Digit runs too large for an index fall back to a
/// key so oversized numeric mapping keys stay addressable.
fn classify(part: &str) -> Segment {
    if part == "*" {
        return Segment::Wildcard;
    }
    if part.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(index) = part.parse::<usize>() {
            return Segment::Index(index);
        }
    }
    Segment::Key(part.to_string())
}
