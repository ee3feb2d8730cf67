//! Dot-path addressing for nested data
//!
//! This module provides the parsed representation of dot-delimited paths
//! ("user.addresses.0.street", "users.*.name") together with a process-wide
//! memoization cache. Parsing a given string is pure and deterministic, which
//! is what licenses the caching.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

pub(crate) mod cache;
pub mod parser;

#[cfg(test)]
mod prop_tests;

use crate::Result;
use std::fmt;
use std::sync::Arc;

/// One segment of a dot-delimited path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Named key into a mapping
    Key(String),
    /// Numeric position into a sequence (also matches the equal decimal
    /// key of a mapping)
    Index(usize),
    /// Matches every key/index present at this level
    Wildcard,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(name) => write!(f, "{}", name),
            Segment::Index(idx) => write!(f, "{}", idx),
            Segment::Wildcard => write!(f, "*"),
        }
    }
}

/// A parsed dot-path: an ordered sequence of segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
    has_wildcard: bool,
}

impl Path {
    /// Parse a dot-path, memoized by the exact input string.
    ///
    /// Successful parses are stored in a process-wide, size-bounded LRU
    /// cache; failed parses are never cached and re-validate on next use.
    pub fn parse(text: &str) -> Result<Arc<Path>> {
        if let Some(hit) = cache::lookup(text) {
            return Ok(hit);
        }
        let segments = parser::parse_segments(text)?;
        let path = Arc::new(Path::from_segments(segments));
        cache::store(text, Arc::clone(&path));
        Ok(path)
    }

    /// Build a path directly from segments (used for concretized paths;
    /// bypasses the cache).
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let has_wildcard = segments.iter().any(|s| matches!(s, Segment::Wildcard));
        Self {
            segments,
            has_wildcard,
        }
    }

    /// Whether the given path text contains a wildcard segment
    pub fn contains_wildcard(text: &str) -> Result<bool> {
        Ok(Self::parse(text)?.has_wildcard())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_wildcard(&self) -> bool {
        self.has_wildcard
    }

    /// Number of wildcard segments in this path
    pub fn wildcard_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Wildcard))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literals() {
        let path = Path::parse("a.b.c").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("a".to_string()),
                Segment::Key("b".to_string()),
                Segment::Key("c".to_string()),
            ]
        );
        assert!(!path.has_wildcard());
    }

    #[test]
    fn test_parse_empty_is_root() {
        let path = Path::parse("").unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_parse_index_and_wildcard() {
        let path = Path::parse("users.*.addresses.0").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("users".to_string()),
                Segment::Wildcard,
                Segment::Key("addresses".to_string()),
                Segment::Index(0),
            ]
        );
        assert!(path.has_wildcard());
        assert_eq!(path.wildcard_count(), 1);
    }

    #[test]
    fn test_parse_failure_does_not_poison_cache() {
        assert!(Path::parse("a..b").is_err());
        // A valid parse afterwards still works and the bad text still fails.
        assert!(Path::parse("a.b").is_ok());
        assert!(Path::parse("a..b").is_err());
    }

    #[test]
    fn test_contains_wildcard() {
        assert!(Path::contains_wildcard("users.*.name").unwrap());
        assert!(!Path::contains_wildcard("users.0.name").unwrap());
    }

    #[test]
    fn test_display_round_trip() {
        let path = Path::parse("users.*.addresses.0").unwrap();
        assert_eq!(path.to_string(), "users.*.addresses.0");
    }

    #[test]
    fn test_memoized_parse_is_shared() {
        let first = Path::parse("memo.check.one").unwrap();
        let second = Path::parse("memo.check.one").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
