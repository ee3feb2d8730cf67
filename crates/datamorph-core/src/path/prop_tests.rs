//! Property-based tests for dot-path parsing
//!
//! These tests verify that path parsing is safe, deterministic, and that
//! rendering a parsed path reproduces its segments.

use super::{Path, Segment};
use proptest::prelude::*;

/// Strategy for generating single path segments
fn segment_strategy() -> impl Strategy<Value = Segment> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,10}".prop_map(Segment::Key),
        (0usize..50).prop_map(Segment::Index),
        Just(Segment::Wildcard),
    ]
}

/// Strategy for generating well-formed dot-path text
fn path_text_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment_strategy(), 0..8).prop_map(|segments| {
        segments
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".")
    })
}

proptest! {
    /// Parsing arbitrary text never panics.
    #[test]
    fn prop_parse_never_panics(text in "[a-z0-9.*_]{0,32}") {
        let _ = Path::parse(&text);
    }

    /// Parsing the same text twice yields the same segments.
    #[test]
    fn prop_parse_deterministic(text in path_text_strategy()) {
        let first = Path::parse(&text).unwrap();
        let second = Path::parse(&text).unwrap();
        prop_assert_eq!(first.segments(), second.segments());
    }

    /// Rendering a parsed path and re-parsing it round-trips.
    #[test]
    fn prop_display_round_trips(text in path_text_strategy()) {
        let parsed = Path::parse(&text).unwrap();
        let reparsed = Path::parse(&parsed.to_string()).unwrap();
        prop_assert_eq!(parsed.segments(), reparsed.segments());
    }

    /// Wildcard detection matches the parsed segments.
    #[test]
    fn prop_wildcard_flag_consistent(text in path_text_strategy()) {
        let parsed = Path::parse(&text).unwrap();
        let expected = parsed.segments().iter().any(|s| matches!(s, Segment::Wildcard));
        prop_assert_eq!(parsed.has_wildcard(), expected);
        prop_assert_eq!(Path::contains_wildcard(&text).unwrap(), expected);
    }
}
