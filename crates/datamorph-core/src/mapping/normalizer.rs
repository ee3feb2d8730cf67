//! Specification normalization
//!
//! Converts either a flat target→source pair list or a nested template with
//! embedded expressions into an ordered directive list. The embedded
//! expression syntax is `{{ source.path | transform | ... }}`: exactly one
//! delimited source-path reference per leaf, with optional pipe-chained
//! named transforms.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

use super::directive::{Directive, SourceExpression};
use super::transforms::Transform;
use crate::path::Path;
use crate::{Error, Result};
use serde_json::{Map, Value};

const EXPR_OPEN: &str = "{{";
const EXPR_CLOSE: &str = "}}";

/// The two accepted mapping specification shapes
#[derive(Debug, Clone, PartialEq)]
pub enum MappingSpec {
    /// Flat ordered mapping of target-path pattern → source pattern
    /// (optionally an embedded expression string)
    Pairs(Vec<(String, String)>),
    /// Nested template whose leaves are expression strings or literal
    /// constants
    Template(Value),
}

impl MappingSpec {
    /// Build a flat pair specification, preserving iteration order.
    pub fn pairs<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MappingSpec::Pairs(
            entries
                .into_iter()
                .map(|(target, source)| (target.into(), source.into()))
                .collect(),
        )
    }

    /// Build a template specification from a value tree.
    pub fn template(template: Value) -> Self {
        MappingSpec::Template(template)
    }
}

/// Normalize a specification into an ordered directive list.
///
/// Declaration order is preserved for the flat shape; the template shape is
/// walked depth-first. Every directive is arity-checked (wildcard counts on
/// target and source must match).
pub fn normalize(spec: &MappingSpec) -> Result<Vec<Directive>> {
    match spec {
        MappingSpec::Pairs(pairs) => pairs
            .iter()
            .map(|(target, source)| pair_directive(target, source))
            .collect(),
        MappingSpec::Template(template) => {
            let mut directives = Vec::new();
            walk_template(template, &mut Vec::new(), &mut directives)?;
            Ok(directives)
        }
    }
}

fn pair_directive(target: &str, source: &str) -> Result<Directive> {
    let target_path = Path::parse(target)?;
    let (path_text, transforms) = match parse_embedded(source)? {
        Some(parsed) => parsed,
        None => (source.trim().to_string(), Vec::new()),
    };
    let directive = Directive {
        target: target_path,
        source: SourceExpression::Reference(Path::parse(&path_text)?),
        transforms,
    };
    directive.validate_arity()?;
    Ok(directive)
}

fn walk_template(
    node: &Value,
    path: &mut Vec<String>,
    out: &mut Vec<Directive>,
) -> Result<()> {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(key.clone());
                walk_template(child, path, out)?;
                path.pop();
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                path.push(idx.to_string());
                walk_template(child, path, out)?;
                path.pop();
            }
        }
        leaf => {
            out.push(leaf_directive(leaf, &path.join("."))?);
        }
    }
    Ok(())
}

fn leaf_directive(leaf: &Value, target: &str) -> Result<Directive> {
    let target_path = Path::parse(target)?;
    let source = match leaf {
        Value::String(text) => match parse_embedded(text)? {
            Some((path_text, transforms)) => {
                let directive = Directive {
                    target: target_path,
                    source: SourceExpression::Reference(Path::parse(&path_text)?),
                    transforms,
                };
                directive.validate_arity()?;
                return Ok(directive);
            }
            None => SourceExpression::Literal(leaf.clone()),
        },
        other => SourceExpression::Literal(other.clone()),
    };
    let directive = Directive {
        target: target_path,
        source,
        transforms: Vec::new(),
    };
    directive.validate_arity()?;
    Ok(directive)
}

/// Parse an embedded expression.
///
/// Returns `None` when the text carries no delimiter (a plain path in pair
/// form, a literal in template form). The delimited reference must span the
/// whole trimmed leaf; partial interpolation is out of scope.
fn parse_embedded(text: &str) -> Result<Option<(String, Vec<Transform>)>> {
    let trimmed = text.trim();
    if !trimmed.contains(EXPR_OPEN) {
        return Ok(None);
    }
    if !(trimmed.starts_with(EXPR_OPEN) && trimmed.ends_with(EXPR_CLOSE)) {
        return Err(Error::Spec {
            message: format!("embedded expression must span the whole value: '{trimmed}'"),
            context: None,
        });
    }
    let inner = &trimmed[EXPR_OPEN.len()..trimmed.len() - EXPR_CLOSE.len()];
    if inner.contains(EXPR_OPEN) || inner.contains(EXPR_CLOSE) {
        return Err(Error::Spec {
            message: format!("expected exactly one embedded reference in '{trimmed}'"),
            context: None,
        });
    }

    let mut parts = inner.split('|');
    let path = parts.next().unwrap_or("").trim().to_string();
    if path.is_empty() {
        return Err(Error::spec("empty source reference in embedded expression"));
    }
    let transforms = parts
        .map(|name| Transform::parse(name.trim()))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some((path, transforms)))
}

/// Convenience: build a pair specification from an ordered JSON object of
/// target → source strings.
pub fn pairs_from_object(map: &Map<String, Value>) -> Result<MappingSpec> {
    let mut entries = Vec::with_capacity(map.len());
    for (target, source) in map {
        let Value::String(source_text) = source else {
            return Err(Error::Spec {
                message: format!("pair value for '{target}' must be a string"),
                context: None,
            });
        };
        entries.push((target.clone(), source_text.clone()));
    }
    Ok(MappingSpec::Pairs(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Segment;
    use serde_json::json;

    #[test]
    fn test_pairs_preserve_order() {
        let spec = MappingSpec::pairs([("b.out", "b.in"), ("a.out", "a.in")]);
        let directives = normalize(&spec).unwrap();
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].target.to_string(), "b.out");
        assert_eq!(directives[1].target.to_string(), "a.out");
    }

    #[test]
    fn test_pair_with_embedded_transforms() {
        let spec = MappingSpec::pairs([("profile.name", "{{ user.name | trim | upper }}")]);
        let directives = normalize(&spec).unwrap();
        assert_eq!(directives[0].source_pattern(), "user.name");
        assert_eq!(
            directives[0].transforms,
            vec![Transform::Trim, Transform::Upper]
        );
    }

    #[test]
    fn test_template_leaves() {
        let spec = MappingSpec::template(json!({
            "profile": {
                "name": "{{ user.name }}",
                "kind": "member",
                "rank": 3
            }
        }));
        let directives = normalize(&spec).unwrap();
        assert_eq!(directives.len(), 3);
        assert_eq!(directives[0].target.to_string(), "profile.name");
        assert_eq!(directives[0].source_pattern(), "user.name");
        assert_eq!(
            directives[1].source,
            SourceExpression::Literal(json!("member"))
        );
        assert_eq!(
            directives[2].source,
            SourceExpression::Literal(json!(3))
        );
    }

    #[test]
    fn test_template_array_leaves_get_index_segments() {
        let spec = MappingSpec::template(json!({
            "pair": ["{{ a }}", "{{ b }}"]
        }));
        let directives = normalize(&spec).unwrap();
        assert_eq!(
            directives[0].target.segments(),
            &[Segment::Key("pair".to_string()), Segment::Index(0)]
        );
        assert_eq!(directives[1].target.segments()[1], Segment::Index(1));
    }

    #[test]
    fn test_partial_interpolation_rejected() {
        let spec = MappingSpec::pairs([("out", "Hello {{ user.name }}")]);
        assert!(matches!(normalize(&spec), Err(Error::Spec { .. })));
    }

    #[test]
    fn test_unknown_transform_rejected() {
        let spec = MappingSpec::pairs([("out", "{{ a | shred }}")]);
        assert!(matches!(normalize(&spec), Err(Error::Spec { .. })));
    }

    #[test]
    fn test_wildcard_arity_mismatch_rejected() {
        let spec = MappingSpec::pairs([("out.name", "users.*.name")]);
        assert!(matches!(
            normalize(&spec),
            Err(Error::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_pairs_from_object() {
        let mut map = Map::new();
        map.insert("t".to_string(), json!("s"));
        let spec = pairs_from_object(&map).unwrap();
        assert_eq!(spec, MappingSpec::Pairs(vec![("t".to_string(), "s".to_string())]));

        let mut bad = Map::new();
        bad.insert("t".to_string(), json!(1));
        assert!(pairs_from_object(&bad).is_err());
    }
}
