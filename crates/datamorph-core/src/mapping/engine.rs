//! Forward mapping engine
//!
//! Walks a directive list in declaration order, resolves sources through a
//! data accessor, runs the hook pipeline, and writes into a target
//! container with wildcard-consistent indexing: the concrete key/index
//! chosen during source enumeration is reused verbatim for the
//! corresponding target write. That index correspondence is what makes
//! inversion meaningful.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

use super::directive::{Directive, SourceExpression};
use super::hooks::{HookSet, HookStage};
use super::invert::invert;
use super::normalizer::{normalize, MappingSpec};
use super::transforms;
use crate::accessor::DataAccessor;
use crate::path::{Path, Segment};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Mapping engine with a mode name, null policy, and hook set
pub struct Mapper {
    mode: String,
    skip_null: bool,
    hooks: HookSet,
}

impl Mapper {
    /// Engine in `auto` mode: null values are skipped, no hooks.
    pub fn new() -> Self {
        Self {
            mode: "auto".to_string(),
            skip_null: true,
            hooks: HookSet::default(),
        }
    }

    /// Set the mode name carried into hook contexts and `mode:` filters.
    pub fn mode(mut self, name: impl Into<String>) -> Self {
        self.mode = name.into();
        self
    }

    /// Control the null policy. With skip-null enabled a resolved null
    /// suppresses the write outright (the key is absent); disabled, the
    /// explicit null is written and stays distinguishable from "missing".
    pub fn skip_null(mut self, enabled: bool) -> Self {
        self.skip_null = enabled;
        self
    }

    /// Attach an immutable hook set.
    pub fn with_hooks(mut self, hooks: HookSet) -> Self {
        self.hooks = hooks;
        self
    }

    /// Normalize and apply a specification forward.
    pub fn apply(
        &self,
        spec: &MappingSpec,
        source: &DataAccessor,
        target: Value,
    ) -> Result<Value> {
        self.apply_directives(&normalize(spec)?, source, target)
    }

    /// Normalize a specification, invert it, and apply: the caller's data
    /// takes the source role the specification assigned to the target.
    pub fn apply_reverse(
        &self,
        spec: &MappingSpec,
        source: &DataAccessor,
        target: Value,
    ) -> Result<Value> {
        self.apply_directives(&invert(&normalize(spec)?)?, source, target)
    }

    /// Apply an already-normalized directive list forward.
    pub fn apply_directives(
        &self,
        directives: &[Directive],
        source: &DataAccessor,
        mut target: Value,
    ) -> Result<Value> {
        self.hooks.run(
            HookStage::BeforeAll,
            "",
            "",
            &self.mode,
            Some(source.root().clone()),
            Some(&target),
        )?;

        for directive in directives {
            self.apply_directive(directive, source, &mut target)?;
        }

        self.hooks.run(
            HookStage::AfterAll,
            "",
            "",
            &self.mode,
            None,
            Some(&target),
        )?;
        Ok(target)
    }

    fn apply_directive(
        &self,
        directive: &Directive,
        source: &DataAccessor,
        target: &mut Value,
    ) -> Result<()> {
        let source_pattern = directive.source_pattern();
        let target_pattern = directive.target.to_string();

        let before = self.hooks.run(
            HookStage::BeforePair,
            &source_pattern,
            &target_pattern,
            &self.mode,
            None,
            None,
        )?;
        if before.vetoed {
            log::debug!("pair '{source_pattern}' -> '{target_pattern}' vetoed");
            return Ok(());
        }

        match &directive.source {
            SourceExpression::Literal(value) => self.write_pair(
                directive,
                &source_pattern,
                directive.target.segments().to_vec(),
                value.clone(),
                target,
            ),
            SourceExpression::Reference(path) if !path.has_wildcard() => {
                let Some(value) = source.resolve(path).cloned() else {
                    log::debug!("no value at '{source_pattern}', pair skipped");
                    return Ok(());
                };
                self.write_pair(
                    directive,
                    &source_pattern,
                    directive.target.segments().to_vec(),
                    value,
                    target,
                )
            }
            SourceExpression::Reference(path) => {
                for matched in source.expand(path) {
                    let segments = fill_wildcards(&directive.target, &matched.captures)?;
                    self.write_pair(
                        directive,
                        &matched.concrete_path,
                        segments,
                        matched.value,
                        target,
                    )?;
                }
                Ok(())
            }
        }
    }

    /// Run one resolved value through transforms, the per-value hook
    /// stages, the null policy, and the write.
    fn write_pair(
        &self,
        directive: &Directive,
        source_path: &str,
        target_segments: Vec<Segment>,
        value: Value,
        target: &mut Value,
    ) -> Result<()> {
        let target_path = Path::from_segments(target_segments);
        let target_text = target_path.to_string();

        let value = transforms::apply_chain(&directive.transforms, value);
        let pre = self.hooks.run(
            HookStage::PreTransform,
            source_path,
            &target_text,
            &self.mode,
            Some(value),
            None,
        )?;
        let value = pre.value.unwrap_or(Value::Null);

        let before_write = self.hooks.run(
            HookStage::BeforeWrite,
            source_path,
            &target_text,
            &self.mode,
            Some(value),
            None,
        )?;
        if before_write.vetoed {
            log::debug!("write to '{target_text}' vetoed");
            return Ok(());
        }
        let value = before_write.value.unwrap_or(Value::Null);

        if value.is_null() && self.skip_null {
            log::debug!("null at '{source_path}' skipped, '{target_text}' left absent");
            return Ok(());
        }

        write_at(target, target_path.segments(), value.clone())?;

        self.hooks.run(
            HookStage::AfterWrite,
            source_path,
            &target_text,
            &self.mode,
            Some(value),
            Some(target),
        )?;
        Ok(())
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Substitute source-enumeration captures into the target's wildcard
/// positions, in order. Arity was validated at normalization; a shortfall
/// here would break index correspondence, so it fails rather than truncate.
fn fill_wildcards(target: &Path, captures: &[Segment]) -> Result<Vec<Segment>> {
    let mut filled = Vec::with_capacity(target.segments().len());
    let mut remaining = captures.iter();
    for segment in target.segments() {
        match segment {
            Segment::Wildcard => match remaining.next() {
                Some(capture) => filled.push(capture.clone()),
                None => {
                    return Err(Error::InvariantViolation {
                        message: format!(
                            "target '{target}' has more wildcards than the source enumeration captured"
                        ),
                    });
                }
            },
            other => filled.push(other.clone()),
        }
    }
    Ok(filled)
}

/// Write a value at a concrete segment path, creating intermediate
/// containers as needed: objects for key segments, null-padded arrays for
/// index segments. An empty path replaces the root.
fn write_at(root: &mut Value, segments: &[Segment], value: Value) -> Result<()> {
    let Some((last, init)) = segments.split_last() else {
        *root = value;
        return Ok(());
    };

    let mut node = root;
    for segment in init {
        node = step_into(node, segment)?;
    }

    match last {
        Segment::Key(key) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            if let Value::Object(map) = node {
                map.insert(key.clone(), value);
            }
        }
        Segment::Index(idx) => {
            if !node.is_array() {
                *node = Value::Array(Vec::new());
            }
            if let Value::Array(items) = node {
                while items.len() <= *idx {
                    items.push(Value::Null);
                }
                items[*idx] = value;
            }
        }
        Segment::Wildcard => {
            return Err(Error::invariant(
                "wildcard segment reached the writer; paths must be concretized first",
            ));
        }
    }
    Ok(())
}

/// Descend one segment, creating the container the segment addresses when
/// it is missing or of the wrong shape.
fn step_into<'a>(node: &'a mut Value, segment: &Segment) -> Result<&'a mut Value> {
    match segment {
        Segment::Key(key) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            match node {
                Value::Object(map) => Ok(map.entry(key.clone()).or_insert(Value::Null)),
                _ => unreachable!("node was just made an object"),
            }
        }
        Segment::Index(idx) => {
            if !node.is_array() {
                *node = Value::Array(Vec::new());
            }
            match node {
                Value::Array(items) => {
                    while items.len() <= *idx {
                        items.push(Value::Null);
                    }
                    Ok(&mut items[*idx])
                }
                _ => unreachable!("node was just made an array"),
            }
        }
        Segment::Wildcard => Err(Error::invariant(
            "wildcard segment reached the writer; paths must be concretized first",
        )),
    }
}
