//! Hook pipeline for the mapping engine
//!
//! Hooks are explicit handler values invoked with a fully-specified context
//! struct; there is no ambient or captured engine state. A registration is
//! one handler plus zero or more filters; for one pair at one stage it
//! fires at most once, even when several of its filters match. Veto is a
//! distinguished outcome, not an error, and handler errors propagate
//! uncaught through the engine.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Interception points in the per-pair mapping lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookStage {
    /// Once, before any directive runs
    BeforeAll,
    /// Before a directive's source is resolved; may veto the pair
    BeforePair,
    /// After the transform chain, per resolved value; may replace it
    PreTransform,
    /// Immediately before the write; may replace the value or veto it
    BeforeWrite,
    /// After the write, with a snapshot of the current target
    AfterWrite,
    /// Once, after the last directive
    AfterAll,
}

/// Outcome of one handler invocation
#[derive(Debug, Clone, PartialEq)]
pub enum HookOutcome {
    /// Proceed unchanged
    Continue,
    /// Proceed with a replacement value
    Replace(Value),
    /// Suppress the current pair (BeforePair) or write (BeforeWrite)
    Veto,
}

/// Context handed to every handler invocation
#[derive(Debug)]
pub struct HookContext<'a> {
    pub stage: HookStage,
    /// Concrete source path for per-value stages; the directive's source
    /// pattern for BeforePair; empty for the *All stages and literals
    pub source_path: &'a str,
    /// Concrete target path, pattern for BeforePair, empty for *All stages
    pub target_path: &'a str,
    /// Mode name the engine was configured with
    pub mode: &'a str,
    /// Resolved value, where one exists at this stage
    pub value: Option<&'a Value>,
    /// Snapshot of the current target (AfterWrite and the *All stages)
    pub target: Option<&'a Value>,
}

/// Handler registration filter, keyed as `src:`, `tgt:` or `mode:`
#[derive(Debug, Clone, PartialEq, Eq)]
enum HookFilter {
    SourcePrefix(String),
    TargetPrefix(String),
    Mode(String),
}

impl HookFilter {
    fn parse(key: &str) -> Result<Self> {
        if let Some(prefix) = key.strip_prefix("src:") {
            Ok(HookFilter::SourcePrefix(prefix.to_string()))
        } else if let Some(prefix) = key.strip_prefix("tgt:") {
            Ok(HookFilter::TargetPrefix(prefix.to_string()))
        } else if let Some(name) = key.strip_prefix("mode:") {
            Ok(HookFilter::Mode(name.to_string()))
        } else {
            Err(Error::Spec {
                message: format!("unknown hook filter '{key}'"),
                context: Some("expected src:<prefix>, tgt:<prefix> or mode:<name>".to_string()),
            })
        }
    }

    fn matches(&self, context: &HookContext<'_>) -> bool {
        match self {
            HookFilter::SourcePrefix(prefix) => context.source_path.starts_with(prefix),
            HookFilter::TargetPrefix(prefix) => context.target_path.starts_with(prefix),
            HookFilter::Mode(name) => context.mode == name,
        }
    }
}

type Handler = Box<dyn Fn(&HookContext<'_>) -> Result<HookOutcome>>;

struct Registration {
    filters: Vec<HookFilter>,
    handler: Handler,
}

impl Registration {
    /// Unconditional when unfiltered; otherwise any matching filter fires
    /// the handler, once.
    fn applies(&self, context: &HookContext<'_>) -> bool {
        self.filters.is_empty() || self.filters.iter().any(|f| f.matches(context))
    }
}

/// Result of dispatching one stage across all registrations
#[derive(Debug)]
pub(crate) struct StageRun {
    pub value: Option<Value>,
    pub vetoed: bool,
}

/// Immutable set of hook registrations consumed by the forward engine
#[derive(Default)]
pub struct HookSet {
    stages: HashMap<HookStage, Vec<Registration>>,
}

impl HookSet {
    pub fn builder() -> HookSetBuilder {
        HookSetBuilder::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.values().all(Vec::is_empty)
    }

    /// Dispatch one stage. Registrations run in registration order; a
    /// Replace outcome feeds the replacement to later handlers, a Veto
    /// short-circuits the stage.
    pub(crate) fn run(
        &self,
        stage: HookStage,
        source_path: &str,
        target_path: &str,
        mode: &str,
        mut value: Option<Value>,
        target: Option<&Value>,
    ) -> Result<StageRun> {
        let Some(registrations) = self.stages.get(&stage) else {
            return Ok(StageRun {
                value,
                vetoed: false,
            });
        };

        for registration in registrations {
            let context = HookContext {
                stage,
                source_path,
                target_path,
                mode,
                value: value.as_ref(),
                target,
            };
            if !registration.applies(&context) {
                continue;
            }
            match (registration.handler)(&context)? {
                HookOutcome::Continue => {}
                HookOutcome::Replace(replacement) => value = Some(replacement),
                HookOutcome::Veto => {
                    return Ok(StageRun {
                        value,
                        vetoed: true,
                    });
                }
            }
        }
        Ok(StageRun {
            value,
            vetoed: false,
        })
    }
}

impl std::fmt::Debug for HookSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .stages
            .iter()
            .map(|(stage, registrations)| {
                let name = match stage {
                    HookStage::BeforeAll => "BeforeAll",
                    HookStage::BeforePair => "BeforePair",
                    HookStage::PreTransform => "PreTransform",
                    HookStage::BeforeWrite => "BeforeWrite",
                    HookStage::AfterWrite => "AfterWrite",
                    HookStage::AfterAll => "AfterAll",
                };
                (name, registrations.len())
            })
            .collect();
        f.debug_struct("HookSet").field("stages", &counts).finish()
    }
}

/// Fluent builder producing an immutable `HookSet`
#[derive(Default)]
pub struct HookSetBuilder {
    stages: HashMap<HookStage, Vec<Registration>>,
}

impl HookSetBuilder {
    /// Register an unconditional handler for a stage.
    pub fn on<F>(mut self, stage: HookStage, handler: F) -> Self
    where
        F: Fn(&HookContext<'_>) -> Result<HookOutcome> + 'static,
    {
        self.stages.entry(stage).or_default().push(Registration {
            filters: Vec::new(),
            handler: Box::new(handler),
        });
        self
    }

    /// Register a filter-keyed handler. Filter keys are `src:<prefix>`,
    /// `tgt:<prefix>` or `mode:<name>`; the handler fires when any of them
    /// matches, at most once per pair and stage.
    pub fn on_filtered<F>(
        mut self,
        stage: HookStage,
        filters: &[&str],
        handler: F,
    ) -> Result<Self>
    where
        F: Fn(&HookContext<'_>) -> Result<HookOutcome> + 'static,
    {
        let filters = filters
            .iter()
            .map(|key| HookFilter::parse(key))
            .collect::<Result<Vec<_>>>()?;
        if filters.is_empty() {
            return Err(Error::spec("filtered hook registration needs at least one filter"));
        }
        self.stages.entry(stage).or_default().push(Registration {
            filters,
            handler: Box::new(handler),
        });
        Ok(self)
    }

    pub fn build(self) -> HookSet {
        HookSet {
            stages: self.stages,
        }
    }
}
