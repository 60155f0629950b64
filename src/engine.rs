use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::compiler::compile_actions;
use crate::digest::hash_value;
use crate::error::ConfigError;
use crate::traits::{AttributeMap, RequestContext};
use crate::types::{
    ActionDeclaration, ActionOp, ActionsConfig, AttrValue, CompiledAction, ValueSource,
};

/// Applies an ordered list of compiled actions to attribute sets.
///
/// The action list is compiled once and shared; the processor is cheap to
/// clone and safe to use from many threads at once, each thread handling
/// its own attribute set.
#[derive(Debug, Clone)]
pub struct AttributeProcessor {
    actions: Arc<[CompiledAction]>,
}

/// Per-call counters returned by [`AttributeProcessor::process_with_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    /// Actions that changed (or rewrote) the attribute set.
    pub applied: usize,
    /// Actions that were silent no-ops for this record.
    pub skipped: usize,
}

enum Outcome {
    Applied,
    Skipped(&'static str),
    /// Extract found a value that is not a string; carries its type name.
    NotAString(&'static str),
}

impl AttributeProcessor {
    /// Compile `declarations` and build a processor from them.
    pub fn new(declarations: &[ActionDeclaration]) -> Result<Self, ConfigError> {
        let actions = compile_actions(declarations)?;
        info!(event = "Compile", phase = "Complete", actions = actions.len());
        Ok(AttributeProcessor {
            actions: actions.into(),
        })
    }

    pub fn from_config(config: &ActionsConfig) -> Result<Self, ConfigError> {
        Self::new(&config.actions)
    }

    /// Parse a JSON configuration document (`{"actions": [...]}`) and compile it.
    pub fn new_from_str(config_text: &str) -> Result<Self, ConfigError> {
        let config: ActionsConfig = serde_json::from_str(config_text).inspect_err(|err| {
            warn!(event = "Compile", phase = "Parse", error = %err);
        })?;
        Self::from_config(&config)
    }

    /// The compiled actions, in execution order.
    pub fn actions(&self) -> &[CompiledAction] {
        &self.actions
    }

    /// Run every action, in order, against `attrs`.
    ///
    /// Never fails: a missing key, a type mismatch, a pattern that does not
    /// match or an absent context value each turn the action into a no-op.
    pub fn process<C, M>(&self, ctx: &C, attrs: &mut M)
    where
        C: RequestContext + ?Sized,
        M: AttributeMap + ?Sized,
    {
        self.process_with_stats(ctx, attrs);
    }

    /// Same as [`process`](Self::process), but reports how many actions
    /// applied and how many were no-ops.
    pub fn process_with_stats<C, M>(&self, ctx: &C, attrs: &mut M) -> ProcessStats
    where
        C: RequestContext + ?Sized,
        M: AttributeMap + ?Sized,
    {
        let mut stats = ProcessStats::default();
        for action in self.actions.iter() {
            match apply(action, ctx, attrs) {
                Outcome::Applied => stats.applied += 1,
                Outcome::Skipped(reason) => {
                    stats.skipped += 1;
                    debug!(event = "Process", phase = "Skipped", action = %action, reason);
                }
                Outcome::NotAString(value_type) => {
                    stats.skipped += 1;
                    debug!(
                        event = "Process",
                        phase = "Skipped",
                        action = %action,
                        reason = "value is not a string",
                        value_type
                    );
                }
            }
        }
        stats
    }
}

fn apply<C, M>(action: &CompiledAction, ctx: &C, attrs: &mut M) -> Outcome
where
    C: RequestContext + ?Sized,
    M: AttributeMap + ?Sized,
{
    let key = action.key.as_str();
    match &action.op {
        ActionOp::Insert(source) => {
            if attrs.contains_key(key) {
                return Outcome::Skipped("key already present");
            }
            write_resolved(source, ctx, attrs, key)
        }
        ActionOp::Update(source) => {
            if !attrs.contains_key(key) {
                return Outcome::Skipped("key absent");
            }
            write_resolved(source, ctx, attrs, key)
        }
        ActionOp::Upsert(source) => write_resolved(source, ctx, attrs, key),
        ActionOp::Delete => match attrs.remove(key) {
            Some(_) => Outcome::Applied,
            None => Outcome::Skipped("key absent"),
        },
        ActionOp::Hash => {
            let Some(value) = attrs.get(key) else {
                return Outcome::Skipped("key absent");
            };
            let digest = hash_value(value);
            attrs.put(key, AttrValue::Str(digest));
            Outcome::Applied
        }
        ActionOp::Extract(pattern) => {
            let Some(value) = attrs.get(key) else {
                return Outcome::Skipped("key absent");
            };
            let Some(input) = value.as_str() else {
                return Outcome::NotAString(value.type_name());
            };
            let Some(captures) = pattern.extract(input) else {
                return Outcome::Skipped("pattern did not match");
            };
            let extracted: Vec<(&str, String)> = captures
                .into_iter()
                .map(|(name, text)| (name, text.to_string()))
                .collect();
            for (name, text) in extracted {
                attrs.put(name, AttrValue::Str(text));
            }
            Outcome::Applied
        }
        ActionOp::Convert(to) => {
            let Some(value) = attrs.get(key) else {
                return Outcome::Skipped("key absent");
            };
            match to.convert(value) {
                Some(converted) => {
                    attrs.put(key, converted);
                    Outcome::Applied
                }
                None => Outcome::Skipped("value not convertible"),
            }
        }
    }
}

fn write_resolved<C, M>(source: &ValueSource, ctx: &C, attrs: &mut M, key: &str) -> Outcome
where
    C: RequestContext + ?Sized,
    M: AttributeMap + ?Sized,
{
    let resolved = match source {
        ValueSource::Literal(value) => Some(value.clone()),
        ValueSource::FromAttribute(name) => attrs.get(name).cloned(),
        ValueSource::FromContext(context_key) => context_key.resolve(ctx),
    };
    match resolved {
        Some(value) => {
            attrs.put(key, value);
            Outcome::Applied
        }
        None => Outcome::Skipped("value source is empty"),
    }
}

#[cfg(test)]
mod tests;
