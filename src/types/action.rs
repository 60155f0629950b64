//! Action kinds and the per-kind source rules.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// The kind of mutation an action performs.
///
/// Parsing is case-insensitive (`"INSERT"`, `"upDaTE"`); the canonical form
/// produced by `Display` and serde is lowercase.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ActionKind {
    Insert,
    Update,
    Upsert,
    Delete,
    Hash,
    Extract,
    Convert,
}

/// What an action kind expects in terms of value sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRule {
    /// Exactly one of `value`, `from_attribute`, `from_context`.
    ValueSource,
    /// Rewrites the attribute's own value; no external source allowed.
    SelfTransform,
    /// Takes no value source at all.
    NoSource,
}

impl ActionKind {
    pub fn source_rule(&self) -> SourceRule {
        match self {
            ActionKind::Insert | ActionKind::Update | ActionKind::Upsert => SourceRule::ValueSource,
            ActionKind::Hash | ActionKind::Convert => SourceRule::SelfTransform,
            ActionKind::Delete | ActionKind::Extract => SourceRule::NoSource,
        }
    }

    /// Whether the `pattern` field is required (and only allowed) for this kind.
    pub fn uses_pattern(&self) -> bool {
        matches!(self, ActionKind::Extract)
    }

    /// Whether the `converted_type` field is required (and only allowed) for this kind.
    pub fn uses_converted_type(&self) -> bool {
        matches!(self, ActionKind::Convert)
    }
}
