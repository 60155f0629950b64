//! The validated, immutable runtime form of actions.

use std::fmt::{Display, Formatter, Result as FmtResult};

use regex::Regex;

use crate::error::ConfigError;

use super::{ActionKind, AttrValue, ContextKey, ConvertedType};

/// Where insert, update and upsert take their value from.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSource {
    Literal(AttrValue),
    FromAttribute(String),
    FromContext(ContextKey),
}

impl Display for ValueSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ValueSource::Literal(v) => write!(f, "value({v})"),
            ValueSource::FromAttribute(name) => write!(f, "from_attribute({name})"),
            ValueSource::FromContext(key) => write!(f, "from_context({key})"),
        }
    }
}

/// A compiled extract pattern.
///
/// `attr_names[i]` is the name of capture group `i`; slot 0 (the whole
/// match) is always empty and every other slot is named.
#[derive(Debug, Clone)]
pub struct ExtractPattern {
    regex: Regex,
    anchored: Regex,
    attr_names: Vec<String>,
}

impl ExtractPattern {
    /// Compile `pattern` for the action at `index`.
    ///
    /// The pattern must contain at least one named group and no unnamed
    /// ones. Matching always spans the whole input.
    pub fn compile(index: usize, pattern: &str) -> Result<Self, ConfigError> {
        let invalid = |err: regex::Error| ConfigError::InvalidPattern {
            index,
            pattern: pattern.to_string(),
            reason: err.to_string(),
        };

        let regex = Regex::new(pattern).map_err(invalid)?;

        let groups: Vec<Option<&str>> = regex.capture_names().skip(1).collect();
        if groups.iter().all(Option::is_none) {
            return Err(ConfigError::NoNamedGroups { index });
        }
        if groups.iter().any(Option::is_none) {
            return Err(ConfigError::UnnamedGroupPresent { index });
        }

        let attr_names = regex
            .capture_names()
            .map(|name| name.unwrap_or_default().to_string())
            .collect();
        let anchored = anchor(pattern).map_err(invalid)?;

        Ok(ExtractPattern {
            regex,
            anchored,
            attr_names,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn attr_names(&self) -> &[String] {
        &self.attr_names
    }

    /// Match `input` in full and return `(attribute name, captured text)` for
    /// every named group. A group that did not take part in the match yields
    /// an empty string.
    pub fn extract<'p, 's>(&'p self, input: &'s str) -> Option<Vec<(&'p str, &'s str)>> {
        let caps = self.anchored.captures(input)?;
        Some(
            self.attr_names
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, name)| (name.as_str(), caps.get(i).map_or("", |m| m.as_str())))
                .collect(),
        )
    }
}

/// Wrap `pattern` so it only matches the whole input.
///
/// A verbose-mode (`(?x)`) pattern may end inside a `#` comment, which would
/// swallow the closing group; in that case the comment is terminated with a
/// newline, which verbose mode ignores.
fn anchor(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\A(?:{pattern})\z"))
        .or_else(|_| Regex::new(&format!("\\A(?:{pattern}\n)\\z")))
}

impl PartialEq for ExtractPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str() && self.attr_names == other.attr_names
    }
}

/// The operation a compiled action performs, with exactly the inputs its
/// kind needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOp {
    Insert(ValueSource),
    Update(ValueSource),
    Upsert(ValueSource),
    Delete,
    Hash,
    Extract(ExtractPattern),
    Convert(ConvertedType),
}

impl ActionOp {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionOp::Insert(_) => ActionKind::Insert,
            ActionOp::Update(_) => ActionKind::Update,
            ActionOp::Upsert(_) => ActionKind::Upsert,
            ActionOp::Delete => ActionKind::Delete,
            ActionOp::Hash => ActionKind::Hash,
            ActionOp::Extract(_) => ActionKind::Extract,
            ActionOp::Convert(_) => ActionKind::Convert,
        }
    }
}

/// One validated action, ready to run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledAction {
    pub key: String,
    pub op: ActionOp,
}

impl CompiledAction {
    pub fn kind(&self) -> ActionKind {
        self.op.kind()
    }
}

impl Display for CompiledAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.op {
            ActionOp::Insert(src) | ActionOp::Update(src) | ActionOp::Upsert(src) => {
                write!(f, "{}({}, {src})", self.kind(), self.key)
            }
            ActionOp::Extract(pattern) => {
                write!(f, "extract({}, /{}/)", self.key, pattern.as_str())
            }
            ActionOp::Convert(to) => write!(f, "convert({}, {to})", self.key),
            ActionOp::Delete | ActionOp::Hash => write!(f, "{}({})", self.kind(), self.key),
        }
    }
}
