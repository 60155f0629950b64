//! Request context lookups: namespaces, keys and a concrete client context.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::traits::RequestContext;

use super::AttrValue;

/// Separator used when several metadata values are flattened into one
/// string. Values that themselves contain `;` cannot be told apart after
/// joining.
pub const MULTI_VALUE_SEPARATOR: &str = ";";

const METADATA_PREFIX: &str = "metadata.";
const AUTH_PREFIX: &str = "auth.";

/// The two disjoint lookup domains of a request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextNamespace {
    Metadata,
    Auth,
}

/// A `from_context` reference, split into namespace and bare name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextKey {
    pub namespace: ContextNamespace,
    pub name: String,
}

impl ContextKey {
    /// Parse `auth.<name>`, `metadata.<name>` or a bare `<name>` (metadata).
    pub fn parse(raw: &str) -> Self {
        let (namespace, name) = if let Some(name) = raw.strip_prefix(AUTH_PREFIX) {
            (ContextNamespace::Auth, name)
        } else if let Some(name) = raw.strip_prefix(METADATA_PREFIX) {
            (ContextNamespace::Metadata, name)
        } else {
            (ContextNamespace::Metadata, raw)
        };
        ContextKey {
            namespace,
            name: name.to_string(),
        }
    }

    /// Resolve this key against `ctx`.
    ///
    /// Metadata values are joined with [`MULTI_VALUE_SEPARATOR`]; auth values
    /// are coerced with [`auth_value_to_attr`]. `None` means nothing is
    /// registered under the name.
    pub fn resolve<C: RequestContext + ?Sized>(&self, ctx: &C) -> Option<AttrValue> {
        match self.namespace {
            ContextNamespace::Metadata => {
                let values = ctx.metadata(&self.name);
                match values.as_slice() {
                    [] => None,
                    [single] => Some(AttrValue::Str((*single).to_string())),
                    many => Some(AttrValue::Str(many.iter().join(MULTI_VALUE_SEPARATOR))),
                }
            }
            ContextNamespace::Auth => ctx
                .auth_attribute(&self.name)
                .and_then(|v| auth_value_to_attr(&v)),
        }
    }
}

impl Display for ContextKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.namespace {
            ContextNamespace::Metadata => write!(f, "{METADATA_PREFIX}{}", self.name),
            ContextNamespace::Auth => write!(f, "{AUTH_PREFIX}{}", self.name),
        }
    }
}

/// Coerce an opaque auth value to an attribute value.
///
/// Scalars map to their natural type, string arrays are joined like
/// multi-valued metadata, any other shape is kept as its JSON text. `null`
/// counts as absent.
pub fn auth_value_to_attr(value: &Value) -> Option<AttrValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(AttrValue::Bool(*b)),
        Value::String(s) => Some(AttrValue::Str(s.clone())),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(AttrValue::Int(i)),
            None => n.as_f64().map(AttrValue::Double),
        },
        Value::Array(items) if items.iter().all(Value::is_string) => Some(AttrValue::Str(
            items
                .iter()
                .filter_map(Value::as_str)
                .join(MULTI_VALUE_SEPARATOR),
        )),
        other => Some(AttrValue::Str(other.to_string())),
    }
}

/// Transport metadata and auth claims of one client request.
///
/// Metadata names are case-insensitive, the way transport headers are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientInfo {
    metadata: BTreeMap<String, Vec<String>>,
    auth: BTreeMap<String, Value>,
}

impl ClientInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one metadata value and return the updated context.
    pub fn with_metadata(mut self, name: &str, value: impl Into<String>) -> Self {
        self.add_metadata(name, value);
        self
    }

    /// Set one auth attribute and return the updated context.
    pub fn with_auth(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.auth.insert(name.into(), value.into());
        self
    }

    pub fn add_metadata(&mut self, name: &str, value: impl Into<String>) {
        self.metadata
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }
}

impl RequestContext for ClientInfo {
    fn metadata(&self, name: &str) -> Vec<&str> {
        self.metadata
            .get(&name.to_ascii_lowercase())
            .map(|values| values.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn auth_attribute(&self, name: &str) -> Option<Value> {
        self.auth.get(name).cloned()
    }
}
