//! User-authored action declarations, as read from configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// One configured action, before validation.
///
/// Field names follow the collector configuration format:
///
/// ```json
/// { "key": "db.statement", "action": "hash" }
/// { "key": "region", "action": "upsert", "value": "planet-earth" }
/// { "key": "tenant", "action": "insert", "from_context": "auth.tenant_id" }
/// { "key": "url", "action": "extract", "pattern": "^/api/(?P<version>v\\d+)/.*$" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ActionDeclaration {
    /// The attribute key the action operates on.
    #[serde(default)]
    pub key: String,

    /// Action kind, case-insensitive.
    #[serde(default)]
    pub action: String,

    /// Literal value for insert/update/upsert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub value: Option<Value>,

    /// Copy the value from another attribute of the same record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_attribute: Option<String>,

    /// Copy the value from the request context (`metadata.<name>`, `auth.<name>` or `<name>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_context: Option<String>,

    /// Regular expression with named capture groups, extract only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Target type (`int`, `double`, `string`), convert only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_type: Option<String>,
}

impl ActionDeclaration {
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        ActionDeclaration {
            key: key.into(),
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_from_attribute(mut self, name: impl Into<String>) -> Self {
        self.from_attribute = Some(name.into());
        self
    }

    pub fn with_from_context(mut self, name: impl Into<String>) -> Self {
        self.from_context = Some(name.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_converted_type(mut self, converted_type: impl Into<String>) -> Self {
        self.converted_type = Some(converted_type.into());
        self
    }
}

/// Top-level configuration document: `{"actions": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ActionsConfig {
    #[serde(default)]
    pub actions: Vec<ActionDeclaration>,
}
