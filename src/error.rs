use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors raised while compiling action declarations.
///
/// Every per-action variant carries the zero-based `index` of the offending
/// declaration. Compilation stops at the first error.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required field \"{field}\" at the {index}-th action")]
    MissingField { index: usize, field: String },

    #[error("unsupported action \"{action}\" at the {index}-th action")]
    UnsupportedAction { index: usize, action: String },

    #[error(
        "either field \"value\", \"from_attribute\" or \"from_context\" must be specified for the {index}-th action"
    )]
    MissingValueSource { index: usize },

    #[error("multiple value sources are set at the {index}-th action")]
    MultipleValueSources { index: usize },

    #[error("unsupported value type \"{type_name}\" at the {index}-th action")]
    UnsupportedValueType { index: usize, type_name: String },

    #[error("action \"{action}\" does not use the \"{field}\" field, found at the {index}-th action")]
    UnexpectedField {
        index: usize,
        action: String,
        field: String,
    },

    #[error("action \"{action}\" does not use a value source field, found at the {index}-th action")]
    UnexpectedValueSource { index: usize, action: String },

    #[error("field \"pattern\" has invalid pattern \"{pattern}\" at the {index}-th action: {reason}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        reason: String,
    },

    #[error("field \"pattern\" contains no named matcher groups at the {index}-th action")]
    NoNamedGroups { index: usize },

    #[error("field \"pattern\" contains at least one unnamed matcher group at the {index}-th action")]
    UnnamedGroupPresent { index: usize },

    #[error("unsupported converted_type \"{converted_type}\" at the {index}-th action")]
    UnsupportedConvertedType {
        index: usize,
        converted_type: String,
    },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl ConfigError {
    /// Index of the offending action, if the error is tied to one.
    pub fn index(&self) -> Option<usize> {
        match self {
            ConfigError::MissingField { index, .. }
            | ConfigError::UnsupportedAction { index, .. }
            | ConfigError::MissingValueSource { index }
            | ConfigError::MultipleValueSources { index }
            | ConfigError::UnsupportedValueType { index, .. }
            | ConfigError::UnexpectedField { index, .. }
            | ConfigError::UnexpectedValueSource { index, .. }
            | ConfigError::InvalidPattern { index, .. }
            | ConfigError::NoNamedGroups { index }
            | ConfigError::UnnamedGroupPresent { index }
            | ConfigError::UnsupportedConvertedType { index, .. } => Some(*index),
            ConfigError::InvalidFormat(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::InvalidFormat(err.to_string())
    }
}
