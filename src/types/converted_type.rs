//! Target types for the `convert` action.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AttrValue;

/// The type a `convert` action coerces an attribute to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConvertedType {
    Int,
    Double,
    String,
}

impl AsRef<str> for ConvertedType {
    fn as_ref(&self) -> &str {
        match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "string",
        }
    }
}

impl std::str::FromStr for ConvertedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Int, Self::Double, Self::String]
            .into_iter()
            .find(|t| t.as_ref().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown converted type: {}", s))
    }
}

impl std::fmt::Display for ConvertedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl ConvertedType {
    /// Coerce `value` to this type.
    ///
    /// Returns `None` when the value cannot be represented, e.g. a string
    /// that does not parse as a number. Values already of the target type
    /// are returned unchanged.
    pub fn convert(&self, value: &AttrValue) -> Option<AttrValue> {
        match (self, value) {
            (Self::Int, AttrValue::Int(n)) => Some(AttrValue::Int(*n)),
            (Self::Int, AttrValue::Double(d)) => Some(AttrValue::Int(d.trunc() as i64)),
            (Self::Int, AttrValue::Bool(b)) => Some(AttrValue::Int(i64::from(*b))),
            (Self::Int, AttrValue::Str(s)) => s.trim().parse::<i64>().ok().map(AttrValue::Int),

            (Self::Double, AttrValue::Double(d)) => Some(AttrValue::Double(*d)),
            (Self::Double, AttrValue::Int(n)) => Some(AttrValue::Double(*n as f64)),
            (Self::Double, AttrValue::Bool(b)) => {
                Some(AttrValue::Double(if *b { 1.0 } else { 0.0 }))
            }
            (Self::Double, AttrValue::Str(s)) => {
                s.trim().parse::<f64>().ok().map(AttrValue::Double)
            }

            (Self::String, other) => Some(AttrValue::Str(other.to_string())),
        }
    }
}
