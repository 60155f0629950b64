//! An insertion-ordered attribute container.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::traits::AttributeMap;

use super::AttrValue;

/// Insertion-ordered attribute set with unique keys.
///
/// Overwriting a key keeps its original position; removing a key preserves
/// the relative order of the rest. Lookups are linear scans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(String, AttrValue)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one attribute and return the updated set.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        let key = key.into();
        self.put(&key, value.into());
        self
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.0.iter().position(|(k, _)| k == key)
    }
}

impl AttributeMap for Attributes {
    fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn put(&mut self, key: &str, value: AttrValue) {
        match self.position(key) {
            Some(idx) => self.0[idx].1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.position(key).map(|idx| self.0.remove(idx).1)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &AttrValue)> + '_> {
        Box::new(self.0.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>> FromIterator<(K, AttrValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, AttrValue)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            let key = k.into();
            attrs.put(&key, v);
        }
        attrs
    }
}

/// Serializes as a JSON object, keys in insertion order.
impl Serialize for Attributes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
