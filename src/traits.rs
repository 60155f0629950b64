use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::types::AttrValue;

/// A mutable key/value attribute set owned by a telemetry record.
///
/// The processor only ever reads, writes and removes single keys; it never
/// replaces the container.
pub trait AttributeMap {
    /// Look up the current value of `key`.
    fn get(&self, key: &str) -> Option<&AttrValue>;

    /// Insert or overwrite `key`.
    fn put(&mut self, key: &str, value: AttrValue);

    /// Remove `key`, returning its previous value.
    fn remove(&mut self, key: &str) -> Option<AttrValue>;

    /// Enumerate every entry, in the container's own order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &AttrValue)> + '_>;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn len(&self) -> usize {
        self.entries().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AttributeMap for BTreeMap<String, AttrValue> {
    fn get(&self, key: &str) -> Option<&AttrValue> {
        BTreeMap::get(self, key)
    }

    fn put(&mut self, key: &str, value: AttrValue) {
        self.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<AttrValue> {
        BTreeMap::remove(self, key)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &AttrValue)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

impl AttributeMap for HashMap<String, AttrValue> {
    fn get(&self, key: &str) -> Option<&AttrValue> {
        HashMap::get(self, key)
    }

    fn put(&mut self, key: &str, value: AttrValue) {
        self.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<AttrValue> {
        HashMap::remove(self, key)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &AttrValue)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

/// Read-only view of the request-scoped transport context.
///
/// Two disjoint namespaces are exposed: `metadata` (zero or more strings per
/// name, e.g. transport headers) and `auth` (at most one opaque value per
/// name, e.g. a token claim).
pub trait RequestContext {
    /// All metadata values registered under `name`, in registration order.
    fn metadata(&self, name: &str) -> Vec<&str>;

    /// The auth attribute registered under `name`, if any.
    fn auth_attribute(&self, name: &str) -> Option<Value>;
}

/// The empty context: no metadata, no auth.
impl RequestContext for () {
    fn metadata(&self, _name: &str) -> Vec<&str> {
        Vec::new()
    }

    fn auth_attribute(&self, _name: &str) -> Option<Value> {
        None
    }
}
