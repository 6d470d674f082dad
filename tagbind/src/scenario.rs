//! Per-scenario key/value storage consulted by `CTXT` tags.

use std::collections::HashMap;

use crate::Value;

/// Key/value store scoped to a single scenario execution.
///
/// Steps record values with [`ScenarioStore::put`] (for example an id
/// returned by a service) and later fixtures reference them as
/// `[CTXT:key]`. Missing keys read as [`Value::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioStore {
    values: HashMap<String, Value>,
}

impl ScenarioStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `key`, returning [`Value::Null`] when it was never stored.
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        self.values.get(key).cloned().unwrap_or_default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        tracing::debug!(key = %key, kind = value.kind(), "storing scenario value");
        self.values.insert(key, value);
    }

    /// Remove `key`, returning the value it held.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Forget every stored value.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ScenarioStore
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (key, value) in iter {
            store.put(key, value);
        }
        store
    }
}
