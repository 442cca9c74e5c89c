//! Map storage with deterministic iteration.

use rustc_hash::FxHashMap;

use crate::Value;

/// Key/value store behind a map handle.
///
/// Entries are kept in insertion order (removal moves the last entry into the
/// vacated slot), so iteration is deterministic and visits each key once.
#[derive(Clone, Debug, Default)]
pub struct MapStore {
    entries: Vec<(Value, Value)>,
    index: FxHashMap<Value, usize>,
}

impl MapStore {
    /// Insert or overwrite. Returns the previous value for `key`.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        if let Some(&at) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[at].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.index.get(key).map(|&at| &self.entries[at].1)
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        let at = *self.index.get(key)?;
        Some(&mut self.entries[at].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.index.contains_key(key)
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let at = self.index.remove(key)?;
        let (_, value) = self.entries.swap_remove(at);
        if let Some((moved, _)) = self.entries.get(at) {
            self.index.insert(moved.clone(), at);
        }
        Some(value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at position `at` in iteration order.
    #[inline]
    pub fn entry_at(&self, at: usize) -> Option<(&Value, &Value)> {
        self.entries.get(at).map(|(k, v)| (k, v))
    }

    /// Entries in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}
