use std::any::Any;
use std::sync::Arc;

use super::NameValueCollection;
use super::copy_raw;
use super::entry::Entry;
use super::iter::{Generation, Keys, KeysCursor};
use super::policy::{KeyPolicy, default_policy, keys_eq};

/// Linear-scan backend: a plain vector of entries compared through the
/// policy on every lookup.
///
/// O(n) everywhere, which is fine for its job of cross-validating the
/// production backend against the shared contract.
pub struct ListCollection {
    entries: Vec<Entry>,
    policy: Arc<dyn KeyPolicy>,
    generation: Generation,
}

impl Default for ListCollection {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ListCollection {
    /// Create an empty collection with the default case-insensitive policy.
    pub fn new() -> Self {
        Self::with_policy_handle(default_policy())
    }

    /// Empty collection with an explicit key policy.
    pub fn with_policy<P: KeyPolicy + 'static>(policy: P) -> Self {
        Self::with_policy_handle(Arc::new(policy))
    }

    /// Deep copy of another collection's raw values; see
    /// [`NameValueMap::from_collection`][super::NameValueMap::from_collection].
    pub fn from_collection(other: &dyn NameValueCollection) -> Self {
        let mut collection = Self::new();
        copy_raw(&mut collection, other);
        collection
    }

    fn with_policy_handle(policy: Arc<dyn KeyPolicy>) -> Self {
        Self {
            entries: Vec::new(),
            policy,
            generation: Generation::default(),
        }
    }

    fn find(&self, name: Option<&str>) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| keys_eq(&*self.policy, entry.key(), name))
    }

    fn key_vec(&self) -> Vec<Option<String>> {
        self.entries
            .iter()
            .map(|entry| entry.key().map(str::to_owned))
            .collect()
    }
}

impl Clone for ListCollection {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            policy: Arc::clone(&self.policy),
            generation: Generation::default(),
        }
    }
}

impl std::fmt::Debug for ListCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (e.key(), e.values())))
            .finish()
    }
}

impl NameValueCollection for ListCollection {
    fn add(&mut self, name: Option<&str>, value: Option<&str>) {
        match self.find(name) {
            Some(index) => self.entries[index].push(value),
            None => self.entries.push(Entry::new(name, value)),
        }
        self.generation.bump();
    }

    fn set(&mut self, name: Option<&str>, value: Option<&str>) {
        match self.find(name) {
            Some(index) => self.entries[index].replace(value),
            None => self.entries.push(Entry::new(name, value)),
        }
        self.generation.bump();
    }

    fn get(&self, name: Option<&str>) -> Option<String> {
        let index = self.find(name)?;
        self.entries[index].joined()
    }

    fn get_values(&self, name: Option<&str>) -> Option<Vec<String>> {
        let index = self.find(name)?;
        let values = self.entries[index].values();
        if values.is_empty() {
            None
        } else {
            Some(values.to_vec())
        }
    }

    fn remove(&mut self, name: Option<&str>) {
        if let Some(index) = self.find(name) {
            self.entries.remove(index);
            self.generation.bump();
        }
    }

    fn clear(&mut self) {
        self.entries = Vec::new();
        self.generation.bump();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn keys(&self) -> Keys {
        Keys::new(self.key_vec(), self.generation.stamp())
    }

    fn all_keys(&self) -> Vec<Option<String>> {
        self.key_vec()
    }

    fn cursor(&self) -> KeysCursor {
        KeysCursor::new(self.key_vec(), self.generation.stamp())
    }

    fn boxed_clone(&self) -> Box<dyn NameValueCollection> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
