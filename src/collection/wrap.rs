use std::any::Any;

use super::NameValueCollection;
use super::iter::{Keys, KeysCursor};
use super::map::NameValueMap;
use super::policy::KeyPolicy;

/// Adapter backend that owns another collection and forwards the whole
/// contract to it.
///
/// Mirrors the legacy pattern of a public collection type carrying a nested
/// store. Cloning reproduces the nested backend's concrete type by going
/// through [`boxed_clone`][NameValueCollection::boxed_clone] on the inner
/// handle.
#[derive(Debug)]
pub struct WrappedCollection {
    inner: Box<dyn NameValueCollection>,
}

impl Default for WrappedCollection {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl WrappedCollection {
    /// Wrap a fresh [`NameValueMap`].
    pub fn new() -> Self {
        Self {
            inner: Box::new(NameValueMap::new()),
        }
    }

    /// Wrap a fresh [`NameValueMap`] with an explicit key policy.
    pub fn with_policy<P: KeyPolicy + 'static>(policy: P) -> Self {
        Self {
            inner: Box::new(NameValueMap::with_policy(policy)),
        }
    }

    /// Wrap an existing backend.
    pub fn wrapping(inner: Box<dyn NameValueCollection>) -> Self {
        Self { inner }
    }

    /// Deep copy of another collection's raw values into a fresh wrapped
    /// map.
    pub fn from_collection(other: &dyn NameValueCollection) -> Self {
        Self {
            inner: Box::new(NameValueMap::from_collection(other)),
        }
    }

    /// The nested backend.
    pub fn inner(&self) -> &dyn NameValueCollection {
        &*self.inner
    }
}

impl Clone for WrappedCollection {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.boxed_clone(),
        }
    }
}

impl NameValueCollection for WrappedCollection {
    fn add(&mut self, name: Option<&str>, value: Option<&str>) {
        self.inner.add(name, value);
    }

    fn set(&mut self, name: Option<&str>, value: Option<&str>) {
        self.inner.set(name, value);
    }

    fn get(&self, name: Option<&str>) -> Option<String> {
        self.inner.get(name)
    }

    fn get_values(&self, name: Option<&str>) -> Option<Vec<String>> {
        self.inner.get_values(name)
    }

    fn remove(&mut self, name: Option<&str>) {
        self.inner.remove(name);
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn keys(&self) -> Keys {
        self.inner.keys()
    }

    fn all_keys(&self) -> Vec<Option<String>> {
        self.inner.all_keys()
    }

    fn cursor(&self) -> KeysCursor {
        self.inner.cursor()
    }

    fn boxed_clone(&self) -> Box<dyn NameValueCollection> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
