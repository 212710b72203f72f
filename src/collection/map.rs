use std::any::Any;
use std::sync::Arc;

use super::NameValueCollection;
use super::copy_raw;
use super::entry::Entry;
use super::error::CapacityError;
use super::iter::{Generation, Iter, Keys, KeysCursor};
use super::policy::{KeyPolicy, default_policy, hash_key, keys_eq};

/// Probe-table slot mapping a key hash onto an index into the
/// insertion-ordered entry vector.
#[derive(Clone, Copy, Debug)]
enum Slot {
    Empty,
    Occupied { hash: u64, index: usize },
    /// Left behind by removals so probe chains stay intact.
    Tombstone,
}

/// Production backend: ordered multimap with policy-driven key identity.
///
/// Entries live in an insertion-ordered vector; lookups go through an
/// open-addressed probe table with power-of-two capacity and linear probing.
pub struct NameValueMap {
    entries: Vec<Entry>,
    slots: Vec<Slot>,
    graves: usize,
    policy: Arc<dyn KeyPolicy>,
    generation: Generation,
}

impl Default for NameValueMap {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl NameValueMap {
    /// Create an empty map with the default case-insensitive policy.
    ///
    /// This function does not allocate.
    pub fn new() -> Self {
        Self::with_policy_handle(default_policy())
    }

    /// Empty map with a capacity hint. `0` is valid and does not allocate.
    ///
    /// # Panics
    ///
    /// Panics when the request cannot be satisfied; use
    /// [`try_with_capacity`][NameValueMap::try_with_capacity] to handle that
    /// case.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(map) => map,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible [`with_capacity`][NameValueMap::with_capacity].
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] when the allocation cannot be satisfied.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Self::try_alloc(capacity, default_policy())
    }

    /// Empty map with an explicit key policy.
    pub fn with_policy<P: KeyPolicy + 'static>(policy: P) -> Self {
        Self::with_policy_handle(Arc::new(policy))
    }

    /// Capacity hint plus explicit key policy.
    ///
    /// # Panics
    ///
    /// Panics when the request cannot be satisfied; use
    /// [`try_with_capacity_and_policy`][NameValueMap::try_with_capacity_and_policy]
    /// to handle that case.
    pub fn with_capacity_and_policy<P: KeyPolicy + 'static>(capacity: usize, policy: P) -> Self {
        match Self::try_alloc(capacity, Arc::new(policy)) {
            Ok(map) => map,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible
    /// [`with_capacity_and_policy`][NameValueMap::with_capacity_and_policy].
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] when the allocation cannot be satisfied.
    pub fn try_with_capacity_and_policy<P: KeyPolicy + 'static>(
        capacity: usize,
        policy: P,
    ) -> Result<Self, CapacityError> {
        Self::try_alloc(capacity, Arc::new(policy))
    }

    /// Deep copy of another collection's raw values, preserving key order
    /// and entries whose only contribution was a null value.
    ///
    /// The copy owns its data: later mutations of `other` never show here.
    /// The default key policy applies; the contract exposes no way to
    /// recover the source's comparer.
    pub fn from_collection(other: &dyn NameValueCollection) -> Self {
        let mut map = Self::with_capacity(other.len());
        copy_raw(&mut map, other);
        map
    }

    fn with_policy_handle(policy: Arc<dyn KeyPolicy>) -> Self {
        Self {
            entries: Vec::new(),
            slots: Vec::new(),
            graves: 0,
            policy,
            generation: Generation::default(),
        }
    }

    fn try_alloc(capacity: usize, policy: Arc<dyn KeyPolicy>) -> Result<Self, CapacityError> {
        let mut map = Self::with_policy_handle(policy);
        if capacity == 0 {
            return Ok(map);
        }
        let cap = capacity
            .checked_next_power_of_two()
            .ok_or(CapacityError {})?
            .max(4);
        map.slots.try_reserve_exact(cap).map_err(|_| CapacityError {})?;
        map.slots.resize(cap, Slot::Empty);
        map.entries.try_reserve(capacity).map_err(|_| CapacityError {})?;
        Ok(map)
    }
}

// ===== Lookup =====

impl NameValueMap {
    /// Number of distinct entries, not total values.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if any entry matches `name` under the active policy.
    pub fn contains_key<'n>(&self, name: impl Into<Option<&'n str>>) -> bool {
        self.find(name.into()).is_some()
    }

    /// Comma-joined value string for `name`.
    ///
    /// `None` when no entry matches, or when the matching entry only ever
    /// saw null values.
    pub fn get<'n>(&self, name: impl Into<Option<&'n str>>) -> Option<String> {
        let index = self.find(name.into())?;
        self.entries[index].joined()
    }

    /// Raw ordered values for `name`; `None` when absent or empty.
    pub fn get_values<'n>(&self, name: impl Into<Option<&'n str>>) -> Option<Vec<String>> {
        let index = self.find(name.into())?;
        let values = self.entries[index].values();
        if values.is_empty() {
            None
        } else {
            Some(values.to_vec())
        }
    }

    /// Iterator over `(display key, values)` in first-insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.entries)
    }

    /// Snapshot view of display keys in first-insertion order.
    pub fn keys(&self) -> Keys {
        Keys::new(self.key_vec(), self.generation.stamp())
    }

    /// Eager display-key snapshot, immune to later mutation.
    pub fn all_keys(&self) -> Vec<Option<String>> {
        self.key_vec()
    }

    /// Fail-fast cursor over display keys; see [`KeysCursor`].
    pub fn cursor(&self) -> KeysCursor {
        KeysCursor::new(self.key_vec(), self.generation.stamp())
    }

    fn key_vec(&self) -> Vec<Option<String>> {
        self.entries
            .iter()
            .map(|entry| entry.key().map(str::to_owned))
            .collect()
    }

    fn find(&self, name: Option<&str>) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let hash = hash_key(&*self.policy, name);
        let mask = self.slots.len() - 1;
        let mut index = hash as usize & mask;
        loop {
            match self.slots[index] {
                Slot::Occupied { hash: h, index: entry } => {
                    if h == hash && keys_eq(&*self.policy, self.entries[entry].key(), name) {
                        return Some(entry);
                    }
                }
                Slot::Tombstone => {}
                // probe chains always end on an empty slot, the load factor
                // keeps some around
                Slot::Empty => return None,
            }
            index = (index + 1) & mask;
        }
    }
}

// ===== Mutation =====

const LOAD_FACTOR: f64 = 0.7;

impl NameValueMap {
    /// Append `value` under `name`, creating the entry on first sight.
    ///
    /// The display key keeps the casing of the first insertion; a null value
    /// registers the key without contributing to the value list.
    pub fn add<'n, 'v>(
        &mut self,
        name: impl Into<Option<&'n str>>,
        value: impl Into<Option<&'v str>>,
    ) {
        let (name, value) = (name.into(), value.into());
        match self.find(name) {
            Some(index) => self.entries[index].push(value),
            None => self.insert_entry(Entry::new(name, value)),
        }
        self.generation.bump();
    }

    /// Append every key of `other` as `self.add(key, other.get(key))`, in
    /// `other`'s key order: a shallow merge of joined values.
    pub fn merge(&mut self, other: &dyn NameValueCollection) {
        NameValueCollection::merge(self, other);
    }

    /// Replace the whole value list for `name` with the single `value`,
    /// creating the entry if absent.
    pub fn set<'n, 'v>(
        &mut self,
        name: impl Into<Option<&'n str>>,
        value: impl Into<Option<&'v str>>,
    ) {
        let (name, value) = (name.into(), value.into());
        match self.find(name) {
            Some(index) => self.entries[index].replace(value),
            None => self.insert_entry(Entry::new(name, value)),
        }
        self.generation.bump();
    }

    /// Remove the whole entry matching `name`.
    ///
    /// A miss is a no-op and does not invalidate live cursors.
    pub fn remove<'n>(&mut self, name: impl Into<Option<&'n str>>) {
        let name = name.into();
        if self.entries.is_empty() {
            return;
        }
        let hash = hash_key(&*self.policy, name);
        let mask = self.slots.len() - 1;
        let mut index = hash as usize & mask;
        let entry = loop {
            match self.slots[index] {
                Slot::Occupied { hash: h, index: entry } => {
                    if h == hash && keys_eq(&*self.policy, self.entries[entry].key(), name) {
                        break entry;
                    }
                }
                Slot::Tombstone => {}
                Slot::Empty => return,
            }
            index = (index + 1) & mask;
        };

        self.slots[index] = Slot::Tombstone;
        self.graves += 1;
        self.entries.remove(entry);

        // later entries shifted down by one
        for slot in &mut self.slots {
            if let Slot::Occupied { index, .. } = slot
                && *index > entry
            {
                *index -= 1;
            }
        }
        self.generation.bump();
    }

    /// Drop every entry and all capacity, back to the freshly constructed
    /// state.
    pub fn clear(&mut self) {
        self.entries = Vec::new();
        self.slots = Vec::new();
        self.graves = 0;
        self.generation.bump();
    }

    fn insert_entry(&mut self, entry: Entry) {
        self.reserve_one();
        let hash = hash_key(&*self.policy, entry.key());
        let mask = self.slots.len() - 1;
        let mut index = hash as usize & mask;
        loop {
            match self.slots[index] {
                Slot::Empty => break,
                // the key is known absent, the first grave is free to reuse
                Slot::Tombstone => {
                    self.graves -= 1;
                    break;
                }
                Slot::Occupied { .. } => index = (index + 1) & mask,
            }
        }
        self.slots[index] = Slot::Occupied {
            hash,
            index: self.entries.len(),
        };
        self.entries.push(entry);
    }

    fn reserve_one(&mut self) {
        let cap = self.slots.len();
        if cap == 0 || (self.entries.len() + self.graves + 1) as f64 / cap as f64 > LOAD_FACTOR {
            self.grow();
        }
    }

    fn grow(&mut self) {
        let cap = match self.slots.len() {
            0 => 4,
            n => n << 1,
        };
        let mut slots = vec![Slot::Empty; cap];
        let mask = cap - 1;

        for (entry_index, entry) in self.entries.iter().enumerate() {
            let hash = hash_key(&*self.policy, entry.key());
            let mut index = hash as usize & mask;
            while let Slot::Occupied { .. } = slots[index] {
                index = (index + 1) & mask;
            }
            slots[index] = Slot::Occupied {
                hash,
                index: entry_index,
            };
        }

        self.slots = slots;
        self.graves = 0;
    }
}

// ===== Traits =====

impl Clone for NameValueMap {
    /// Deep copy with independently owned entries and a fresh generation;
    /// cursors of the source ignore mutations of the clone and vice versa.
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            slots: self.slots.clone(),
            graves: self.graves,
            policy: Arc::clone(&self.policy),
            generation: Generation::default(),
        }
    }
}

impl std::fmt::Debug for NameValueMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a NameValueMap {
    type Item = <Iter<'a> as Iterator>::Item;
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl NameValueCollection for NameValueMap {
    fn add(&mut self, name: Option<&str>, value: Option<&str>) {
        NameValueMap::add(self, name, value);
    }

    fn set(&mut self, name: Option<&str>, value: Option<&str>) {
        NameValueMap::set(self, name, value);
    }

    fn get(&self, name: Option<&str>) -> Option<String> {
        NameValueMap::get(self, name)
    }

    fn get_values(&self, name: Option<&str>) -> Option<Vec<String>> {
        NameValueMap::get_values(self, name)
    }

    fn remove(&mut self, name: Option<&str>) {
        NameValueMap::remove(self, name);
    }

    fn clear(&mut self) {
        NameValueMap::clear(self);
    }

    fn len(&self) -> usize {
        NameValueMap::len(self)
    }

    fn keys(&self) -> Keys {
        NameValueMap::keys(self)
    }

    fn all_keys(&self) -> Vec<Option<String>> {
        NameValueMap::all_keys(self)
    }

    fn cursor(&self) -> KeysCursor {
        NameValueMap::cursor(self)
    }

    fn boxed_clone(&self) -> Box<dyn NameValueCollection> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
