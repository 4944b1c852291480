//! Fixed-size slot tables indexed by closed key enums.
//!
//! Scenes, animations and atlases are identified by small `Copy` enums known
//! at compile time. Each key maps to a dense integer slot, so lookups are a
//! bounds-checked index instead of string hashing, and a missing entry is an
//! explicit `None` rather than a silently ignored dictionary miss.

use std::fmt::Debug;
use std::marker::PhantomData;

/// A closed set of identifiers usable as arena slots.
///
/// `index` must return a distinct value in `0..ALL.len()` for every variant.
pub trait ArenaKey: Copy + Eq + Debug + 'static {
    const ALL: &'static [Self];

    fn index(self) -> usize;
}

pub struct Arena<K: ArenaKey, V> {
    slots: Vec<Option<V>>,
    _key: PhantomData<K>,
}

impl<K: ArenaKey, V> Arena<K, V> {
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(K::ALL.len());
        slots.resize_with(K::ALL.len(), || None);
        Self {
            slots,
            _key: PhantomData,
        }
    }

    /// Store `value` under `key`, returning the previous occupant.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.slots[key.index()].replace(value)
    }

    pub fn remove(&mut self, key: K) -> Option<V> {
        self.slots[key.index()].take()
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.slots[key.index()].as_ref()
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.slots[key.index()].as_mut()
    }

    pub fn contains(&self, key: K) -> bool {
        self.slots[key.index()].is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupied entries in key declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        K::ALL
            .iter()
            .filter_map(move |&key| self.slots[key.index()].as_ref().map(|v| (key, v)))
    }
}

impl<K: ArenaKey, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
