//! Handles and identity-keyed tables
//!
//! Namespaces, named entities and namers live in the [`NameGraph`] arena and
//! are referred to by integer handles. Two handles are equal only when they
//! point at the same arena slot, so structural equality of the underlying
//! data never matters.
//!
//! [`NameGraph`]: super::graph::NameGraph

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// A handle that maps one-to-one onto a dense arena index.
pub trait EntityId: Copy + Eq {
    /// Build a handle from an arena index
    fn from_index(index: usize) -> Self;

    /// Arena index of this handle
    fn index(self) -> usize;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl EntityId for $name {
            /// Panics past `u32::MAX` arena slots
            #[inline]
            fn from_index(index: usize) -> Self {
                Self(u32::try_from(index).expect("arena exceeds u32::MAX handles"))
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a namespace
    NamespaceId,
    "ns"
);
entity_id!(
    /// Unique identifier for a named entity
    NamedId,
    "named"
);
entity_id!(
    /// Unique identifier for a registered naming function
    NamerId,
    "namer"
);

/// A partial map keyed by handle identity, backed by a dense vector.
#[derive(Debug, Clone)]
pub struct IdMap<K, V> {
    slots: Vec<Option<V>>,
    len: usize,
    _key: PhantomData<K>,
}

/// Equal when the present entries match; slot padding is ignored.
impl<K: EntityId, V: PartialEq> PartialEq for IdMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: EntityId, V: Eq> Eq for IdMap<K, V> {}

impl<K: EntityId, V> Default for IdMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityId, V> IdMap<K, V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
            _key: PhantomData,
        }
    }

    /// Create a map with room for `capacity` handles
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            len: 0,
            _key: PhantomData,
        }
    }

    /// Insert a value, returning the previous one if the key was present
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = key.index();
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        let previous = self.slots[index].replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.slots.get(key.index()).and_then(Option::as_ref)
    }

    pub fn contains_key(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate present entries in handle order
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|v| (K::from_index(index), v)))
    }
}

/// An insertion-ordered set of handles.
///
/// Membership is tracked with a dense bitmap so `insert` stays O(1) while
/// iteration keeps the order handles were first added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSet<K> {
    order: Vec<K>,
    present: Vec<bool>,
}

impl<K: EntityId> Default for IdSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityId> IdSet<K> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            present: Vec::new(),
        }
    }

    /// Add a handle; returns false if it was already present
    pub fn insert(&mut self, key: K) -> bool {
        let index = key.index();
        if index >= self.present.len() {
            self.present.resize(index + 1, false);
        }
        if self.present[index] {
            return false;
        }
        self.present[index] = true;
        self.order.push(key);
        true
    }

    pub fn contains(&self, key: K) -> bool {
        self.present.get(key.index()).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[K] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().copied()
    }
}

impl<K: EntityId> FromIterator<K> for IdSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}
