//! Ordered, append-only collection deduplicated by domain identity.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Extracts the key that decides whether two values denote the same entity.
pub trait Identified {
    /// Comparable identity key.
    type Key: Clone + Eq + Hash + fmt::Debug;

    /// Returns the identity key.
    fn identity(&self) -> &Self::Key;
}

/// Insertion-ordered set keyed by [`Identified::identity`].
///
/// Inserting a value whose identity is already present is a no-op, so the
/// first-seen representation is kept even when a later payload differs in
/// incidental fields. A hashed index keeps lookups constant-time.
///
/// # Examples
///
/// ```
/// use parley::session::domain::{Contact, IdentitySet};
/// use serde_json::json;
///
/// let mut contacts = IdentitySet::new();
/// let first = Contact::from_payload(&json!({"id": "42", "print_name": "Ada"})).unwrap();
/// let again = Contact::from_payload(&json!({"id": "42", "print_name": "Ada L."})).unwrap();
///
/// assert!(contacts.insert(first));
/// assert!(!contacts.insert(again));
/// assert_eq!(contacts.len(), 1);
/// ```
pub struct IdentitySet<T: Identified> {
    items: Vec<T>,
    index: HashMap<T::Key, usize>,
}

impl<T: Identified> IdentitySet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Appends `item` unless an element with the same identity exists.
    ///
    /// Returns `true` when the item was added.
    pub fn insert(&mut self, item: T) -> bool {
        if self.index.contains_key(item.identity()) {
            return false;
        }
        self.index.insert(item.identity().clone(), self.items.len());
        self.items.push(item);
        true
    }

    /// Returns whether an element with the same identity as `item` exists.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.contains_key(item.identity())
    }

    /// Returns whether an element with identity `key` exists.
    #[must_use]
    pub fn contains_key(&self, key: &T::Key) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the stored element with identity `key`.
    #[must_use]
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.index
            .get(key)
            .and_then(|position| self.items.get(*position))
    }

    /// Returns the number of stored elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates in first-insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns the stored elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Identified + Clone> IdentitySet<T> {
    /// Inserts `item` when absent and returns the stored representation.
    ///
    /// When an element with the same identity already exists, that element
    /// is returned and `item` is discarded.
    pub fn get_or_insert(&mut self, item: T) -> T {
        if let Some(existing) = self.get(item.identity()) {
            return existing.clone();
        }
        let stored = item.clone();
        self.insert(item);
        stored
    }
}

impl<T: Identified> Default for IdentitySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identified + Clone> Clone for IdentitySet<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            index: self.index.clone(),
        }
    }
}

impl<T: Identified + fmt::Debug> fmt::Debug for IdentitySet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(&self.items).finish()
    }
}

impl<T: Identified + PartialEq> PartialEq for IdentitySet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Identified> Extend<T> for IdentitySet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: Identified> FromIterator<T> for IdentitySet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Identified> IntoIterator for IdentitySet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T: Identified> IntoIterator for &'a IdentitySet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
