//! Keyed three-way change sets.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// Entries added, deleted and updated between two snapshots.
///
/// `updated` holds the value from the newer snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet<T> {
    pub added: Vec<T>,
    pub deleted: Vec<T>,
    pub updated: Vec<T>,
}

impl<T> ChangeSet<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.updated.is_empty()
    }

    /// Total number of changed entries.
    pub fn len(&self) -> usize {
        self.added.len() + self.deleted.len() + self.updated.len()
    }
}

impl<T> Default for ChangeSet<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            deleted: Vec::new(),
            updated: Vec::new(),
        }
    }
}

/// An entity matched across snapshots by an identity key.
pub trait Keyed {
    type Key: Eq + Hash + ?Sized;

    fn key(&self) -> &Self::Key;
}

/// Compare two ordered entity lists by identity key.
///
/// `added` and `updated` follow the order of `new`, `deleted` the order of
/// `current`. When a key repeats, the first occurrence wins.
pub fn diff_keyed<T>(current: &[T], new: &[T]) -> ChangeSet<T>
where
    T: Keyed + PartialEq + Clone + Debug,
{
    let mut current_by_key: HashMap<&T::Key, &T> = HashMap::with_capacity(current.len());
    for entry in current {
        current_by_key.entry(entry.key()).or_insert(entry);
    }
    let new_keys: HashSet<&T::Key> = new.iter().map(Keyed::key).collect();

    let mut changes = ChangeSet::default();
    for entry in new {
        match current_by_key.get(entry.key()) {
            None => changes.added.push(entry.clone()),
            Some(previous) if *previous != entry => {
                tracing::debug!(current = ?previous, new = ?entry, "Config entry changed");
                changes.updated.push(entry.clone());
            }
            Some(_) => {}
        }
    }

    for entry in current {
        if !new_keys.contains(entry.key()) {
            changes.deleted.push(entry.clone());
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        key: String,
        value: u32,
    }

    impl Keyed for Item {
        type Key = str;

        fn key(&self) -> &str {
            &self.key
        }
    }

    fn item(key: &str, value: u32) -> Item {
        Item { key: key.to_string(), value }
    }

    #[test]
    fn test_output_order() {
        let current = vec![item("d", 1), item("b", 1), item("c", 1), item("a", 1)];
        let new = vec![item("z", 1), item("a", 2), item("y", 1), item("b", 2)];

        let changes = diff_keyed(&current, &new);
        assert_eq!(changes.added, vec![item("z", 1), item("y", 1)]);
        assert_eq!(changes.updated, vec![item("a", 2), item("b", 2)]);
        assert_eq!(changes.deleted, vec![item("d", 1), item("c", 1)]);
        assert_eq!(changes.len(), 6);
    }

    #[test]
    fn test_empty_inputs() {
        let changes = diff_keyed::<Item>(&[], &[]);
        assert!(changes.is_empty());

        let changes = diff_keyed(&[], &[item("a", 1)]);
        assert_eq!(changes.added, vec![item("a", 1)]);
        assert!(changes.deleted.is_empty());
    }
}
