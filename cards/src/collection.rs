use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Removal was requested for more items than the collection holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsufficientItems;

impl fmt::Display for InsufficientItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collection does not hold the requested items")
    }
}

impl std::error::Error for InsufficientItems {}

/// A counted multiset. Counts are never negative and zero-count entries are
/// not stored, so iteration only ever yields items actually held.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Collection<T: Ord> {
    counts: BTreeMap<T, u32>,
}

impl<T: Ord + Copy> Collection<T> {
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Total number of items held, across all types.
    pub fn size(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Number of items of one type.
    pub fn size_of(&self, item: T) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    /// Number of distinct item types held.
    pub fn unique(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn add(&mut self, item: T) {
        *self.counts.entry(item).or_insert(0) += 1;
    }

    pub fn add_all(&mut self, other: &Collection<T>) {
        for (item, count) in &other.counts {
            *self.counts.entry(*item).or_insert(0) += count;
        }
    }

    pub fn remove(&mut self, item: T) -> Result<(), InsufficientItems> {
        match self.counts.get_mut(&item) {
            Some(count) if *count > 1 => {
                *count -= 1;
                Ok(())
            }
            Some(_) => {
                self.counts.remove(&item);
                Ok(())
            }
            None => Err(InsufficientItems),
        }
    }

    /// Removes every item in `other`. Atomic: availability is verified for
    /// all types before anything is debited, so a failure leaves this
    /// collection untouched.
    pub fn remove_all(&mut self, other: &Collection<T>) -> Result<(), InsufficientItems> {
        for (item, count) in &other.counts {
            if self.size_of(*item) < *count {
                return Err(InsufficientItems);
            }
        }
        for (item, count) in &other.counts {
            let held = self.counts.get_mut(item).expect("availability checked");
            if *held == *count {
                self.counts.remove(item);
            } else {
                *held -= count;
            }
        }
        Ok(())
    }

    /// The two-part superset check used for cost validation: this collection
    /// must hold at least `other`'s count for every type except `ignore`,
    /// AND its total size must cover `other`'s total size. The ignored type
    /// (the wildcard) is thereby payable with surplus of any type.
    pub fn at_least_as_big(&self, other: &Collection<T>, ignore: Option<T>) -> bool {
        for (item, count) in &other.counts {
            if Some(*item) == ignore {
                continue;
            }
            if self.size_of(*item) < *count {
                return false;
            }
        }
        self.size() >= other.size()
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, u32)> + '_ {
        self.counts.iter().map(|(item, count)| (*item, *count))
    }
}

impl<T: Ord + Copy> FromIterator<(T, u32)> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = (T, u32)>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for (item, count) in iter {
            for _ in 0..count {
                collection.add(item);
            }
        }
        collection
    }
}
