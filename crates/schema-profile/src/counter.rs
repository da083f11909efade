//! Key path occurrence counting.

use std::collections::{BTreeMap, HashMap};

/// Map from key path to occurrence count.
///
/// Entries are created on first occurrence and only ever grow; there is no
/// eviction and no cap. Container-valued keys are counted at the container
/// level and their descendants are counted again under their own paths.
#[derive(Debug, Default)]
pub struct PathCounter {
    counts: HashMap<String, u64>,
}

impl PathCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `path`.
    pub fn increment(&mut self, path: &str) {
        if let Some(count) = self.counts.get_mut(path) {
            *count += 1;
        } else {
            self.counts.insert(path.to_owned(), 1);
        }
    }

    /// Occurrence count for a path, zero when never seen.
    pub fn get(&self, path: &str) -> u64 {
        self.counts.get(path).copied().unwrap_or(0)
    }

    /// Number of distinct paths discovered so far.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all occurrence counts.
    pub fn total_occurrences(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Ordered snapshot for report assembly.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counts
            .iter()
            .map(|(path, count)| (path.clone(), *count))
            .collect()
    }
}
