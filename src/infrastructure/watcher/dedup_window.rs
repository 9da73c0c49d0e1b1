//! Bounded FIFO set of recently seen entry identifiers.

use std::collections::{HashSet, VecDeque};

/// Default number of identifiers remembered by a watcher.
pub const DEFAULT_DEDUP_WINDOW: usize = 1024;

/// Remembers the last `capacity` identifiers in insertion order.
///
/// The queue and the index always hold the same identifiers: evicting the
/// oldest entry removes it from both in the same call.
#[derive(Debug, Clone)]
pub struct DedupWindow {
    order: VecDeque<String>,
    index: HashSet<String>,
    capacity: usize,
}

impl DedupWindow {
    /// Creates an empty window (capacity is at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            order: VecDeque::with_capacity(capacity),
            index: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Remembers `id`, evicting the oldest identifiers beyond capacity.
    ///
    /// Returns `false` if `id` was already known, in which case nothing
    /// changes.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.index.contains(&id) {
            return false;
        }

        self.index.insert(id.clone());
        self.order.push_back(id);

        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.index.remove(&oldest);
            }
        }

        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DedupWindow {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_WINDOW)
    }
}
