use std::num::NonZeroUsize;

use crate::dom::NodeId;

/// Bookkeeping for one collection
///
/// `next_index` is the index the next added entry receives. It is bumped on
/// every add and lowered on every remove, so after removing a middle entry
/// the next add can reuse an index that is still present. That matches how
/// form collections on the server side renumber their children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionState {
    next_index: usize,
    entries: Vec<NodeId>,
}

impl CollectionState {
    /// Start from the entries already in the container
    pub fn new(entries: Vec<NodeId>) -> Self {
        Self {
            next_index: entries.len(),
            entries,
        }
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[NodeId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entry: NodeId) -> bool {
        self.entries.contains(&entry)
    }

    /// Whether another add would exceed `max`
    pub fn is_at_capacity(&self, max: Option<NonZeroUsize>) -> bool {
        max.map(|m| self.next_index >= m.get()).unwrap_or(false)
    }

    /// Claim the next index
    pub fn begin_add(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    /// Give back an index claimed by [`begin_add`](Self::begin_add)
    pub fn cancel_add(&mut self) {
        self.next_index = self.next_index.saturating_sub(1);
    }

    pub fn push_entry(&mut self, entry: NodeId) {
        self.entries.push(entry);
    }

    /// Forget `entry` and lower the index; returns the new index
    pub fn remove_entry(&mut self, entry: NodeId) -> usize {
        self.next_index = self.next_index.saturating_sub(1);
        self.entries.retain(|e| *e != entry);
        self.next_index
    }
}
