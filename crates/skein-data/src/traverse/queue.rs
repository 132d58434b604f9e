// SPDX-License-Identifier: Apache-2.0
//! FIFO visit queue with write-once depth bookkeeping.

use std::collections::VecDeque;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// FIFO queue that records the depth each item was first seen at.
///
/// Depths are write-once: after an item has been added or visited, later
/// `add` and `visit` calls for it are no-ops. An item is therefore enqueued
/// at most once, and FIFO order reflects first insertion regardless of how
/// often callers re-submit it.
#[derive(Debug, Clone)]
pub struct VisitQueue<T> {
    queue: VecDeque<T>,
    depth: FxHashMap<T, u32>,
}

impl<T> Default for VisitQueue<T> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            depth: FxHashMap::default(),
        }
    }
}

impl<T> VisitQueue<T> {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending (not yet popped) items.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop all pending items and every depth record.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.depth.clear();
    }
}

impl<T: Copy + Eq + Hash> VisitQueue<T> {
    /// Enqueue `item` at `depth` unless it was already seen.
    pub fn add(&mut self, item: T, depth: u32) {
        if let std::collections::hash_map::Entry::Vacant(slot) = self.depth.entry(item) {
            slot.insert(depth);
            self.queue.push_back(item);
        }
    }

    /// Record `item` at `depth` without enqueueing, unless already seen.
    pub fn visit(&mut self, item: T, depth: u32) {
        self.depth.entry(item).or_insert(depth);
    }

    /// Depth `item` was first seen at, if ever.
    pub fn depth(&self, item: &T) -> Option<u32> {
        self.depth.get(item).copied()
    }

    /// Pop the oldest pending item.
    pub fn pop_front(&mut self) -> Option<T> {
        self.queue.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_of_first_insertion() {
        let mut q = VisitQueue::new();
        q.add('a', 0);
        q.add('b', 1);
        q.add('a', 5); // ignored
        q.add('c', 1);
        assert_eq!(q.pop_front(), Some('a'));
        assert_eq!(q.pop_front(), Some('b'));
        assert_eq!(q.pop_front(), Some('c'));
        assert_eq!(q.pop_front(), None);
    }

    #[test]
    fn depth_is_write_once() {
        let mut q = VisitQueue::new();
        q.add(7_u32, 2);
        q.visit(7_u32, 9);
        q.add(7_u32, 0);
        assert_eq!(q.depth(&7), Some(2));
    }

    #[test]
    fn visit_records_without_enqueueing() {
        let mut q = VisitQueue::new();
        q.visit('x', 3);
        assert_eq!(q.depth(&'x'), Some(3));
        assert!(q.is_empty());
        // A visited item is never enqueued later either.
        q.add('x', 1);
        assert!(q.is_empty());
        assert_eq!(q.depth(&'x'), Some(3));
    }

    #[test]
    fn unseen_items_have_no_depth() {
        let q: VisitQueue<u8> = VisitQueue::new();
        assert_eq!(q.depth(&1), None);
    }

    #[test]
    fn clear_resets_depths_too() {
        let mut q = VisitQueue::new();
        q.add(1_u8, 0);
        q.clear();
        assert_eq!(q.depth(&1), None);
        assert!(q.is_empty());
        q.add(1_u8, 4);
        assert_eq!(q.depth(&1), Some(4));
        assert_eq!(q.len(), 1);
    }
}
