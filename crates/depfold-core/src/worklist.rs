//! Identity worklist with a seen set and bulk "done" marking.
//!
//! Items are compared by identity (`NodeId` handles in practice). Each item
//! is enqueued at most once unless a caller explicitly bypasses the seen
//! set, and an item marked done is never handed out again even if it is
//! still sitting in the queue. That second rule lets a whole batch of items
//! discovered together be retired as a unit.
//!
//! Both sets are insertion-ordered so that [`seen_set`](IdentityWorklist::seen_set)
//! iterates reproducibly.

use std::collections::VecDeque;
use std::hash::Hash;

use indexmap::IndexSet;

/// FIFO worklist keyed by item identity.
#[derive(Debug, Clone)]
pub struct IdentityWorklist<T> {
    queue: VecDeque<T>,
    seen: IndexSet<T>,
    done: IndexSet<T>,
}

impl<T: Copy + Eq + Hash> IdentityWorklist<T> {
    /// Creates an empty worklist.
    pub fn new() -> Self {
        IdentityWorklist {
            queue: VecDeque::new(),
            seen: IndexSet::new(),
            done: IndexSet::new(),
        }
    }

    /// Creates a worklist seeded with `items`, skipping duplicates.
    pub fn with_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut worklist = Self::new();
        worklist.add_all_if_not_seen(items);
        worklist
    }

    /// Enqueues `item` at the back unless it has been seen before.
    ///
    /// Returns `true` if the item was enqueued.
    pub fn add_if_not_seen(&mut self, item: T) -> bool {
        if self.seen.insert(item) {
            self.queue.push_back(item);
            true
        } else {
            false
        }
    }

    /// Enqueues every item of `items` that has not been seen before.
    pub fn add_all_if_not_seen(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.add_if_not_seen(item);
        }
    }

    /// Enqueues `item` at the front unless it has been seen before.
    pub fn add_first_if_not_seen(&mut self, item: T) -> bool {
        if self.seen.insert(item) {
            self.queue.push_front(item);
            true
        } else {
            false
        }
    }

    /// Enqueues `item` at the back even if it was seen already.
    pub fn add_ignoring_seen_set(&mut self, item: T) {
        self.seen.insert(item);
        self.queue.push_back(item);
    }

    /// Enqueues `item` at the front even if it was seen already.
    pub fn add_first_ignoring_seen_set(&mut self, item: T) {
        self.seen.insert(item);
        self.queue.push_front(item);
    }

    /// Returns true if `item` was ever added or marked as seen.
    pub fn is_seen(&self, item: T) -> bool {
        self.seen.contains(&item)
    }

    /// Records `item` as seen without enqueuing it.
    pub fn mark_as_seen(&mut self, item: T) -> bool {
        self.seen.insert(item)
    }

    /// Returns the seen set in the order items were first seen.
    pub fn seen_set(&self) -> &IndexSet<T> {
        &self.seen
    }

    /// Marks `item` as done. Returns `false` if it was already done.
    pub fn mark_done(&mut self, item: T) -> bool {
        self.seen.insert(item);
        self.done.insert(item)
    }

    /// Marks every item of `items` as done.
    pub fn mark_all_done(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.mark_done(item);
        }
    }

    /// Returns true if `item` has been marked done.
    pub fn is_done(&self, item: T) -> bool {
        self.done.contains(&item)
    }

    /// Returns true if at least one pending item is not done yet.
    pub fn has_next(&mut self) -> bool {
        self.drop_done_prefix();
        !self.queue.is_empty()
    }

    /// Pops items until `f` has been called on every pending item that is
    /// not done. `f` may enqueue further work.
    pub fn process(&mut self, mut f: impl FnMut(T, &mut Self)) {
        while let Some(item) = self.next() {
            f(item, self);
        }
    }

    fn drop_done_prefix(&mut self) {
        while let Some(front) = self.queue.front() {
            if !self.done.contains(front) {
                break;
            }
            self.queue.pop_front();
        }
    }
}

impl<T: Copy + Eq + Hash> Iterator for IdentityWorklist<T> {
    type Item = T;

    /// Pops the next pending item, skipping anything already marked done.
    ///
    /// Popping does not mark the item done; callers decide when work on it
    /// is finished.
    fn next(&mut self) -> Option<T> {
        self.drop_done_prefix();
        self.queue.pop_front()
    }
}

impl<T: Copy + Eq + Hash> Default for IdentityWorklist<T> {
    fn default() -> Self {
        Self::new()
    }
}
