//! Binary min-heap of open nodes.
//!
//! Entries are keyed by `(f, seq)`. Lower `f` is extracted first; among
//! equal `f` the entry whose key was assigned earliest wins (FIFO). Each
//! record stores its entry's heap position so that decrease-key works in
//! place.

use wayfarer_core::NodeId;

use crate::arena::{NO_HEAP_INDEX, SearchRecord};

#[derive(Debug, Clone, Copy)]
struct Entry {
    node: NodeId,
    f: u32,
    /// Monotonically increasing counter used to break ties.
    seq: u64,
}

impl Entry {
    #[inline]
    fn key(&self) -> (u32, u64) {
        (self.f, self.seq)
    }
}

/// The open list.
#[derive(Debug, Clone, Default)]
pub struct OpenList {
    entries: Vec<Entry>,
    seq: u64,
}

impl OpenList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries and restart the sequence counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.seq = 0;
    }

    fn next_seq(&mut self) -> u64 {
        let s = self.seq;
        self.seq += 1;
        s
    }

    /// Insert `node` keyed by its record's current `f`.
    pub fn push(&mut self, records: &mut [SearchRecord], node: NodeId) {
        let seq = self.next_seq();
        let i = self.entries.len();
        self.entries.push(Entry {
            node,
            f: records[node.index()].f(),
            seq,
        });
        records[node.index()].heap_index = i as u32;
        self.sift_up(records, i);
    }

    /// Extract the entry with the lowest key.
    pub fn pop(&mut self, records: &mut [SearchRecord]) -> Option<NodeId> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(records, 0, last);
        let top = self.entries.pop()?;
        records[top.node.index()].heap_index = NO_HEAP_INDEX;
        if !self.entries.is_empty() {
            self.sift_down(records, 0);
        }
        Some(top.node)
    }

    /// Refresh the key of an open `node` after its record's `f` dropped.
    ///
    /// The entry gets a fresh sequence number. Does nothing if `node` is
    /// not in the list.
    pub fn decrease_key(&mut self, records: &mut [SearchRecord], node: NodeId) {
        let i = records[node.index()].heap_index as usize;
        if i >= self.entries.len() || self.entries[i].node != node {
            return;
        }
        let seq = self.next_seq();
        let e = &mut self.entries[i];
        e.f = records[node.index()].f();
        e.seq = seq;
        self.sift_up(records, i);
    }

    /// Set `h` of every entry's record to `h(node)`, refresh the keys and
    /// restore heap order bottom-up. Sequence numbers are kept.
    pub fn rebuild(&mut self, records: &mut [SearchRecord], mut h: impl FnMut(NodeId) -> u32) {
        for e in self.entries.iter_mut() {
            let r = &mut records[e.node.index()];
            r.h = h(e.node);
            e.f = r.f();
        }
        for i in (0..self.entries.len() / 2).rev() {
            self.sift_down(records, i);
        }
    }

    fn swap(&mut self, records: &mut [SearchRecord], a: usize, b: usize) {
        self.entries.swap(a, b);
        records[self.entries[a].node.index()].heap_index = a as u32;
        records[self.entries[b].node.index()].heap_index = b as u32;
    }

    fn sift_up(&mut self, records: &mut [SearchRecord], mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[i].key() >= self.entries[parent].key() {
                break;
            }
            self.swap(records, i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, records: &mut [SearchRecord], mut i: usize) {
        let n = self.entries.len();
        loop {
            let l = 2 * i + 1;
            let r = l + 1;
            let mut min = i;
            if l < n && self.entries[l].key() < self.entries[min].key() {
                min = l;
            }
            if r < n && self.entries[r].key() < self.entries[min].key() {
                min = r;
            }
            if min == i {
                break;
            }
            self.swap(records, i, min);
            i = min;
        }
    }
}
