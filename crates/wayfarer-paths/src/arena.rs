//! Generation-stamped per-node search state.

use std::ops::{BitAnd, BitOr, Not};

use wayfarer_core::NodeId;

use crate::heap::OpenList;

// ---------------------------------------------------------------------------
// RecordFlags
// ---------------------------------------------------------------------------

/// Scratch bits a search places on specific records.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct RecordFlags(pub u8);

impl RecordFlags {
    pub const NONE: Self = Self(0);
    /// The node is one of a multi-target search's unresolved targets.
    pub const TARGET: Self = Self(1 << 0);
    /// Edges touching the node get their cost rescaled to the exact endpoint.
    pub const SPECIAL_COST: Self = Self(1 << 1);

    /// Whether this mask contains all the bits from `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for RecordFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for RecordFlags {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for RecordFlags {
    type Output = Self;
    #[inline]
    fn not(self) -> Self {
        Self(!self.0)
    }
}

// ---------------------------------------------------------------------------
// SearchRecord
// ---------------------------------------------------------------------------

/// Where a node stands within the current search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum NodeStatus {
    #[default]
    New,
    Open,
    Closed,
}

pub(crate) const NO_HEAP_INDEX: u32 = u32::MAX;

/// Search bookkeeping for one graph node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRecord {
    /// Search generation this record was last initialised for.
    pub generation: u32,
    pub parent: Option<NodeId>,
    /// Cost from the seed.
    pub g: u32,
    /// Heuristic estimate to the target.
    pub h: u32,
    pub status: NodeStatus,
    pub flags: RecordFlags,
    pub(crate) heap_index: u32,
}

impl Default for SearchRecord {
    fn default() -> Self {
        Self {
            generation: 0,
            parent: None,
            g: 0,
            h: 0,
            status: NodeStatus::New,
            flags: RecordFlags::NONE,
            heap_index: NO_HEAP_INDEX,
        }
    }
}

impl SearchRecord {
    /// `g + h`, saturating.
    #[inline]
    pub fn f(&self) -> u32 {
        self.g.saturating_add(self.h)
    }

    fn reset(&mut self, generation: u32) {
        *self = Self {
            generation,
            ..Self::default()
        };
    }
}

// ---------------------------------------------------------------------------
// SearchArena
// ---------------------------------------------------------------------------

/// Reusable storage for one search at a time.
///
/// Records are never cleared between searches. Starting a search bumps the
/// generation, and a record whose stamp differs from it is treated as never
/// visited, so repeated searches cost nothing up front.
#[derive(Debug, Clone, Default)]
pub struct SearchArena {
    generation: u32,
    records: Vec<SearchRecord>,
    open: OpenList,
    /// Scratch buffer for neighbour queries.
    pub(crate) nbuf: Vec<(NodeId, u32)>,
}

impl SearchArena {
    /// Create an arena for graphs of up to `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            generation: 0,
            records: vec![SearchRecord::default(); node_count],
            open: OpenList::new(),
            nbuf: Vec::with_capacity(8),
        }
    }

    /// The current search generation. Zero until the first search.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Number of node slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Grow storage to hold at least `node_count` nodes.
    pub fn ensure_capacity(&mut self, node_count: usize) {
        if node_count > self.records.len() {
            self.records.resize(node_count, SearchRecord::default());
        }
    }

    /// Start a new search: bump the generation and empty the open list.
    ///
    /// When the generation counter wraps, every record is cleared once so
    /// that no stale stamp can match the new generation.
    pub fn begin_search(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            log::debug!("search generation wrapped, clearing {} records", self.records.len());
            for r in self.records.iter_mut() {
                *r = SearchRecord::default();
            }
            self.generation = 1;
        }
        self.open.clear();
        self.generation
    }

    /// The record of `node` if it was touched by the current search.
    #[inline]
    pub fn record(&self, node: NodeId) -> Option<&SearchRecord> {
        self.records
            .get(node.index())
            .filter(|r| self.generation != 0 && r.generation == self.generation)
    }

    /// The record of `node`, reinitialised first if it is stale.
    ///
    /// # Panics
    ///
    /// Panics if `node` is beyond [`capacity`](Self::capacity).
    #[inline]
    pub fn record_mut(&mut self, node: NodeId) -> &mut SearchRecord {
        let generation = self.generation;
        let r = &mut self.records[node.index()];
        if r.generation != generation {
            r.reset(generation);
        }
        r
    }

    /// Like [`record`](Self::record), but mutable.
    #[inline]
    pub(crate) fn record_current_mut(&mut self, node: NodeId) -> Option<&mut SearchRecord> {
        let generation = self.generation;
        self.records
            .get_mut(node.index())
            .filter(|r| generation != 0 && r.generation == generation)
    }

    /// Number of open nodes.
    #[inline]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    #[inline]
    pub fn open_is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Mark `node` open and insert it keyed by its record's `f`.
    pub(crate) fn push_open(&mut self, node: NodeId) {
        self.record_mut(node).status = NodeStatus::Open;
        self.open.push(&mut self.records, node);
    }

    /// Extract the open node with the lowest key and mark it closed.
    pub(crate) fn pop_open(&mut self) -> Option<NodeId> {
        let node = self.open.pop(&mut self.records)?;
        self.records[node.index()].status = NodeStatus::Closed;
        Some(node)
    }

    /// Reposition an open node after its `g` dropped.
    pub(crate) fn decrease_key(&mut self, node: NodeId) {
        self.open.decrease_key(&mut self.records, node);
    }

    /// Recompute `h` of every open node and restore heap order.
    pub(crate) fn rebuild_open(&mut self, h: impl FnMut(NodeId) -> u32) {
        self.open.rebuild(&mut self.records, h);
    }
}
