use std::sync::Arc;
use std::time::Duration;

use wayfarer_core::{NodeId, Point};

use crate::{FloodMap, SearchError};

/// Terminal state of a request.
///
/// Monotonic: `Complete` and `Partial` are only reached from
/// `NotCalculated`, and nothing leaves `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompleteState {
    #[default]
    NotCalculated,
    Complete,
    /// The target was not reached; the path leads to the closest node found.
    Partial,
    Error,
}

impl CompleteState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Self::NotCalculated
    }

    /// `Complete` or `Partial`.
    #[inline]
    pub fn has_path(self) -> bool {
        matches!(self, Self::Complete | Self::Partial)
    }
}

/// A node with the cost of reaching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode {
    pub node: NodeId,
    pub cost: u32,
}

/// The path to one target of a multi-target search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetPath {
    /// Index of the target in the request's target list.
    pub index: usize,
    /// The node the target point resolved to, if any.
    pub node: Option<NodeId>,
    /// Cost of the path. `None` if the target was not reached.
    pub cost: Option<u32>,
    pub nodes: Vec<NodeId>,
    pub waypoints: Vec<Point>,
}

impl TargetPath {
    pub(crate) fn unreached(index: usize, node: Option<NodeId>) -> Self {
        Self {
            index,
            node,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_reached(&self) -> bool {
        self.cost.is_some()
    }
}

/// Immutable snapshot of a finished request.
#[derive(Debug, Clone, Default)]
pub struct PathResult {
    pub(crate) state: CompleteState,
    pub(crate) error: Option<SearchError>,
    pub(crate) path: Vec<NodeId>,
    pub(crate) waypoints: Vec<Point>,
    pub(crate) cost: u32,
    pub(crate) searched_nodes: u32,
    pub(crate) duration: Duration,
    pub(crate) flood: Option<Arc<FloodMap>>,
    pub(crate) reachable: Vec<PathNode>,
    pub(crate) targets: Vec<TargetPath>,
    pub(crate) chosen_target: Option<usize>,
}

impl PathResult {
    pub fn state(&self) -> CompleteState {
        self.state
    }

    pub fn error(&self) -> Option<&SearchError> {
        self.error.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.state == CompleteState::Complete
    }

    pub fn is_partial(&self) -> bool {
        self.state == CompleteState::Partial
    }

    pub fn is_error(&self) -> bool {
        self.state == CompleteState::Error
    }

    /// Nodes from the seed to the end of the path.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// World positions along the path.
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    /// Last node of the path.
    pub fn end_node(&self) -> Option<NodeId> {
        self.path.last().copied()
    }

    /// Accumulated cost of the path.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Nodes dequeued by the search.
    pub fn searched_nodes(&self) -> u32 {
        self.searched_nodes
    }

    /// Wall-clock time from preparation to delivery.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The flood map of a [`flood`](crate::PathRequest::flood) request.
    pub fn flood(&self) -> Option<&Arc<FloodMap>> {
        self.flood.as_ref()
    }

    /// Nodes of a [`within_cost`](crate::PathRequest::within_cost) request,
    /// in the order they were reached.
    pub fn reachable(&self) -> &[PathNode] {
        &self.reachable
    }

    /// Per-target paths of a multi-target request, in target order.
    pub fn targets(&self) -> &[TargetPath] {
        &self.targets
    }

    /// Index of the target whose path is the primary path.
    pub fn chosen_target(&self) -> Option<usize> {
        self.chosen_target
    }
}
