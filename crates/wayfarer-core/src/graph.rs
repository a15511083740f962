use std::fmt;

use crate::Point;

/// Stable handle of a navigation graph node.
///
/// Handles are dense: a graph with `node_count() == n` uses the ids
/// `0..n`, which lets searches keep per-node state in flat arrays.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// The id as an index into per-node arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only attributes of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeInfo {
    /// World position of the node.
    pub position: Point,
    /// Connectivity label. Two nodes share an area iff each is reachable
    /// from the other.
    pub area: u32,
    pub walkable: bool,
    /// Tag in `0..32`, used for per-request tag masks and penalties.
    pub tag: u32,
    /// Extra cost for entering the node.
    pub penalty: u32,
}

/// Result of a nearest-node query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NearestNode {
    pub node: NodeId,
    /// The queried point moved onto the node's surface.
    pub position: Point,
}

/// The navigation graph a search runs on.
///
/// Implementations own the nodes, edges and spatial lookup. Searches only
/// read from them.
pub trait NavGraph {
    /// Number of node slots; every [`NodeId`] handed out is below this.
    fn node_count(&self) -> usize;

    /// Attributes of `id`.
    fn node(&self, id: NodeId) -> NodeInfo;

    /// Call `f(neighbor, cost)` for every outgoing edge of `id`, in a fixed
    /// order. Costs are in world units.
    fn for_each_edge(&self, id: NodeId, f: &mut dyn FnMut(NodeId, u32));

    /// Nearest node to `p` accepted by `filter`, with `p` snapped onto it.
    fn nearest(&self, p: Point, filter: &dyn Fn(NodeId, &NodeInfo) -> bool) -> Option<NearestNode>;

    /// Position of `id`.
    #[inline]
    fn position(&self, id: NodeId) -> Point {
        self.node(id).position
    }
}
