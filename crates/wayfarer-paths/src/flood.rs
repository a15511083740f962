//! Full flood fill and paths read back from its result.

use std::sync::Arc;

use log::warn;
use wayfarer_core::{NavGraph, NodeId};

use crate::arena::SearchArena;
use crate::request::{Flow, SearchCore};
use crate::{PathResult, SearchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Unreached,
    Origin,
    Parent(NodeId),
}

/// Parent links of every node a flood reached.
///
/// Dense: one slot per graph node. Shared between tracers through an
/// [`Arc`].
#[derive(Debug, Clone)]
pub struct FloodMap {
    origin: NodeId,
    links: Vec<Link>,
    costs: Vec<u32>,
    order: Vec<NodeId>,
}

impl FloodMap {
    fn new(origin: NodeId, node_count: usize) -> Self {
        Self {
            origin,
            links: vec![Link::Unreached; node_count],
            costs: vec![0; node_count],
            order: Vec::new(),
        }
    }

    fn insert(&mut self, node: NodeId, parent: Option<NodeId>, cost: u32) {
        let Some(slot) = self.links.get_mut(node.index()) else {
            return;
        };
        *slot = parent.map_or(Link::Origin, Link::Parent);
        self.costs[node.index()] = cost;
        self.order.push(node);
    }

    /// The node the flood started from.
    pub fn origin(&self) -> NodeId {
        self.origin
    }

    /// Whether the flood reached `node`.
    pub fn has_path_to(&self, node: NodeId) -> bool {
        self.links
            .get(node.index())
            .is_some_and(|l| *l != Link::Unreached)
    }

    /// The next node towards the origin. `None` for the origin itself and
    /// for nodes the flood did not reach.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        match self.links.get(node.index()) {
            Some(Link::Parent(p)) => Some(*p),
            _ => None,
        }
    }

    /// Cost of the path from the origin to `node`.
    pub fn cost(&self, node: NodeId) -> Option<u32> {
        self.has_path_to(node).then(|| self.costs[node.index()])
    }

    /// Reached nodes in the order the flood closed them.
    pub fn reached(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes from `node` to the origin, following at most `cap` links.
    pub fn path_to_origin(&self, node: NodeId, cap: usize) -> Result<Vec<NodeId>, SearchError> {
        if !self.has_path_to(node) {
            return Err(SearchError::Unreachable(format!("the flood never reached {node}")));
        }
        let mut nodes = vec![node];
        let mut cur = node;
        while let Some(p) = self.parent(cur) {
            if nodes.len() >= cap {
                warn!("flood trace from {node} exceeded {cap} nodes");
                return Err(SearchError::InvariantViolation(format!(
                    "flood trace exceeded {cap} nodes"
                )));
            }
            nodes.push(p);
            cur = p;
        }
        Ok(nodes)
    }
}

// ---------------------------------------------------------------------------
// Flood
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub(crate) struct Flood {
    map: Option<FloodMap>,
}

impl Flood {
    pub(crate) fn prepare(&mut self, core: &mut SearchCore, graph: &dyn NavGraph) -> Result<(), SearchError> {
        core.start = Some(core.resolve(graph, core.start_point, "start", None)?);
        core.h_target = None;
        Ok(())
    }

    pub(crate) fn mark(&mut self, core: &SearchCore, graph: &dyn NavGraph) {
        if let Some(start) = core.start {
            self.map = Some(FloodMap::new(start.node(), graph.node_count()));
        }
    }

    pub(crate) fn visit(&mut self, arena: &SearchArena, node: NodeId) -> Flow {
        if let (Some(map), Some(r)) = (&mut self.map, arena.record(node)) {
            map.insert(node, r.parent, r.g);
        }
        Flow::Continue
    }

    pub(crate) fn finish(&mut self, result: &mut PathResult) {
        if result.state.has_path() {
            result.flood = self.map.take().map(Arc::new);
        }
    }
}

// ---------------------------------------------------------------------------
// FloodTracer
// ---------------------------------------------------------------------------

pub(crate) struct FloodTracer {
    flood: Arc<FloodMap>,
}

impl FloodTracer {
    pub(crate) fn new(flood: Arc<FloodMap>) -> Self {
        Self { flood }
    }

    pub(crate) fn prepare(&mut self, core: &mut SearchCore, graph: &dyn NavGraph) -> Result<(), SearchError> {
        let flood = &self.flood;
        let reached = |n: NodeId| flood.has_path_to(n);
        core.start = Some(core.resolve(graph, core.start_point, "start", Some(&reached))?);
        Ok(())
    }

    pub(crate) fn trace(&mut self, core: &mut SearchCore, graph: &dyn NavGraph) -> Result<(), SearchError> {
        let start = core.start_node()?;
        let nodes = self.flood.path_to_origin(start, core.config.flood_trace_cap)?;
        core.cost = self.flood.cost(start).unwrap_or(0);
        core.waypoints = core.waypoints(graph, &nodes, core.start, None);
        core.path = nodes;
        Ok(())
    }
}
