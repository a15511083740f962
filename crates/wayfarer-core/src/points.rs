//! A navigation graph of free-standing points joined by explicit edges.
//!
//! Useful for waypoint networks and for hand-built test graphs where edge
//! costs should not follow from geometry.

use crate::area::label_areas;
use crate::graph::{NavGraph, NearestNode, NodeId, NodeInfo};
use crate::Point;

#[derive(Debug, Clone)]
struct PointNode {
    position: Point,
    walkable: bool,
    tag: u32,
    penalty: u32,
    /// Outgoing `(neighbor, cost)` pairs in insertion order.
    edges: Vec<(NodeId, u32)>,
}

/// Explicit-edge [`NavGraph`]. Ids are assigned sequentially.
#[derive(Debug, Clone, Default)]
pub struct PointGraph {
    nodes: Vec<PointNode>,
    areas: Vec<u32>,
}

impl PointGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a walkable node at `position`. Returns its id.
    pub fn add_node(&mut self, position: Point) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(PointNode {
            position,
            walkable: true,
            tag: 0,
            penalty: 0,
            edges: Vec::new(),
        });
        self.areas.push(0);
        self.recompute_areas();
        id
    }

    /// Join `a` and `b` in both directions with the given cost.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, cost: u32) {
        self.nodes[a.index()].edges.push((b, cost));
        self.nodes[b.index()].edges.push((a, cost));
        self.recompute_areas();
    }

    /// Join `a` and `b` with a cost equal to their rounded distance.
    pub fn add_edge_by_distance(&mut self, a: NodeId, b: NodeId) {
        let cost = (self.nodes[a.index()].position - self.nodes[b.index()].position).cost_magnitude();
        self.add_edge(a, b, cost);
    }

    pub fn set_walkable(&mut self, id: NodeId, walkable: bool) {
        self.nodes[id.index()].walkable = walkable;
        self.recompute_areas();
    }

    pub fn set_tag(&mut self, id: NodeId, tag: u32) {
        self.nodes[id.index()].tag = tag;
    }

    pub fn set_penalty(&mut self, id: NodeId, penalty: u32) {
        self.nodes[id.index()].penalty = penalty;
    }

    /// All node ids, in order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    fn recompute_areas(&mut self) {
        let nodes = &self.nodes;
        self.areas = label_areas(
            nodes.len(),
            |i| nodes[i].walkable,
            |i, buf| buf.extend(nodes[i].edges.iter().map(|(n, _)| n.index())),
        );
    }
}

impl NavGraph for PointGraph {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> NodeInfo {
        let n = &self.nodes[id.index()];
        NodeInfo {
            position: n.position,
            area: self.areas[id.index()],
            walkable: n.walkable,
            tag: n.tag,
            penalty: n.penalty,
        }
    }

    fn for_each_edge(&self, id: NodeId, f: &mut dyn FnMut(NodeId, u32)) {
        for &(n, cost) in &self.nodes[id.index()].edges {
            f(n, cost);
        }
    }

    fn nearest(&self, p: Point, filter: &dyn Fn(NodeId, &NodeInfo) -> bool) -> Option<NearestNode> {
        self.ids()
            .filter(|&id| filter(id, &self.node(id)))
            .min_by_key(|&id| (self.nodes[id.index()].position - p).sq_magnitude())
            .map(|id| NearestNode {
                node: id,
                position: self.nodes[id.index()].position,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> (PointGraph, [NodeId; 3]) {
        let mut g = PointGraph::new();
        let a = g.add_node(Point::new(0, 0));
        let b = g.add_node(Point::new(3, 4));
        let c = g.add_node(Point::new(100, 0));
        g.add_edge_by_distance(a, b);
        (g, [a, b, c])
    }

    #[test]
    fn edges_are_bidirectional() {
        let (g, [a, b, _]) = line();
        let mut out = Vec::new();
        g.for_each_edge(b, &mut |n, c| out.push((n, c)));
        assert_eq!(out, vec![(a, 5)]);
    }

    #[test]
    fn areas_split_on_missing_edges() {
        let (mut g, [a, b, c]) = line();
        assert_eq!(g.node(a).area, g.node(b).area);
        assert_ne!(g.node(a).area, g.node(c).area);
        g.add_edge(b, c, 7);
        assert_eq!(g.node(a).area, g.node(c).area);
    }

    #[test]
    fn nearest_is_exact_node_position() {
        let (g, [_, b, c]) = line();
        let all = |_: NodeId, _: &NodeInfo| true;
        let n = g.nearest(Point::new(4, 4), &all).unwrap();
        assert_eq!(n.node, b);
        assert_eq!(n.position, Point::new(3, 4));
        let only_c = |id: NodeId, _: &NodeInfo| id == c;
        assert_eq!(g.nearest(Point::ZERO, &only_c).unwrap().node, c);
    }

    #[test]
    fn unwalkable_nodes_have_no_area() {
        let (mut g, [a, _, _]) = line();
        g.set_walkable(a, false);
        assert_eq!(g.node(a).area, crate::NO_AREA);
    }
}
