//! Every node reachable within a cost.

use wayfarer_core::{NavGraph, NodeId};

use crate::arena::SearchArena;
use crate::request::{Flow, SearchCore};
use crate::{PathNode, PathResult, SearchError};

#[derive(Debug)]
pub(crate) struct WithinCost {
    max_cost: u32,
    reached: Vec<PathNode>,
}

impl WithinCost {
    pub(crate) fn new(max_cost: u32) -> Self {
        Self {
            max_cost,
            reached: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn max_cost(&self) -> u32 {
        self.max_cost
    }

    pub(crate) fn prepare(&mut self, core: &mut SearchCore, graph: &dyn NavGraph) -> Result<(), SearchError> {
        core.start = Some(core.resolve(graph, core.start_point, "start", None)?);
        core.h_target = None;
        Ok(())
    }

    pub(crate) fn visit(&mut self, arena: &SearchArena, node: NodeId) -> Flow {
        if let Some(r) = arena.record(node) {
            self.reached.push(PathNode { node, cost: r.g });
        }
        Flow::Continue
    }

    pub(crate) fn finish(&mut self, result: &mut PathResult) {
        if result.state.has_path() {
            result.reachable = std::mem::take(&mut self.reached);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{PathRequest, Traversal};
    use wayfarer_core::{GridGraph, Point};

    #[test]
    fn diamond_on_open_grid() {
        let g = GridGraph::new(9, 9, 10);
        let r = PathRequest::within_cost(g.center(Point::new(4, 4)), 20).search(&g);
        assert!(r.is_complete());
        // 1 + 4 + 8 cells within two steps.
        assert_eq!(r.reachable().len(), 13);
        assert!(r.reachable().iter().all(|n| n.cost <= 20));
        let costs: Vec<u32> = r.reachable().iter().map(|n| n.cost).collect();
        assert!(costs.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(r.reachable()[0].cost, 0);
    }

    #[test]
    fn walls_and_penalties_count() {
        let mut g = GridGraph::from_ascii(".....", 10);
        g.set_penalty(Point::new(2, 0), 15);
        let r = PathRequest::within_cost(g.center(Point::new(0, 0)), 40).search(&g);
        let cells: Vec<Point> = r.reachable().iter().map(|n| g.cell_of(n.node)).collect();
        assert_eq!(cells, vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)]);
        assert_eq!(r.reachable()[2].cost, 35);
    }

    #[test]
    fn zero_cost_is_just_the_start() {
        let g = GridGraph::new(3, 3, 10);
        let r = PathRequest::within_cost(g.center(Point::new(1, 1)), 0).search(&g);
        assert!(r.is_complete());
        assert_eq!(r.reachable().len(), 1);
    }

    #[test]
    fn respects_traversal() {
        let g = GridGraph::from_ascii("..1..", 10);
        let r = PathRequest::within_cost(g.center(Point::new(0, 0)), 1000)
            .traversal(Traversal::new().without_tag(1))
            .search(&g);
        assert_eq!(r.reachable().len(), 2);
    }
}
