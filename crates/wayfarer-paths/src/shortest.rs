//! Shortest path to a point, and search until a custom condition holds.

use wayfarer_core::{NavGraph, NodeId};

use crate::arena::SearchArena;
use crate::request::{Flow, SearchCore, exhausted_error};
use crate::{EndingCondition, SearchError, SearchRecord};

/// Node with the lowest `h` seen so far, ties going to the lower `g`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ClosestSeen(Option<(NodeId, u32, u32)>);

impl ClosestSeen {
    fn offer(&mut self, node: NodeId, r: &SearchRecord) {
        let better = match self.0 {
            None => true,
            Some((_, h, g)) => r.h < h || (r.h == h && r.g < g),
        };
        if better {
            self.0 = Some((node, r.h, r.g));
        }
    }

    fn node(&self) -> Option<NodeId> {
        self.0.map(|(n, _, _)| n)
    }
}

/// Shared ending for an open list that ran dry.
fn exhausted(core: &mut SearchCore, closest: &ClosestSeen, at_init: bool) -> Result<(), SearchError> {
    match closest.node() {
        Some(n) if core.partial => {
            core.complete_partial(n);
            Ok(())
        }
        _ => Err(exhausted_error(at_init)),
    }
}

#[derive(Debug, Default)]
pub(crate) struct Shortest {
    closest: ClosestSeen,
}

impl Shortest {
    pub(crate) fn prepare(&mut self, core: &mut SearchCore, graph: &dyn NavGraph) -> Result<(), SearchError> {
        let start = core.resolve(graph, core.start_point, "start", None)?;
        core.start = Some(start);
        let end_point = core
            .end_point
            .ok_or_else(|| SearchError::InvalidRequestState("shortest path without an end point".into()))?;
        let end = core.resolve(graph, end_point, "end", None)?;
        core.end = Some(end);

        if !core.partial {
            let (a, b) = (graph.node(start.node()).area, graph.node(end.node()).area);
            if a != b {
                return Err(SearchError::Unreachable(format!(
                    "disconnected: start {} is in area {a} and end {} in area {b}",
                    start.node(),
                    end.node()
                )));
            }
        }
        core.h_target = Some(end.nearest.position);
        Ok(())
    }

    pub(crate) fn visit(&mut self, core: &mut SearchCore, arena: &SearchArena, node: NodeId) -> Flow {
        if core.end.is_some_and(|e| e.node() == node) {
            core.complete(node);
            return Flow::Stop;
        }
        if core.partial {
            if let Some(r) = arena.record(node) {
                self.closest.offer(node, r);
            }
        }
        Flow::Continue
    }

    pub(crate) fn exhausted(&mut self, core: &mut SearchCore, at_init: bool) -> Result<(), SearchError> {
        exhausted(core, &self.closest, at_init)
    }
}

pub(crate) struct Custom {
    condition: Box<dyn EndingCondition>,
    closest: ClosestSeen,
}

impl Custom {
    pub(crate) fn new(condition: Box<dyn EndingCondition>) -> Self {
        Self {
            condition,
            closest: ClosestSeen::default(),
        }
    }

    /// Partial mode ranks nodes by `h`, so it needs a heuristic target.
    pub(crate) fn prepare(&mut self, core: &mut SearchCore, graph: &dyn NavGraph) -> Result<(), SearchError> {
        if core.partial && core.h_target.is_none() {
            return Err(SearchError::InvalidRequestState(
                "partial custom search without a heuristic target".into(),
            ));
        }
        core.start = Some(core.resolve(graph, core.start_point, "start", None)?);
        Ok(())
    }

    pub(crate) fn visit(
        &mut self,
        core: &mut SearchCore,
        graph: &dyn NavGraph,
        arena: &SearchArena,
        node: NodeId,
    ) -> Flow {
        let Some(r) = arena.record(node) else {
            return Flow::Continue;
        };
        if self.condition.target_found(node, r, &graph.node(node)) {
            core.complete(node);
            return Flow::Stop;
        }
        if core.partial {
            self.closest.offer(node, r);
        }
        Flow::Continue
    }

    pub(crate) fn exhausted(&mut self, core: &mut SearchCore, at_init: bool) -> Result<(), SearchError> {
        exhausted(core, &self.closest, at_init)
    }
}
