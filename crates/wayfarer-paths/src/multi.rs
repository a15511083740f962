//! One search, many targets.
//!
//! Targets are flagged in the arena so that dequeuing one costs a flag test.
//! Each resolved target is traced immediately into its own [`TargetPath`],
//! which keeps it valid however far the shared search goes on.

use log::trace;
use wayfarer_core::{NavGraph, NodeId, Point};

use crate::arena::{RecordFlags, SearchArena};
use crate::request::{Endpoint, Flow, SearchCore, exhausted_error};
use crate::{PathResult, SearchError, TargetPath};

/// Where a multi-target search aims its heuristic while it looks for all
/// targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeuristicMode {
    /// No heuristic.
    None,
    /// The average of all target positions.
    Average,
    /// The average of the unresolved targets, updated as targets resolve.
    MovingAverage,
    /// The centre of the targets' bounding box.
    Midpoint,
    /// The centre of the unresolved targets' bounding box, updated as
    /// targets resolve.
    MovingMidpoint,
    /// The unresolved target farthest from the start, switching once it
    /// resolves.
    #[default]
    Sequential,
}

pub(crate) struct MultiTarget {
    points: Vec<Point>,
    /// Search from the single target towards many starts.
    inverted: bool,
    pub(crate) paths_for_all: bool,
    pub(crate) mode: HeuristicMode,
    pub(crate) on_target: Option<Box<dyn FnMut(&TargetPath)>>,

    ends: Vec<Option<Endpoint>>,
    /// Resolved or given up on.
    done: Vec<bool>,
    paths: Vec<TargetPath>,
    remaining: usize,
    sequential: Option<usize>,
    chosen: Option<usize>,
}

impl MultiTarget {
    pub(crate) fn new(points: Vec<Point>, inverted: bool) -> Self {
        Self {
            points,
            inverted,
            paths_for_all: true,
            mode: HeuristicMode::default(),
            on_target: None,
            ends: Vec::new(),
            done: Vec::new(),
            paths: Vec::new(),
            remaining: 0,
            sequential: None,
            chosen: None,
        }
    }

    fn end_node(&self, i: usize) -> Option<NodeId> {
        self.ends[i].map(|e| e.node())
    }

    pub(crate) fn prepare(&mut self, core: &mut SearchCore, graph: &dyn NavGraph) -> Result<(), SearchError> {
        let (seed_name, end_name) = if self.inverted {
            ("target", "start")
        } else {
            ("start", "target")
        };
        let start = core.resolve(graph, core.start_point, seed_name, None)?;
        core.start = Some(start);
        let start_area = graph.node(start.node()).area;

        let n = self.points.len();
        self.ends = vec![None; n];
        self.done = vec![true; n];
        let (mut resolved, mut traversable, mut reachable) = (0, 0, 0);
        for (i, &p) in self.points.iter().enumerate() {
            let Some(nearest) = core.nearest(graph, p, None) else {
                continue;
            };
            resolved += 1;
            self.ends[i] = Some(Endpoint { point: p, nearest });
            if !core.can_traverse(graph, nearest.node) {
                continue;
            }
            traversable += 1;
            if graph.node(nearest.node).area != start_area {
                continue;
            }
            reachable += 1;
            self.done[i] = false;
        }
        self.paths = (0..n).map(|i| TargetPath::unreached(i, self.end_node(i))).collect();
        self.remaining = reachable;

        if resolved == 0 {
            return Err(SearchError::EndpointResolution(format!(
                "no walkable node near any of the {end_name} points"
            )));
        }
        if traversable == 0 {
            return Err(SearchError::EndpointResolution(format!(
                "none of the {end_name} nodes can be traversed"
            )));
        }
        if reachable == 0 {
            return Err(SearchError::Unreachable(format!(
                "there are no valid paths to the {end_name} nodes"
            )));
        }
        Ok(())
    }

    pub(crate) fn mark(&mut self, core: &mut SearchCore, graph: &dyn NavGraph, arena: &mut SearchArena) {
        for i in 0..self.points.len() {
            if let (false, Some(node)) = (self.done[i], self.end_node(i)) {
                core.flag(arena, node, RecordFlags::TARGET);
            }
        }
        self.retarget(core, graph, arena, true);
    }

    pub(crate) fn visit(
        &mut self,
        core: &mut SearchCore,
        graph: &dyn NavGraph,
        arena: &mut SearchArena,
        node: NodeId,
    ) -> Result<Flow, SearchError> {
        if !arena
            .record(node)
            .is_some_and(|r| r.flags.contains(RecordFlags::TARGET))
        {
            return Ok(Flow::Continue);
        }
        core.unflag(arena, node, RecordFlags::TARGET);

        for i in 0..self.points.len() {
            if self.done[i] || self.end_node(i) != Some(node) {
                continue;
            }
            self.resolve_target(core, arena, node, i)?;
            if core.state.is_terminal() {
                return Ok(Flow::Stop);
            }
        }
        self.retarget(core, graph, arena, false);
        Ok(Flow::Continue)
    }

    fn resolve_target(
        &mut self,
        core: &mut SearchCore,
        arena: &SearchArena,
        node: NodeId,
        i: usize,
    ) -> Result<(), SearchError> {
        let nodes = core.trace_chain(arena, node)?;
        let cost = arena.record(node).map_or(0, |r| r.g);
        self.paths[i] = TargetPath {
            index: i,
            node: Some(node),
            cost: Some(cost),
            nodes,
            waypoints: Vec::new(),
        };
        self.done[i] = true;
        self.remaining = self.remaining.saturating_sub(1);
        trace!("target {i} resolved at {node} with cost {cost}, {} left", self.remaining);

        if !self.paths_for_all {
            self.chosen = Some(i);
            core.complete(node);
        } else if self.remaining == 0 {
            core.complete(node);
        }
        Ok(())
    }

    /// Point the heuristic at the next target. After the first call a
    /// change rebuilds the open list.
    fn retarget(&mut self, core: &mut SearchCore, graph: &dyn NavGraph, arena: &mut SearchArena, first: bool) {
        if !self.paths_for_all || self.mode == HeuristicMode::None {
            core.h_target = None;
            return;
        }
        let open: Vec<(usize, Point)> = (0..self.points.len())
            .filter(|&i| !self.done[i])
            .filter_map(|i| self.end_node(i).map(|n| (i, graph.position(n))))
            .collect();
        if open.is_empty() {
            return;
        }

        let target = match self.mode {
            HeuristicMode::None => return,
            HeuristicMode::Average | HeuristicMode::Midpoint if !first => return,
            HeuristicMode::Average | HeuristicMode::MovingAverage => {
                let n = open.len() as i64;
                let (sx, sy) = open
                    .iter()
                    .fold((0i64, 0i64), |(x, y), (_, p)| (x + p.x as i64, y + p.y as i64));
                Point::new((sx / n) as i32, (sy / n) as i32)
            }
            HeuristicMode::Midpoint | HeuristicMode::MovingMidpoint => {
                let (min, max) = open
                    .iter()
                    .fold((open[0].1, open[0].1), |(lo, hi), (_, p)| (lo.min(*p), hi.max(*p)));
                Point::new(
                    ((min.x as i64 + max.x as i64) / 2) as i32,
                    ((min.y as i64 + max.y as i64) / 2) as i32,
                )
            }
            HeuristicMode::Sequential => {
                if !first && self.sequential.is_some_and(|s| !self.done[s]) {
                    return;
                }
                let origin = core.start.map_or(Point::ZERO, |s| graph.position(s.node()));
                let mut best = open[0];
                for &(i, p) in &open[1..] {
                    if (p - origin).sq_magnitude() > (best.1 - origin).sq_magnitude() {
                        best = (i, p);
                    }
                }
                self.sequential = Some(best.0);
                best.1
            }
        };

        core.h_target = Some(target);
        if !first {
            trace!("heuristic target moved to {target}, rebuilding {} open nodes", arena.open_len());
            arena.rebuild_open(|n| core.h(graph.position(n)));
        }
    }

    /// Index of the cheapest reached target, lowest index on ties.
    fn cheapest(&self) -> Option<usize> {
        self.paths
            .iter()
            .filter_map(|p| p.cost.map(|c| (c, p.index)))
            .min()
            .map(|(_, i)| i)
    }

    pub(crate) fn exhausted(&mut self, core: &mut SearchCore, at_init: bool) -> Result<(), SearchError> {
        let i = self.cheapest().ok_or_else(|| exhausted_error(at_init))?;
        match self.paths[i].node {
            Some(node) => {
                core.complete(node);
                Ok(())
            }
            None => Err(exhausted_error(at_init)),
        }
    }

    pub(crate) fn trace(&mut self, core: &mut SearchCore, graph: &dyn NavGraph) -> Result<(), SearchError> {
        for p in self.paths.iter_mut().filter(|p| p.is_reached()) {
            if self.inverted {
                p.nodes.reverse();
            }
            let end = self.ends[p.index];
            let (first, last) = if self.inverted {
                (end, core.start)
            } else {
                (core.start, end)
            };
            p.waypoints = core.waypoints(graph, &p.nodes, first, last);
        }

        let chosen = self
            .chosen
            .or_else(|| self.cheapest())
            .ok_or_else(|| SearchError::InvariantViolation("completed without a reached target".into()))?;
        self.chosen = Some(chosen);
        let p = &self.paths[chosen];
        core.path = p.nodes.clone();
        core.waypoints = p.waypoints.clone();
        core.cost = p.cost.unwrap_or(0);
        Ok(())
    }

    pub(crate) fn finish(&mut self, result: &mut PathResult) {
        if let Some(cb) = &mut self.on_target {
            for p in self.paths.iter().filter(|p| p.is_reached()) {
                cb(p);
            }
        }
        result.chosen_target = self.chosen.filter(|_| result.state.has_path());
        result.targets = std::mem::take(&mut self.paths);
    }
}
