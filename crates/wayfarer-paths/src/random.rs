//! Bounded random walks.
//!
//! The search runs like Dijkstra (or A* towards an [`Aim`]) from the start.
//! Dequeued nodes whose cost lies in `[budget, budget + spread]` are
//! candidates, and one of them is kept by reservoir sampling. The first
//! dequeued node beyond the window ends the search.

use log::debug;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use wayfarer_core::{NavGraph, NodeId, Point};

use crate::SearchError;
use crate::arena::SearchArena;
use crate::request::{Flow, SearchCore, exhausted_error};

/// Default width of the candidate window: five cells at the default node
/// size.
pub const DEFAULT_SPREAD: u32 = 5000;

/// Steering for a random walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    pub point: Point,
    /// Heuristic scale. Zero makes the aim irrelevant.
    pub strength: f32,
}

pub(crate) struct RandomWalk {
    budget: u32,
    pub(crate) spread: u32,
    pub(crate) aim: Option<Aim>,
    /// Drawn from the thread rng at initialize when unset.
    pub(crate) seed: Option<u64>,
    rng: Option<StdRng>,
    chosen: Option<NodeId>,
    candidates: u32,
    /// Highest-cost node seen below the budget.
    farthest: Option<(NodeId, u32)>,
}

impl RandomWalk {
    pub(crate) fn new(budget: u32) -> Self {
        Self {
            budget,
            spread: DEFAULT_SPREAD,
            aim: None,
            seed: None,
            rng: None,
            chosen: None,
            candidates: 0,
            farthest: None,
        }
    }

    pub(crate) fn prepare(&mut self, core: &mut SearchCore, graph: &dyn NavGraph) -> Result<(), SearchError> {
        core.start = Some(core.resolve(graph, core.start_point, "start", None)?);
        match self.aim {
            Some(aim) => {
                core.h_target = Some(aim.point);
                core.heuristic_scale = aim.strength;
            }
            None => core.h_target = None,
        }
        Ok(())
    }

    pub(crate) fn mark(&mut self, core: &mut SearchCore, arena: &mut SearchArena) {
        let seed = *self.seed.get_or_insert_with(|| {
            let seed = rand::rng().random();
            debug!("random walk seeded with {seed}");
            seed
        });
        self.rng = Some(StdRng::seed_from_u64(seed));
        core.mark_special(arena);
    }

    pub(crate) fn visit(&mut self, core: &mut SearchCore, arena: &SearchArena, node: NodeId) -> Flow {
        let Some(g) = arena.record(node).map(|r| r.g) else {
            return Flow::Continue;
        };
        if g < self.budget {
            if self.farthest.is_none_or(|(_, fg)| g > fg) {
                self.farthest = Some((node, g));
            }
            return Flow::Continue;
        }
        if g <= self.budget.saturating_add(self.spread) {
            self.candidates += 1;
            let seed = self.seed.unwrap_or_default();
            let rng = self.rng.get_or_insert_with(|| StdRng::seed_from_u64(seed));
            if rng.random_range(0..self.candidates) == 0 {
                self.chosen = Some(node);
            }
            return Flow::Continue;
        }
        // Overshot the window.
        core.complete(self.pick().unwrap_or(node));
        Flow::Stop
    }

    pub(crate) fn exhausted(&mut self, core: &mut SearchCore, at_init: bool) -> Result<(), SearchError> {
        let node = self.pick().ok_or_else(|| exhausted_error(at_init))?;
        core.complete(node);
        Ok(())
    }

    fn pick(&self) -> Option<NodeId> {
        self.chosen.or(self.farthest.map(|(n, _)| n))
    }
}
