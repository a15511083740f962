//! The [`Pathfinder`]: owns the arenas and drives submitted requests.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use log::{info, warn};
use wayfarer_core::NavGraph;

use crate::request::Budget;
use crate::{
    Deadline, PathLog, PathRequest, PathResult, PathfinderConfig, SearchArena, StepStatus,
};

/// Names a submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestHandle(u64);

impl fmt::Display for RequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request {}", self.0)
    }
}

enum Slot {
    Pending {
        request: Box<PathRequest>,
        /// Index of the arena the request is bound to.
        arena: Option<usize>,
    },
    Done(PathResult),
}

/// Cooperative scheduler for path requests.
///
/// A request binds to a free arena the first time it is stepped and
/// releases it after cleanup, so no two live searches share an arena.
/// Requests that find no free arena wait.
pub struct Pathfinder {
    config: PathfinderConfig,
    arenas: Vec<SearchArena>,
    busy: Vec<bool>,
    slots: HashMap<RequestHandle, Slot>,
    /// Pending requests in round-robin order.
    queue: VecDeque<RequestHandle>,
    next: u64,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(PathfinderConfig::default())
    }
}

impl Pathfinder {
    pub fn new(config: PathfinderConfig) -> Self {
        let n = config.arena_count.max(1);
        Self {
            config,
            arenas: (0..n).map(|_| SearchArena::default()).collect(),
            busy: vec![false; n],
            slots: HashMap::new(),
            queue: VecDeque::new(),
            next: 0,
        }
    }

    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    /// Queue a request. Its engine settings are replaced with the
    /// pathfinder's.
    pub fn submit(&mut self, mut request: PathRequest) -> RequestHandle {
        request.configure(self.config);
        let handle = RequestHandle(self.next);
        self.next += 1;
        self.slots.insert(
            handle,
            Slot::Pending {
                request: Box::new(request),
                arena: None,
            },
        );
        self.queue.push_back(handle);
        handle
    }

    /// Number of requests not yet delivered.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Work on one request until it is delivered or `deadline` passes.
    ///
    /// Unknown and already delivered handles report
    /// [`StepStatus::Done`].
    pub fn step(&mut self, handle: RequestHandle, graph: &dyn NavGraph, deadline: Deadline) -> StepStatus {
        let mut budget = Budget::new(deadline);
        self.step_budget(handle, graph, &mut budget)
    }

    fn step_budget(&mut self, handle: RequestHandle, graph: &dyn NavGraph, budget: &mut Budget) -> StepStatus {
        let Some(Slot::Pending { request, arena }) = self.slots.get_mut(&handle) else {
            return StepStatus::Done;
        };
        let index = match *arena {
            Some(i) => i,
            None => {
                let Some(i) = self.busy.iter().position(|b| !b) else {
                    return StepStatus::Waiting;
                };
                self.busy[i] = true;
                *arena = Some(i);
                i
            }
        };

        if request.advance_budget(graph, &mut self.arenas[index], budget) == StepStatus::Running {
            return StepStatus::Running;
        }

        self.busy[index] = false;
        self.queue.retain(|h| *h != handle);
        if let Some(Slot::Pending { request, .. }) = self.slots.remove(&handle) {
            let result = request.finish();
            self.log_result(handle, &result);
            self.slots.insert(handle, Slot::Done(result));
        }
        StepStatus::Done
    }

    fn log_result(&self, handle: RequestHandle, result: &PathResult) {
        match (self.config.log_results, result.error()) {
            (PathLog::None, _) => {}
            (_, Some(err)) => warn!("{handle} failed after {} nodes: {err}", result.searched_nodes()),
            (PathLog::OnlyErrors, None) => {}
            (PathLog::Normal, None) => info!(
                "{handle} {:?}: cost {}, {} nodes, {} searched in {:?}",
                result.state(),
                result.cost(),
                result.path().len(),
                result.searched_nodes(),
                result.duration()
            ),
            (PathLog::Heavy, None) => info!(
                "{handle} {:?}: cost {}, {} searched in {:?}, path {:?}",
                result.state(),
                result.cost(),
                result.searched_nodes(),
                result.duration(),
                result.path()
            ),
        }
    }

    /// Step pending requests round-robin until all are delivered or
    /// `deadline` passes. Returns the number of requests delivered.
    ///
    /// Each request gets at most [`PathfinderConfig::time_check_interval`]
    /// expansions per turn before the next one runs.
    pub fn pump(&mut self, graph: &dyn NavGraph, deadline: Deadline) -> usize {
        let mut budget = Budget::new(deadline);
        let mut delivered = 0;
        let slice = self.config.time_check_interval.max(1);

        while !self.queue.is_empty() && !budget.exhausted() {
            let mut progressed = false;
            let round: Vec<RequestHandle> = self.queue.iter().copied().collect();
            for handle in round {
                if budget.exhausted() {
                    break;
                }
                let mut turn = budget.slice(slice);
                let status = self.step_budget(handle, graph, &mut turn);
                budget.absorb(&turn, slice);
                match status {
                    StepStatus::Waiting => {}
                    StepStatus::Running => progressed = true,
                    StepStatus::Done => {
                        progressed = true;
                        delivered += 1;
                    }
                }
            }
            if !progressed {
                break;
            }
        }
        delivered
    }

    /// The delivered result of `handle`, if it is done.
    pub fn result(&self, handle: RequestHandle) -> Option<&PathResult> {
        match self.slots.get(&handle) {
            Some(Slot::Done(r)) => Some(r),
            _ => None,
        }
    }

    /// Remove and return the delivered result of `handle`.
    pub fn take_result(&mut self, handle: RequestHandle) -> Option<PathResult> {
        if !matches!(self.slots.get(&handle), Some(Slot::Done(_))) {
            return None;
        }
        match self.slots.remove(&handle) {
            Some(Slot::Done(r)) => Some(r),
            _ => None,
        }
    }

    /// Abandon a request without tracing or delivering it. Its arena is
    /// cleaned and freed. Returns whether anything was discarded.
    pub fn discard(&mut self, handle: RequestHandle) -> bool {
        self.queue.retain(|h| *h != handle);
        match self.slots.remove(&handle) {
            Some(Slot::Pending { mut request, arena }) => {
                if let Some(i) = arena {
                    request.cleanup(&mut self.arenas[i]);
                    self.busy[i] = false;
                }
                true
            }
            Some(Slot::Done(_)) => true,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompleteState, SearchError};
    use wayfarer_core::{GridGraph, Point};

    fn open() -> GridGraph {
        GridGraph::new(20, 20, 10)
    }

    fn c(x: i32, y: i32) -> Point {
        Point::new(x * 10 + 5, y * 10 + 5)
    }

    #[test]
    fn step_to_completion() {
        let g = open();
        let mut pf = Pathfinder::default();
        let h = pf.submit(PathRequest::shortest(c(0, 0), c(5, 0)));
        assert!(pf.result(h).is_none());
        assert_eq!(pf.step(h, &g, Deadline::Never), StepStatus::Done);
        assert_eq!(pf.result(h).map(|r| r.cost()), Some(50));
        assert_eq!(pf.pending(), 0);
        let r = pf.take_result(h).unwrap();
        assert!(r.is_complete());
        assert!(pf.result(h).is_none());
        assert_eq!(pf.step(h, &g, Deadline::Never), StepStatus::Done);
    }

    #[test]
    fn one_arena_makes_others_wait() {
        let g = open();
        let mut pf = Pathfinder::default();
        let a = pf.submit(PathRequest::shortest(c(0, 0), c(19, 19)).heuristic(crate::Heuristic::None));
        let b = pf.submit(PathRequest::shortest(c(0, 0), c(1, 0)));
        assert_eq!(pf.step(a, &g, Deadline::Expansions(5)), StepStatus::Running);
        assert_eq!(pf.step(b, &g, Deadline::Never), StepStatus::Waiting);
        assert_eq!(pf.step(a, &g, Deadline::Never), StepStatus::Done);
        assert_eq!(pf.step(b, &g, Deadline::Never), StepStatus::Done);
        assert!(pf.result(a).unwrap().is_complete());
        assert!(pf.result(b).unwrap().is_complete());
    }

    #[test]
    fn pump_delivers_everything_without_deadline() {
        let g = open();
        let mut pf = Pathfinder::new(PathfinderConfig {
            arena_count: 2,
            time_check_interval: 3,
            ..PathfinderConfig::default()
        });
        let handles: Vec<_> = (0..5)
            .map(|i| pf.submit(PathRequest::shortest(c(0, i), c(10, 19 - i))))
            .collect();
        assert_eq!(pf.pump(&g, Deadline::Never), 5);
        for h in handles {
            assert_eq!(pf.result(h).map(|r| r.state()), Some(CompleteState::Complete));
        }
    }

    #[test]
    fn pump_respects_expansion_budget() {
        let g = open();
        let mut pf = Pathfinder::new(PathfinderConfig {
            time_check_interval: 4,
            ..PathfinderConfig::default()
        });
        let h = pf.submit(PathRequest::shortest(c(0, 0), c(19, 19)).heuristic(crate::Heuristic::None));
        assert_eq!(pf.pump(&g, Deadline::Expansions(10)), 0);
        assert_eq!(pf.pending(), 1);
        assert_eq!(pf.pump(&g, Deadline::Never), 1);
        assert!(pf.result(h).unwrap().is_complete());
    }

    #[test]
    fn discard_frees_the_arena() {
        let g = open();
        let mut pf = Pathfinder::default();
        let a = pf.submit(PathRequest::shortest(c(0, 0), c(19, 19)).heuristic(crate::Heuristic::None));
        let b = pf.submit(PathRequest::shortest(c(0, 0), c(1, 0)));
        assert_eq!(pf.step(a, &g, Deadline::Expansions(5)), StepStatus::Running);
        assert!(pf.discard(a));
        assert!(!pf.discard(a));
        assert_eq!(pf.step(b, &g, Deadline::Never), StepStatus::Done);
        assert!(pf.result(a).is_none());
        assert_eq!(pf.pending(), 0);
    }

    #[test]
    fn errors_are_delivered() {
        let g = GridGraph::from_ascii("..#..", 10);
        let mut pf = Pathfinder::default();
        let h = pf.submit(PathRequest::shortest(c(0, 0), c(4, 0)));
        assert_eq!(pf.pump(&g, Deadline::Never), 1);
        assert!(matches!(
            pf.result(h).and_then(|r| r.error()),
            Some(SearchError::Unreachable(_))
        ));
    }

    #[test]
    fn submit_applies_config() {
        let g = open();
        let mut pf = Pathfinder::new(PathfinderConfig {
            max_expansions: 2,
            heuristic: crate::Heuristic::None,
            ..PathfinderConfig::default()
        });
        let h = pf.submit(PathRequest::shortest(c(0, 0), c(19, 19)));
        pf.pump(&g, Deadline::Never);
        assert!(matches!(
            pf.result(h).and_then(|r| r.error()),
            Some(SearchError::InvariantViolation(_))
        ));
    }
}
