//! The request state machine shared by every search variant.
//!
//! A request moves through Prepare, Initialize, Step, Trace, Cleanup and
//! Delivery in that order. All per-search state lives on the request and
//! its [`SearchArena`], so stepping can stop after any expansion and resume
//! later.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use wayfarer_core::{NavGraph, NearestNode, NodeId, NodeInfo, Point};

use crate::arena::{NodeStatus, RecordFlags, SearchArena};
use crate::flood::{Flood, FloodMap, FloodTracer};
use crate::multi::{HeuristicMode, MultiTarget};
use crate::random::{Aim, RandomWalk};
use crate::shortest::{Custom, Shortest};
use crate::within::WithinCost;
use crate::{
    CompleteState, EndingCondition, Heuristic, NodeConstraint, PathResult, PathfinderConfig,
    SearchError, TargetPath, Traversal,
};

// ---------------------------------------------------------------------------
// Public enums
// ---------------------------------------------------------------------------

/// Lifecycle position of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Created,
    Prepared,
    Searching,
    Searched,
    Traced,
    Cleaned,
}

/// Outcome of a bounded amount of work on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// No arena is free; nothing was done.
    Waiting,
    /// Work remains.
    Running,
    /// The request is finished.
    Done,
}

/// How long a call may keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    Never,
    At(Instant),
    After(Duration),
    /// At most this many node expansions.
    Expansions(u32),
}

/// Which points become the first and last waypoint of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndpointMode {
    /// Every waypoint is a node position.
    #[default]
    NodeCenters,
    /// The endpoints moved onto their nodes.
    Snapped,
    /// The endpoints exactly as requested.
    Original,
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

/// A [`Deadline`] resolved at the start of a call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    until: Option<Instant>,
    expansions: Option<u32>,
}

impl Budget {
    pub(crate) fn new(deadline: Deadline) -> Self {
        match deadline {
            Deadline::Never => Self {
                until: None,
                expansions: None,
            },
            Deadline::At(t) => Self {
                until: Some(t),
                expansions: None,
            },
            Deadline::After(d) => Self {
                until: Some(Instant::now() + d),
                expansions: None,
            },
            Deadline::Expansions(n) => Self {
                until: None,
                expansions: Some(n),
            },
        }
    }

    #[inline]
    fn spend(&mut self) {
        if let Some(e) = &mut self.expansions {
            *e = e.saturating_sub(1);
        }
    }

    #[inline]
    fn out_of_expansions(&self) -> bool {
        self.expansions == Some(0)
    }

    #[inline]
    fn past_deadline(&self) -> bool {
        self.until.is_some_and(|t| Instant::now() >= t)
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.out_of_expansions() || self.past_deadline()
    }

    /// A share of this budget limited to `n` expansions.
    pub(crate) fn slice(&self, n: u32) -> Self {
        Self {
            until: self.until,
            expansions: Some(self.expansions.map_or(n, |e| e.min(n))),
        }
    }

    /// Charge the expansions used by `turn`, a [`slice`](Self::slice) of
    /// `n` taken from this budget.
    pub(crate) fn absorb(&mut self, turn: &Budget, n: u32) {
        if let Some(e) = &mut self.expansions {
            let given = (*e).min(n);
            *e -= given - turn.expansions.unwrap_or(0).min(given);
        }
    }
}

// ---------------------------------------------------------------------------
// SearchCore
// ---------------------------------------------------------------------------

/// A requested point together with the node it resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Endpoint {
    pub(crate) point: Point,
    pub(crate) nearest: NearestNode,
}

impl Endpoint {
    #[inline]
    pub(crate) fn node(&self) -> NodeId {
        self.nearest.node
    }
}

/// Whether a visited node ends the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Stop,
}

/// State every variant shares.
pub(crate) struct SearchCore {
    pub(crate) config: PathfinderConfig,
    heuristic_override: Option<Heuristic>,
    scale_override: Option<f32>,
    pub(crate) heuristic: Heuristic,
    pub(crate) heuristic_scale: f32,
    pub(crate) h_target: Option<Point>,

    pub(crate) partial: bool,
    pub(crate) traversal: Traversal,
    pub(crate) constraint: Option<NodeConstraint>,
    pub(crate) endpoint_mode: EndpointMode,
    pub(crate) recalc_start_end_costs: bool,

    pub(crate) start_point: Point,
    pub(crate) end_point: Option<Point>,
    pub(crate) start: Option<Endpoint>,
    pub(crate) end: Option<Endpoint>,
    /// Nodes this search placed flags on.
    flagged: Vec<NodeId>,

    pub(crate) state: CompleteState,
    pub(crate) error: Option<SearchError>,
    pub(crate) current: Option<NodeId>,
    pub(crate) terminal: Option<NodeId>,
    pub(crate) expansions: u32,
    pub(crate) path: Vec<NodeId>,
    pub(crate) waypoints: Vec<Point>,
    pub(crate) cost: u32,
    started: Option<Instant>,
}

impl SearchCore {
    pub(crate) fn new(start_point: Point, end_point: Option<Point>) -> Self {
        let config = PathfinderConfig::default();
        Self {
            config,
            heuristic_override: None,
            scale_override: None,
            heuristic: config.heuristic,
            heuristic_scale: config.heuristic_scale,
            h_target: None,
            partial: false,
            traversal: Traversal::default(),
            constraint: None,
            endpoint_mode: EndpointMode::default(),
            recalc_start_end_costs: true,
            start_point,
            end_point,
            start: None,
            end: None,
            flagged: Vec::new(),
            state: CompleteState::NotCalculated,
            error: None,
            current: None,
            terminal: None,
            expansions: 0,
            path: Vec::new(),
            waypoints: Vec::new(),
            cost: 0,
            started: None,
        }
    }

    fn configure(&mut self, config: PathfinderConfig) {
        self.config = config;
        self.heuristic = self.heuristic_override.unwrap_or(config.heuristic);
        self.heuristic_scale = self.scale_override.unwrap_or(config.heuristic_scale);
    }

    // --- state transitions ---

    pub(crate) fn fail(&mut self, err: SearchError) {
        debug!("search failed: {err}");
        match &mut self.error {
            Some(e) => e.append(&err),
            None => self.error = Some(err),
        }
        self.state = CompleteState::Error;
    }

    pub(crate) fn complete(&mut self, terminal: NodeId) {
        if self.state == CompleteState::NotCalculated {
            self.state = CompleteState::Complete;
            self.terminal = Some(terminal);
        }
    }

    pub(crate) fn complete_partial(&mut self, terminal: NodeId) {
        if self.state == CompleteState::NotCalculated {
            self.state = CompleteState::Partial;
            self.terminal = Some(terminal);
        }
    }

    pub(crate) fn start_node(&self) -> Result<NodeId, SearchError> {
        self.start
            .map(|s| s.node())
            .ok_or_else(|| SearchError::InvalidRequestState("start node was never resolved".into()))
    }

    // --- endpoint resolution ---

    fn effective_constraint(&self) -> NodeConstraint {
        self.constraint.unwrap_or(NodeConstraint {
            tags: self.traversal.enabled_tags,
            ..NodeConstraint::default()
        })
    }

    /// Nearest node to `p` passing the request's constraint and `extra`.
    pub(crate) fn nearest(
        &self,
        graph: &dyn NavGraph,
        p: Point,
        extra: Option<&dyn Fn(NodeId) -> bool>,
    ) -> Option<NearestNode> {
        let constraint = self.effective_constraint();
        let filter = |id: NodeId, info: &NodeInfo| constraint.accepts(info) && extra.is_none_or(|f| f(id));
        graph.nearest(p, &filter)
    }

    /// Resolve `p` to a traversable node. `what` names the endpoint in
    /// error messages.
    pub(crate) fn resolve(
        &self,
        graph: &dyn NavGraph,
        p: Point,
        what: &str,
        extra: Option<&dyn Fn(NodeId) -> bool>,
    ) -> Result<Endpoint, SearchError> {
        let nearest = self.nearest(graph, p, extra).ok_or_else(|| {
            SearchError::EndpointResolution(format!("no walkable node near {what} point {p}"))
        })?;
        if !self.can_traverse(graph, nearest.node) {
            return Err(SearchError::EndpointResolution(format!(
                "the {what} node {} cannot be traversed",
                nearest.node
            )));
        }
        Ok(Endpoint { point: p, nearest })
    }

    #[inline]
    pub(crate) fn can_traverse(&self, graph: &dyn NavGraph, node: NodeId) -> bool {
        self.traversal.can_traverse(node, &graph.node(node))
    }

    // --- flags ---

    pub(crate) fn flag(&mut self, arena: &mut SearchArena, node: NodeId, flags: RecordFlags) {
        let r = arena.record_mut(node);
        r.flags = r.flags | flags;
        self.flagged.push(node);
    }

    pub(crate) fn unflag(&self, arena: &mut SearchArena, node: NodeId, flags: RecordFlags) {
        if let Some(r) = arena.record_current_mut(node) {
            r.flags = r.flags & !flags;
        }
    }

    /// Flag the resolved start and end for edge-cost rescaling.
    pub(crate) fn mark_special(&mut self, arena: &mut SearchArena) {
        if !self.recalc_start_end_costs {
            return;
        }
        for e in [self.start, self.end].into_iter().flatten() {
            self.flag(arena, e.node(), RecordFlags::SPECIAL_COST);
        }
    }

    fn clear_flags(&mut self, arena: &mut SearchArena) {
        for node in std::mem::take(&mut self.flagged) {
            self.unflag(arena, node, RecordFlags::TARGET | RecordFlags::SPECIAL_COST);
        }
    }

    // --- costs ---

    /// Heuristic estimate from `p` to the current heuristic target.
    #[inline]
    pub(crate) fn h(&self, p: Point) -> u32 {
        match self.h_target {
            Some(t) => self.heuristic.estimate(self.heuristic_scale, p, t),
            None => 0,
        }
    }

    /// Cost of the edge `a -> b`, rescaled when it touches a start or end
    /// node so that it measures from the exact endpoint instead of the
    /// node position.
    fn special_cost(&self, graph: &dyn NavGraph, arena: &SearchArena, a: NodeId, b: NodeId, cost: u32) -> u32 {
        let flagged = |n: NodeId| {
            arena
                .record(n)
                .is_some_and(|r| r.flags.contains(RecordFlags::SPECIAL_COST))
        };
        if !flagged(a) && !flagged(b) {
            return cost;
        }
        let Some(start) = self.start else {
            return cost;
        };
        let (pa, pb) = (graph.position(a), graph.position(b));
        let separation = (pa - pb).magnitude();
        if separation == 0.0 {
            return cost;
        }
        // The other end of an edge leaving the start is the exact end point
        // if it is the end node.
        let towards = |n: NodeId, p: Point| match self.end {
            Some(e) if e.node() == n => e.nearest.position,
            _ => p,
        };
        let exact = if a == start.node() {
            (start.nearest.position - towards(b, pb)).magnitude()
        } else if b == start.node() {
            (start.nearest.position - towards(a, pa)).magnitude()
        } else {
            match self.end {
                Some(e) if e.node() == a => (e.nearest.position - pb).magnitude(),
                Some(e) if e.node() == b => (e.nearest.position - pa).magnitude(),
                _ => return cost,
            }
        };
        (cost as f64 * exact / separation).round() as u32
    }

    // --- search primitives ---

    /// Make `node` a closed seed with `g = 0`.
    pub(crate) fn seed(&self, graph: &dyn NavGraph, arena: &mut SearchArena, node: NodeId) {
        let h = self.h(graph.position(node));
        let r = arena.record_mut(node);
        r.g = 0;
        r.h = h;
        r.parent = None;
        r.status = NodeStatus::Closed;
    }

    /// Relax every traversable neighbour of the closed node `current`.
    /// Neighbours whose cost would exceed `max_cost` are skipped.
    pub(crate) fn expand(
        &self,
        graph: &dyn NavGraph,
        arena: &mut SearchArena,
        current: NodeId,
        max_cost: Option<u32>,
    ) {
        let Some(current_g) = arena.record(current).map(|r| r.g) else {
            return;
        };

        let mut nbuf = std::mem::take(&mut arena.nbuf);
        nbuf.clear();
        graph.for_each_edge(current, &mut |n, c| nbuf.push((n, c)));

        for &(n, edge) in nbuf.iter() {
            if arena
                .record(n)
                .is_some_and(|r| r.status == NodeStatus::Closed)
            {
                continue;
            }
            let info = graph.node(n);
            if !self.traversal.can_traverse(n, &info) {
                continue;
            }
            let step = self
                .special_cost(graph, arena, current, n, edge)
                .saturating_add(self.traversal.cost(n, &info));
            let g = current_g.saturating_add(step);
            if max_cost.is_some_and(|m| g > m) {
                continue;
            }

            let h = self.h(info.position);
            let r = arena.record_mut(n);
            match r.status {
                NodeStatus::New => {
                    r.g = g;
                    r.h = h;
                    r.parent = Some(current);
                    arena.push_open(n);
                }
                NodeStatus::Open if g < r.g => {
                    r.g = g;
                    r.parent = Some(current);
                    arena.decrease_key(n);
                }
                _ => {}
            }
        }

        arena.nbuf = nbuf;
    }

    // --- tracing ---

    /// Follow parents from `from` back to the seed. Returns the chain seed
    /// first.
    pub(crate) fn trace_chain(&self, arena: &SearchArena, from: NodeId) -> Result<Vec<NodeId>, SearchError> {
        let cap = self.config.max_trace_len;
        let mut nodes = Vec::new();
        let mut cur = Some(from);
        while let Some(n) = cur {
            if nodes.len() >= cap {
                warn!("trace from {from} exceeded {cap} nodes");
                return Err(SearchError::InvariantViolation(format!(
                    "trace exceeded {cap} nodes, the parent chain may contain a cycle"
                )));
            }
            nodes.push(n);
            cur = arena.record(n).and_then(|r| r.parent);
        }
        nodes.reverse();
        Ok(nodes)
    }

    /// Waypoints for `nodes`, with the ends replaced per the endpoint mode
    /// when they are the resolved nodes of `first` and `last`.
    pub(crate) fn waypoints(
        &self,
        graph: &dyn NavGraph,
        nodes: &[NodeId],
        first: Option<Endpoint>,
        last: Option<Endpoint>,
    ) -> Vec<Point> {
        let pick = |e: Endpoint| match self.endpoint_mode {
            EndpointMode::NodeCenters => None,
            EndpointMode::Snapped => Some(e.nearest.position),
            EndpointMode::Original => Some(e.point),
        };
        let mut w: Vec<Point> = nodes.iter().map(|&n| graph.position(n)).collect();
        let head = first
            .filter(|e| nodes.first() == Some(&e.node()))
            .and_then(pick);
        let tail = last
            .filter(|e| nodes.last() == Some(&e.node()))
            .and_then(pick);
        if let (Some(h), Some(t), 1) = (head, tail, w.len()) {
            return if h == t { vec![h] } else { vec![h, t] };
        }
        if let (Some(h), Some(p)) = (head, w.first_mut()) {
            *p = h;
        }
        if let (Some(t), Some(p)) = (tail, w.last_mut()) {
            *p = t;
        }
        w
    }

    /// Trace the terminal node into `path`, `waypoints` and `cost`.
    pub(crate) fn trace_terminal(&mut self, graph: &dyn NavGraph, arena: &SearchArena) -> Result<(), SearchError> {
        let terminal = self
            .terminal
            .ok_or_else(|| SearchError::InvariantViolation("no terminal node to trace from".into()))?;
        let nodes = self.trace_chain(arena, terminal)?;
        self.cost = arena.record(terminal).map_or(0, |r| r.g);
        self.waypoints = self.waypoints(graph, &nodes, self.start, self.end);
        self.path = nodes;
        Ok(())
    }
}

/// The error for an open list that ran dry without success.
pub(crate) fn exhausted_error(at_init: bool) -> SearchError {
    if at_init {
        SearchError::Unreachable("no open nodes, the start node did not open any nodes".into())
    } else {
        SearchError::Unreachable("searched whole area but could not find target".into())
    }
}

// ---------------------------------------------------------------------------
// SearchKind
// ---------------------------------------------------------------------------

pub(crate) enum SearchKind {
    Shortest(Shortest),
    Custom(Custom),
    RandomWalk(RandomWalk),
    Flood(Flood),
    FloodTrace(FloodTracer),
    Multi(MultiTarget),
    WithinCost(WithinCost),
}

impl SearchKind {
    fn name(&self) -> &'static str {
        match self {
            Self::Shortest(_) => "shortest",
            Self::Custom(_) => "custom",
            Self::RandomWalk(_) => "random walk",
            Self::Flood(_) => "flood",
            Self::FloodTrace(_) => "flood trace",
            Self::Multi(_) => "multi-target",
            Self::WithinCost(_) => "within cost",
        }
    }

    fn prepare(&mut self, core: &mut SearchCore, graph: &dyn NavGraph) -> Result<(), SearchError> {
        match self {
            Self::Shortest(s) => s.prepare(core, graph),
            Self::Custom(c) => c.prepare(core, graph),
            Self::RandomWalk(r) => r.prepare(core, graph),
            Self::Flood(f) => f.prepare(core, graph),
            Self::FloodTrace(t) => t.prepare(core, graph),
            Self::Multi(m) => m.prepare(core, graph),
            Self::WithinCost(w) => w.prepare(core, graph),
        }
    }

    /// Variant setup after the generation bump and before seeding.
    fn mark(&mut self, core: &mut SearchCore, graph: &dyn NavGraph, arena: &mut SearchArena) {
        match self {
            Self::Shortest(_) | Self::Custom(_) => core.mark_special(arena),
            Self::RandomWalk(r) => r.mark(core, arena),
            Self::Flood(f) => f.mark(core, graph),
            Self::Multi(m) => m.mark(core, graph, arena),
            Self::FloodTrace(_) | Self::WithinCost(_) => {}
        }
    }

    /// Called for every node as it is closed, seed included.
    fn visit(
        &mut self,
        core: &mut SearchCore,
        graph: &dyn NavGraph,
        arena: &mut SearchArena,
        node: NodeId,
    ) -> Result<Flow, SearchError> {
        match self {
            Self::Shortest(s) => Ok(s.visit(core, arena, node)),
            Self::Custom(c) => Ok(c.visit(core, graph, arena, node)),
            Self::RandomWalk(r) => Ok(r.visit(core, arena, node)),
            Self::Flood(f) => Ok(f.visit(arena, node)),
            Self::Multi(m) => m.visit(core, graph, arena, node),
            Self::WithinCost(w) => Ok(w.visit(arena, node)),
            Self::FloodTrace(_) => Ok(Flow::Stop),
        }
    }

    /// The open list ran dry.
    fn exhausted(&mut self, core: &mut SearchCore, at_init: bool) -> Result<(), SearchError> {
        match self {
            Self::Shortest(s) => s.exhausted(core, at_init),
            Self::Custom(c) => c.exhausted(core, at_init),
            Self::RandomWalk(r) => r.exhausted(core, at_init),
            Self::Multi(m) => m.exhausted(core, at_init),
            Self::Flood(_) | Self::WithinCost(_) => {
                let start = core.start_node()?;
                core.complete(start);
                Ok(())
            }
            Self::FloodTrace(_) => Ok(()),
        }
    }

    fn max_cost(&self) -> Option<u32> {
        match self {
            Self::WithinCost(w) => Some(w.max_cost()),
            _ => None,
        }
    }

    fn trace(&mut self, core: &mut SearchCore, graph: &dyn NavGraph, arena: &SearchArena) -> Result<(), SearchError> {
        match self {
            Self::FloodTrace(t) => t.trace(core, graph),
            Self::Multi(m) => m.trace(core, graph),
            _ => core.trace_terminal(graph, arena),
        }
    }

    fn finish(&mut self, result: &mut PathResult) {
        match self {
            Self::Flood(f) => f.finish(result),
            Self::Multi(m) => m.finish(result),
            Self::WithinCost(w) => w.finish(result),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// PathRequest
// ---------------------------------------------------------------------------

type Callback = Box<dyn FnOnce(&PathResult)>;

/// One path search, from endpoints to delivered result.
///
/// Requests are built with one of the constructors plus builder methods,
/// then either submitted to a [`Pathfinder`](crate::Pathfinder) or driven
/// directly through [`prepare`](Self::prepare),
/// [`initialize`](Self::initialize), [`step`](Self::step),
/// [`trace`](Self::trace), [`cleanup`](Self::cleanup) and
/// [`finish`](Self::finish). Calling a phase out of order fails the
/// request; it never panics.
pub struct PathRequest {
    core: SearchCore,
    kind: SearchKind,
    phase: Phase,
    traced: bool,
    callback: Option<Callback>,
}

impl PathRequest {
    fn with_kind(start: Point, end: Option<Point>, kind: SearchKind) -> Self {
        Self {
            core: SearchCore::new(start, end),
            kind,
            phase: Phase::Created,
            traced: false,
            callback: None,
        }
    }

    // --- constructors ---

    /// Shortest path from `start` to `end`.
    pub fn shortest(start: Point, end: Point) -> Self {
        Self::with_kind(start, Some(end), SearchKind::Shortest(Shortest::default()))
    }

    /// Search from `start` until `condition` accepts a dequeued node.
    ///
    /// The heuristic is off unless a target is given with
    /// [`heuristic_target`](Self::heuristic_target).
    pub fn custom(start: Point, condition: impl EndingCondition + 'static) -> Self {
        Self::with_kind(start, None, SearchKind::Custom(Custom::new(Box::new(condition))))
    }

    /// A path of cost roughly `budget` in a random direction.
    pub fn random_walk(start: Point, budget: u32) -> Self {
        Self::with_kind(start, None, SearchKind::RandomWalk(RandomWalk::new(budget)))
    }

    /// A path of cost roughly `budget` leading away from `avoid`.
    pub fn flee(start: Point, avoid: Point, budget: u32) -> Self {
        let aim = Aim {
            point: start + (start - avoid) * 10,
            strength: 1.0,
        };
        Self::random_walk(start, budget).aim(aim)
    }

    /// Visit every reachable node from `start`, producing a [`FloodMap`].
    pub fn flood(start: Point) -> Self {
        Self::with_kind(start, None, SearchKind::Flood(Flood::default()))
    }

    /// Read the path from `start` back to the origin of `flood`, without
    /// searching.
    pub fn flood_trace(start: Point, flood: Arc<FloodMap>) -> Self {
        Self::with_kind(start, None, SearchKind::FloodTrace(FloodTracer::new(flood)))
    }

    /// Paths from `start` to each of `targets`.
    pub fn multi_target(start: Point, targets: Vec<Point>) -> Self {
        Self::with_kind(start, None, SearchKind::Multi(MultiTarget::new(targets, false)))
    }

    /// Paths from each of `starts` to `target`, found with one search from
    /// the target.
    pub fn multi_start(starts: Vec<Point>, target: Point) -> Self {
        Self::with_kind(target, None, SearchKind::Multi(MultiTarget::new(starts, true)))
    }

    /// Every node reachable from `start` for at most `max_cost`.
    pub fn within_cost(start: Point, max_cost: u32) -> Self {
        Self::with_kind(start, None, SearchKind::WithinCost(WithinCost::new(max_cost)))
    }

    // --- builder ---

    /// Fall back to the closest node found when the target is unreachable.
    /// Applies to shortest and custom requests. A custom request needs a
    /// [`heuristic_target`](Self::heuristic_target) to rank nodes by, and
    /// fails in prepare without one.
    pub fn partial(mut self, partial: bool) -> Self {
        self.core.partial = partial;
        self
    }

    pub fn traversal(mut self, traversal: Traversal) -> Self {
        self.core.traversal = traversal;
        self
    }

    /// Filter for endpoint resolution. Defaults to walkable nodes with a
    /// tag enabled by the request's [`Traversal`].
    pub fn constraint(mut self, constraint: NodeConstraint) -> Self {
        self.core.constraint = Some(constraint);
        self
    }

    pub fn endpoints(mut self, mode: EndpointMode) -> Self {
        self.core.endpoint_mode = mode;
        self
    }

    /// Rescale edges at the start and end to the exact endpoints.
    pub fn recalc_start_end_costs(mut self, on: bool) -> Self {
        self.core.recalc_start_end_costs = on;
        self
    }

    pub fn heuristic(mut self, heuristic: Heuristic) -> Self {
        self.core.heuristic_override = Some(heuristic);
        self.core.heuristic = heuristic;
        self
    }

    pub fn heuristic_scale(mut self, scale: f32) -> Self {
        self.core.scale_override = Some(scale);
        self.core.heuristic_scale = scale;
        self
    }

    /// Steer a custom request towards `point`.
    pub fn heuristic_target(mut self, point: Point) -> Self {
        self.core.h_target = Some(point);
        self
    }

    /// Replace the engine settings. A [`Pathfinder`](crate::Pathfinder)
    /// overwrites these with its own on submit.
    pub fn with_config(mut self, config: PathfinderConfig) -> Self {
        self.core.configure(config);
        self
    }

    /// Seed for random walks. Unseeded walks draw a fresh seed from the
    /// thread rng, so repeated walks from one start end in different places.
    pub fn seed(mut self, seed: u64) -> Self {
        if let SearchKind::RandomWalk(r) = &mut self.kind {
            r.seed = Some(seed);
        }
        self
    }

    /// Width of the cost window random walks pick their end from.
    pub fn spread(mut self, spread: u32) -> Self {
        if let SearchKind::RandomWalk(r) = &mut self.kind {
            r.spread = spread;
        }
        self
    }

    /// Bias a random walk towards a point.
    pub fn aim(mut self, aim: Aim) -> Self {
        if let SearchKind::RandomWalk(r) = &mut self.kind {
            r.aim = Some(aim);
        }
        self
    }

    /// Whether a multi-target request finds every target (the default) or
    /// stops at the closest one.
    pub fn paths_for_all(mut self, all: bool) -> Self {
        if let SearchKind::Multi(m) = &mut self.kind {
            m.paths_for_all = all;
        }
        self
    }

    pub fn heuristic_mode(mut self, mode: HeuristicMode) -> Self {
        if let SearchKind::Multi(m) = &mut self.kind {
            m.mode = mode;
        }
        self
    }

    /// Called on delivery with each reached target's path.
    pub fn on_target(mut self, f: impl FnMut(&TargetPath) + 'static) -> Self {
        if let SearchKind::Multi(m) = &mut self.kind {
            m.on_target = Some(Box::new(f));
        }
        self
    }

    /// Called once with the delivered result.
    pub fn callback(mut self, f: impl FnOnce(&PathResult) + 'static) -> Self {
        self.callback = Some(Box::new(f));
        self
    }

    // --- accessors ---

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> CompleteState {
        self.core.state
    }

    pub fn error(&self) -> Option<&SearchError> {
        self.core.error.as_ref()
    }

    /// The node most recently dequeued.
    pub fn current(&self) -> Option<NodeId> {
        self.core.current
    }

    pub fn searched_nodes(&self) -> u32 {
        self.core.expansions
    }

    pub(crate) fn configure(&mut self, config: PathfinderConfig) {
        self.core.configure(config);
    }

    // --- lifecycle ---

    /// Move from `expected` to `next`, or fail the request.
    fn enter(&mut self, expected: Phase, next: Phase) -> bool {
        if self.phase != expected {
            self.core.fail(SearchError::InvalidRequestState(format!(
                "cannot enter {next:?} from {:?}",
                self.phase
            )));
            return false;
        }
        self.phase = next;
        true
    }

    fn settle(&mut self) {
        if self.phase == Phase::Searching && self.core.state.is_terminal() {
            self.phase = Phase::Searched;
        }
    }

    /// Resolve the endpoints.
    pub fn prepare(&mut self, graph: &dyn NavGraph, arena: &mut SearchArena) {
        if !self.enter(Phase::Created, Phase::Prepared) {
            return;
        }
        self.core.started = Some(Instant::now());
        if self.core.state.is_terminal() {
            return;
        }
        arena.ensure_capacity(graph.node_count());
        if let Err(e) = self.kind.prepare(&mut self.core, graph) {
            self.core.fail(e);
        }
    }

    /// Seed the search and open the start node.
    pub fn initialize(&mut self, graph: &dyn NavGraph, arena: &mut SearchArena) {
        if !self.enter(Phase::Prepared, Phase::Searching) {
            return;
        }
        if !self.core.state.is_terminal() {
            if let Err(e) = self.initialize_search(graph, arena) {
                self.core.fail(e);
            }
        }
        self.settle();
    }

    fn initialize_search(&mut self, graph: &dyn NavGraph, arena: &mut SearchArena) -> Result<(), SearchError> {
        arena.ensure_capacity(graph.node_count());
        let start = self.core.start_node()?;
        if let SearchKind::FloodTrace(_) = self.kind {
            self.core.complete(start);
            return Ok(());
        }

        arena.begin_search();
        self.kind.mark(&mut self.core, graph, arena);
        self.core.seed(graph, arena, start);
        self.core.current = Some(start);
        if self.kind.visit(&mut self.core, graph, arena, start)? == Flow::Stop || self.core.state.is_terminal() {
            return Ok(());
        }
        self.core.expand(graph, arena, start, self.kind.max_cost());
        if arena.open_is_empty() {
            self.kind.exhausted(&mut self.core, true)?;
        }
        Ok(())
    }

    /// Expand nodes until the search ends or `deadline` passes.
    pub fn step(&mut self, graph: &dyn NavGraph, arena: &mut SearchArena, deadline: Deadline) -> StepStatus {
        let mut budget = Budget::new(deadline);
        self.step_budget(graph, arena, &mut budget)
    }

    pub(crate) fn step_budget(
        &mut self,
        graph: &dyn NavGraph,
        arena: &mut SearchArena,
        budget: &mut Budget,
    ) -> StepStatus {
        match self.phase {
            Phase::Searching => {}
            Phase::Searched | Phase::Traced | Phase::Cleaned => return StepStatus::Done,
            Phase::Created | Phase::Prepared => {
                self.core.fail(SearchError::InvalidRequestState(format!(
                    "cannot step from {:?}",
                    self.phase
                )));
                return StepStatus::Done;
            }
        }
        if self.core.state.is_terminal() {
            self.settle();
            return StepStatus::Done;
        }
        if budget.out_of_expansions() {
            return StepStatus::Running;
        }

        let interval = self.core.config.time_check_interval.max(1);
        let max_cost = self.kind.max_cost();
        let mut since_check = 0;
        loop {
            let Some(current) = arena.pop_open() else {
                if let Err(e) = self.kind.exhausted(&mut self.core, false) {
                    self.core.fail(e);
                }
                break;
            };
            self.core.current = Some(current);
            self.core.expansions += 1;
            if self.core.expansions > self.core.config.max_expansions {
                warn!(
                    "{} search gave up after {} expansions",
                    self.kind.name(),
                    self.core.config.max_expansions
                );
                self.core.fail(SearchError::InvariantViolation(format!(
                    "exceeded {} node expansions",
                    self.core.config.max_expansions
                )));
                break;
            }

            match self.kind.visit(&mut self.core, graph, arena, current) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => break,
                Err(e) => {
                    self.core.fail(e);
                    break;
                }
            }
            if self.core.state.is_terminal() {
                break;
            }
            self.core.expand(graph, arena, current, max_cost);

            budget.spend();
            if budget.out_of_expansions() {
                trace!("{} search yields after {} expansions", self.kind.name(), self.core.expansions);
                return StepStatus::Running;
            }
            since_check += 1;
            if since_check >= interval {
                since_check = 0;
                if budget.past_deadline() {
                    trace!("{} search yields at deadline", self.kind.name());
                    return StepStatus::Running;
                }
            }
        }

        self.settle();
        StepStatus::Done
    }

    /// Build the node path and waypoints.
    pub fn trace(&mut self, graph: &dyn NavGraph, arena: &SearchArena) {
        if !self.enter(Phase::Searched, Phase::Traced) {
            return;
        }
        self.traced = true;
        if !self.core.state.has_path() {
            return;
        }
        if let Err(e) = self.kind.trace(&mut self.core, graph, arena) {
            self.core.fail(e);
        }
    }

    /// Clear the flags this search placed in `arena`.
    ///
    /// Allowed in any phase, which abandons an unfinished search. A search
    /// that found a path but was never traced fails instead of being
    /// delivered without one.
    pub fn cleanup(&mut self, arena: &mut SearchArena) {
        self.core.clear_flags(arena);
        if self.phase == Phase::Searched && self.core.state.has_path() {
            self.core.fail(SearchError::InvalidRequestState("cleaned up before trace".into()));
        }
        self.phase = Phase::Cleaned;
    }

    /// Run whichever phases remain, stepping within `deadline`.
    ///
    /// Returns [`StepStatus::Done`] once the request is cleaned up and
    /// ready for [`finish`](Self::finish).
    pub fn advance(&mut self, graph: &dyn NavGraph, arena: &mut SearchArena, deadline: Deadline) -> StepStatus {
        let mut budget = Budget::new(deadline);
        self.advance_budget(graph, arena, &mut budget)
    }

    pub(crate) fn advance_budget(
        &mut self,
        graph: &dyn NavGraph,
        arena: &mut SearchArena,
        budget: &mut Budget,
    ) -> StepStatus {
        if self.phase == Phase::Created {
            self.prepare(graph, arena);
        }
        if self.phase == Phase::Prepared {
            self.initialize(graph, arena);
        }
        if self.phase == Phase::Searching && self.step_budget(graph, arena, budget) == StepStatus::Running {
            return StepStatus::Running;
        }
        if self.phase == Phase::Searched {
            self.trace(graph, arena);
        }
        if self.phase != Phase::Cleaned {
            self.cleanup(arena);
        }
        StepStatus::Done
    }

    /// Consume the request into its result and run its callbacks.
    ///
    /// A request that has not reached a terminal state, or found a path it
    /// never traced, is delivered as an error.
    pub fn finish(mut self) -> PathResult {
        if !self.core.state.is_terminal() {
            self.core.fail(SearchError::InvalidRequestState(
                "delivered before the search finished".into(),
            ));
        } else if self.core.state.has_path() && !self.traced {
            self.core.fail(SearchError::InvalidRequestState("delivered before trace".into()));
        }
        let core = &mut self.core;
        let mut result = PathResult {
            state: core.state,
            error: core.error.take(),
            path: std::mem::take(&mut core.path),
            waypoints: std::mem::take(&mut core.waypoints),
            cost: core.cost,
            searched_nodes: core.expansions,
            duration: core.started.map(|t| t.elapsed()).unwrap_or_default(),
            ..PathResult::default()
        };
        self.kind.finish(&mut result);
        debug!(
            "{} request {:?}: {} nodes searched in {:?}, path of {} nodes",
            self.kind.name(),
            result.state,
            result.searched_nodes,
            result.duration,
            result.path.len()
        );
        if let Some(cb) = self.callback.take() {
            cb(&result);
        }
        result
    }

    /// Run the request to completion on a private arena.
    pub fn search(self, graph: &dyn NavGraph) -> PathResult {
        let mut arena = SearchArena::new(graph.node_count());
        self.search_in(graph, &mut arena)
    }

    /// Run the request to completion on `arena`.
    pub fn search_in(mut self, graph: &dyn NavGraph, arena: &mut SearchArena) -> PathResult {
        self.advance(graph, arena, Deadline::Never);
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_core::{GridGraph, PointGraph};

    const OPEN: &str = "
        .....
        .....
        .....
    ";

    fn grid(map: &str) -> GridGraph {
        GridGraph::from_ascii(map, 10)
    }

    fn c(g: &GridGraph, x: i32, y: i32) -> Point {
        g.center(Point::new(x, y))
    }

    fn cells(g: &GridGraph, r: &PathResult) -> Vec<(i32, i32)> {
        r.path()
            .iter()
            .map(|&n| {
                let p = g.cell_of(n);
                (p.x, p.y)
            })
            .collect()
    }

    #[test]
    fn straight_line() {
        let g = grid(OPEN);
        let r = PathRequest::shortest(c(&g, 0, 1), c(&g, 4, 1)).search(&g);
        assert!(r.is_complete());
        assert_eq!(cells(&g, &r), vec![(0, 1), (1, 1), (2, 1), (3, 1), (4, 1)]);
        assert_eq!(r.cost(), 40);
        assert_eq!(r.waypoints().first(), Some(&Point::new(5, 15)));
    }

    #[test]
    fn start_equals_end() {
        let g = grid(OPEN);
        let r = PathRequest::shortest(c(&g, 2, 2), c(&g, 2, 2)).search(&g);
        assert!(r.is_complete());
        assert_eq!(r.path().len(), 1);
        assert_eq!(r.searched_nodes(), 0);
    }

    #[test]
    fn disconnected_fails_in_prepare() {
        let g = grid("..#..");
        let r = PathRequest::shortest(c(&g, 0, 0), c(&g, 4, 0)).search(&g);
        assert!(r.is_error());
        assert!(matches!(r.error(), Some(SearchError::Unreachable(_))));
        assert_eq!(r.searched_nodes(), 0);
    }

    #[test]
    fn partial_goes_to_closest() {
        let g = grid("..#..");
        let r = PathRequest::shortest(c(&g, 0, 0), c(&g, 4, 0))
            .partial(true)
            .search(&g);
        assert!(r.is_partial());
        assert_eq!(cells(&g, &r), vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn isolated_start_without_partial() {
        let g = grid(".#.");
        let r = PathRequest::custom(c(&g, 0, 0), |_: NodeId, _: &crate::SearchRecord, _: &NodeInfo| false).search(&g);
        assert!(r.is_error());
        assert_eq!(
            r.error().map(|e| e.reason()),
            Some("no open nodes, the start node did not open any nodes")
        );
    }

    #[test]
    fn no_walkable_node() {
        let g = grid("###");
        let r = PathRequest::shortest(c(&g, 0, 0), c(&g, 2, 0)).search(&g);
        assert!(matches!(r.error(), Some(SearchError::EndpointResolution(_))));
    }

    #[test]
    fn penalties_route_around() {
        let mut g = grid(OPEN);
        for x in 1..4 {
            g.set_penalty(Point::new(x, 1), 100);
        }
        let r = PathRequest::shortest(c(&g, 0, 1), c(&g, 4, 1)).search(&g);
        assert_eq!(r.cost(), 60);
        assert!(!cells(&g, &r).contains(&(2, 1)));
    }

    #[test]
    fn disabled_tag_blocks() {
        let g = grid(
            "
            .1.
            ...
            ",
        );
        let t = Traversal::new().without_tag(1);
        let r = PathRequest::shortest(c(&g, 0, 0), c(&g, 2, 0))
            .traversal(t)
            .search(&g);
        assert_eq!(r.cost(), 40);
        assert!(!cells(&g, &r).contains(&(1, 0)));
    }

    #[test]
    fn out_of_order_phases_fail_without_panic() {
        let g = grid(OPEN);
        let mut arena = SearchArena::new(g.node_count());
        let mut req = PathRequest::shortest(c(&g, 0, 0), c(&g, 4, 2));
        req.trace(&g, &arena);
        assert_eq!(req.state(), CompleteState::Error);
        assert!(matches!(req.error(), Some(SearchError::InvalidRequestState(_))));
        // The in-order sequence still runs to delivery.
        req.prepare(&g, &mut arena);
        req.initialize(&g, &mut arena);
        assert_eq!(req.step(&g, &mut arena, Deadline::Never), StepStatus::Done);
        req.trace(&g, &arena);
        req.cleanup(&mut arena);
        let r = req.finish();
        assert!(r.is_error());
        assert!(r.path().is_empty());
    }

    #[test]
    fn finish_without_trace_is_an_error() {
        let g = grid(OPEN);
        let mut arena = SearchArena::new(g.node_count());
        let mut req = PathRequest::shortest(c(&g, 0, 0), c(&g, 4, 2));
        req.prepare(&g, &mut arena);
        req.initialize(&g, &mut arena);
        assert_eq!(req.step(&g, &mut arena, Deadline::Never), StepStatus::Done);
        assert_eq!(req.state(), CompleteState::Complete);
        let r = req.finish();
        assert_eq!(r.state(), CompleteState::Error);
        assert!(matches!(r.error(), Some(SearchError::InvalidRequestState(_))));
        assert!(r.path().is_empty());
    }

    #[test]
    fn cleanup_before_trace_fails_the_request() {
        let g = grid(OPEN);
        let mut arena = SearchArena::new(g.node_count());
        let mut req = PathRequest::shortest(c(&g, 0, 0), c(&g, 4, 2));
        req.prepare(&g, &mut arena);
        req.initialize(&g, &mut arena);
        req.step(&g, &mut arena, Deadline::Never);
        req.cleanup(&mut arena);
        assert_eq!(req.phase(), Phase::Cleaned);
        assert!(matches!(req.error(), Some(SearchError::InvalidRequestState(_))));
        let r = req.finish();
        assert!(r.is_error());
        assert!(r.path().is_empty());

        // Traced before cleanup, the same search delivers its path.
        let mut req = PathRequest::shortest(c(&g, 0, 0), c(&g, 4, 2));
        req.prepare(&g, &mut arena);
        req.initialize(&g, &mut arena);
        req.step(&g, &mut arena, Deadline::Never);
        req.trace(&g, &arena);
        req.cleanup(&mut arena);
        let r = req.finish();
        assert!(r.is_complete());
        assert_eq!(r.cost(), 60);
        assert_eq!(r.path().len(), 7);
    }

    #[test]
    fn step_before_initialize_fails() {
        let g = grid(OPEN);
        let mut arena = SearchArena::new(g.node_count());
        let mut req = PathRequest::shortest(c(&g, 0, 0), c(&g, 4, 2));
        req.prepare(&g, &mut arena);
        assert_eq!(req.step(&g, &mut arena, Deadline::Never), StepStatus::Done);
        assert!(matches!(req.error(), Some(SearchError::InvalidRequestState(_))));
    }

    #[test]
    fn finish_before_terminal_is_an_error() {
        let g = grid(OPEN);
        let mut arena = SearchArena::new(g.node_count());
        let mut req = PathRequest::shortest(c(&g, 0, 0), c(&g, 4, 2));
        req.prepare(&g, &mut arena);
        req.initialize(&g, &mut arena);
        let r = req.finish();
        assert!(matches!(r.error(), Some(SearchError::InvalidRequestState(_))));
    }

    #[test]
    fn expansion_budget_yields_and_resumes() {
        let g = grid(OPEN);
        let mut arena = SearchArena::new(g.node_count());
        let mut req = PathRequest::shortest(c(&g, 0, 0), c(&g, 4, 2)).heuristic(Heuristic::None);
        req.prepare(&g, &mut arena);
        req.initialize(&g, &mut arena);
        assert_eq!(req.step(&g, &mut arena, Deadline::Expansions(2)), StepStatus::Running);
        assert_eq!(req.searched_nodes(), 2);
        assert!(req.current().is_some());
        assert_eq!(req.step(&g, &mut arena, Deadline::Never), StepStatus::Done);
        req.trace(&g, &arena);
        req.cleanup(&mut arena);
        let r = req.finish();
        assert!(r.is_complete());
        assert_eq!(r.cost(), 60);
    }

    #[test]
    fn expansion_cap() {
        let g = grid(OPEN);
        let cfg = PathfinderConfig {
            max_expansions: 3,
            ..PathfinderConfig::default()
        };
        let r = PathRequest::shortest(c(&g, 0, 0), c(&g, 4, 2))
            .heuristic(Heuristic::None)
            .with_config(cfg)
            .search(&g);
        assert!(matches!(r.error(), Some(SearchError::InvariantViolation(_))));
    }

    #[test]
    fn trace_cap() {
        let g = grid(OPEN);
        let cfg = PathfinderConfig {
            max_trace_len: 3,
            ..PathfinderConfig::default()
        };
        let r = PathRequest::shortest(c(&g, 0, 0), c(&g, 4, 0))
            .with_config(cfg)
            .search(&g);
        assert!(matches!(r.error(), Some(SearchError::InvariantViolation(_))));
    }

    #[test]
    fn special_cost_measures_from_exact_endpoints() {
        let g = grid(OPEN);
        // Start at the right edge of cell (0,1), end at the left edge of
        // cell (4,1): 31 units apart along the row.
        let start = Point::new(9, 15);
        let end = Point::new(40, 15);
        let r = PathRequest::shortest(start, end)
            .endpoints(EndpointMode::Snapped)
            .search(&g);
        assert!(r.is_complete());
        // 6 + 10 + 10 + 5 instead of 40.
        assert_eq!(r.cost(), 31);
        assert_eq!(r.waypoints().first(), Some(&start));
        assert_eq!(r.waypoints().last(), Some(&end));

        let r = PathRequest::shortest(start, end)
            .recalc_start_end_costs(false)
            .search(&g);
        assert_eq!(r.cost(), 40);
    }

    #[test]
    fn endpoint_modes() {
        let g = grid(OPEN);
        // Off centre inside cell (0,0).
        let start = Point::new(1, 2);
        let end = c(&g, 2, 0);
        let centres = PathRequest::shortest(start, end).search(&g);
        assert_eq!(centres.waypoints()[0], Point::new(5, 5));
        let original = PathRequest::shortest(start, end)
            .endpoints(EndpointMode::Original)
            .search(&g);
        assert_eq!(original.waypoints()[0], start);
    }

    #[test]
    fn original_endpoint_outside_graph() {
        let g = grid(OPEN);
        let far = Point::new(-50, 15);
        let snapped = PathRequest::shortest(far, c(&g, 2, 1))
            .endpoints(EndpointMode::Snapped)
            .search(&g);
        assert_eq!(snapped.waypoints()[0], Point::new(0, 15));
        let original = PathRequest::shortest(far, c(&g, 2, 1))
            .endpoints(EndpointMode::Original)
            .search(&g);
        assert_eq!(original.waypoints()[0], far);
    }

    #[test]
    fn custom_condition_with_heuristic_target() {
        let g = grid(OPEN);
        let goal = g.node_at(Point::new(4, 2)).unwrap();
        let r = PathRequest::custom(c(&g, 0, 0), crate::TargetNode(goal))
            .heuristic_target(c(&g, 4, 2))
            .search(&g);
        assert!(r.is_complete());
        assert_eq!(r.end_node(), Some(goal));
        assert_eq!(r.cost(), 60);
    }

    #[test]
    fn custom_within_distance() {
        let g = grid(OPEN);
        let cond = crate::WithinDistance {
            point: c(&g, 4, 1),
            distance: 10,
        };
        let r = PathRequest::custom(c(&g, 0, 1), cond).search(&g);
        assert!(r.is_complete());
        assert_eq!(r.cost(), 30);
    }

    #[test]
    fn partial_custom_goes_towards_heuristic_target() {
        let g = grid("..#..");
        let never = |_: NodeId, _: &crate::SearchRecord, _: &NodeInfo| false;
        let r = PathRequest::custom(c(&g, 0, 0), never)
            .partial(true)
            .heuristic_target(c(&g, 4, 0))
            .search(&g);
        assert!(r.is_partial());
        assert_eq!(cells(&g, &r), vec![(0, 0), (1, 0)]);

        // Without a target every node ties on h.
        let r = PathRequest::custom(c(&g, 0, 0), never).partial(true).search(&g);
        assert!(matches!(r.error(), Some(SearchError::InvalidRequestState(_))));
        assert_eq!(r.searched_nodes(), 0);
    }

    #[test]
    fn callback_runs_on_finish() {
        use std::cell::Cell;
        use std::rc::Rc;
        let g = grid(OPEN);
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        let r = PathRequest::shortest(c(&g, 0, 0), c(&g, 1, 0))
            .callback(move |r| s.set(r.path().len()))
            .search(&g);
        assert!(r.is_complete());
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn point_graph_prefers_cheaper_edges() {
        let mut g = PointGraph::new();
        let a = g.add_node(Point::new(0, 0));
        let b = g.add_node(Point::new(10, 0));
        let m = g.add_node(Point::new(5, 5));
        g.add_edge(a, b, 100);
        g.add_edge(a, m, 10);
        g.add_edge(m, b, 10);
        let r = PathRequest::shortest(Point::new(0, 0), Point::new(10, 0))
            .recalc_start_end_costs(false)
            .search(&g);
        assert_eq!(r.path(), &[a, m, b]);
        assert_eq!(r.cost(), 20);
    }
}
