use std::sync::Arc;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wayfarer_core::{CaveGen, CellularAutomataRule, GridCell, GridGraph, NavGraph, NodeId, Point};
use wayfarer_paths::{
    CompleteState, Deadline, FloodMap, Heuristic, HeuristicMode, PathRequest, PathResult, Phase,
    SearchArena, SearchError, StepStatus,
};

fn cave(seed: u64) -> GridGraph {
    let mut caves = CaveGen::new(30, 20, StdRng::seed_from_u64(seed));
    caves.cellular_automata(0.42, &[CellularAutomataRule::default()]);
    let rough = caves.scatter_rough_terrain(0.2, 0, 25);
    caves.build(10, &rough)
}

/// Floor cells of the largest area.
fn largest_area(g: &GridGraph) -> Vec<NodeId> {
    let mut by_area: std::collections::HashMap<u32, Vec<NodeId>> = Default::default();
    for i in 0..g.node_count() as u32 {
        let info = g.node(NodeId(i));
        if info.walkable {
            by_area.entry(info.area).or_default().push(NodeId(i));
        }
    }
    by_area
        .into_values()
        .max_by_key(|v| (v.len(), std::cmp::Reverse(v[0])))
        .unwrap_or_default()
}

/// Plain Dijkstra over the graph's edges. Entering a node costs its edge
/// plus its penalty.
fn reference_costs(g: &dyn NavGraph, from: NodeId) -> Vec<Option<u32>> {
    let n = g.node_count();
    let mut dist: Vec<Option<u32>> = vec![None; n];
    let mut done = vec![false; n];
    dist[from.index()] = Some(0);
    loop {
        let next = (0..n)
            .filter(|&i| !done[i])
            .filter_map(|i| dist[i].map(|d| (d, i)))
            .min();
        let Some((d, i)) = next else {
            break;
        };
        done[i] = true;
        g.for_each_edge(NodeId(i as u32), &mut |m, c| {
            let info = g.node(m);
            if !info.walkable {
                return;
            }
            let nd = d + c + info.penalty;
            if dist[m.index()].is_none_or(|old| nd < old) {
                dist[m.index()] = Some(nd);
            }
        });
    }
    dist
}

fn path_cost(g: &dyn NavGraph, path: &[NodeId]) -> u32 {
    let mut total = 0;
    for w in path.windows(2) {
        let mut edge = None;
        g.for_each_edge(w[0], &mut |m, c| {
            if m == w[1] {
                edge = Some(c);
            }
        });
        total += edge.expect("consecutive path nodes share an edge") + g.node(w[1]).penalty;
    }
    total
}

fn stepped(g: &GridGraph, mut req: PathRequest, k: u32) -> PathResult {
    let mut arena = SearchArena::new(g.node_count());
    while req.advance(g, &mut arena, Deadline::Expansions(k)) == StepStatus::Running {
        assert_eq!(req.phase(), Phase::Searching);
    }
    req.finish()
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn same_inputs_same_paths() {
    let g = cave(7);
    let area = largest_area(&g);
    let (a, b) = (area[0], area[area.len() - 1]);
    let run = || PathRequest::shortest(g.position(a), g.position(b)).search(&g);
    let (r1, r2) = (run(), run());
    assert!(r1.is_complete());
    assert_eq!(r1.path(), r2.path());
    assert_eq!(r1.cost(), r2.cost());
    assert_eq!(r1.searched_nodes(), r2.searched_nodes());

    let walk = || {
        PathRequest::random_walk(g.position(a), 80)
            .spread(40)
            .seed(3)
            .search(&g)
    };
    assert_eq!(walk().path(), walk().path());
}

// ---------------------------------------------------------------------------
// Optimality
// ---------------------------------------------------------------------------

#[test]
fn shortest_matches_reference_on_caves() {
    for seed in 0..4 {
        let g = cave(seed);
        let area = largest_area(&g);
        if area.len() < 2 {
            continue;
        }
        let from = area[0];
        let reference = reference_costs(&g, from);
        for &to in area.iter().step_by(7) {
            let r = PathRequest::shortest(g.position(from), g.position(to)).search(&g);
            assert!(r.is_complete(), "seed {seed}: {:?}", r.error());
            assert_eq!(Some(r.cost()), reference[to.index()], "seed {seed} to {to}");
            assert_eq!(path_cost(&g, r.path()), r.cost());
        }
    }
}

proptest! {
    #[test]
    fn shortest_is_optimal_on_small_grids(
        walls in proptest::collection::vec(proptest::bool::weighted(0.3), 16),
        penalties in proptest::collection::vec(0u32..30, 16),
        s in 0usize..16,
        e in 0usize..16,
    ) {
        prop_assume!(!walls[s] && !walls[e]);
        let cells = walls
            .iter()
            .zip(&penalties)
            .map(|(&w, &p)| if w { GridCell::WALL } else { GridCell { penalty: p, ..GridCell::FLOOR } })
            .collect();
        let g = GridGraph::from_cells(4, 4, 10, cells);
        let (from, to) = (NodeId(s as u32), NodeId(e as u32));
        let r = PathRequest::shortest(g.position(from), g.position(to)).search(&g);
        match reference_costs(&g, from)[e] {
            Some(best) => {
                prop_assert!(r.is_complete());
                prop_assert_eq!(r.cost(), best);
                prop_assert_eq!(path_cost(&g, r.path()), best);
                prop_assert_eq!(r.path().first().copied(), Some(from));
                prop_assert_eq!(r.path().last().copied(), Some(to));
            }
            None => {
                prop_assert!(matches!(r.error(), Some(SearchError::Unreachable(_))));
            }
        }
    }

    #[test]
    fn bounded_steps_match_one_unbounded_run(seed in 0u64..6, k in 1u32..40) {
        let g = cave(seed);
        let area = largest_area(&g);
        prop_assume!(area.len() > 1);
        let (a, b) = (area[0], area[area.len() / 2]);
        let req = || PathRequest::shortest(g.position(a), g.position(b));
        let whole = req().search(&g);
        let sliced = stepped(&g, req(), k);
        prop_assert_eq!(sliced.state(), whole.state());
        prop_assert_eq!(sliced.path(), whole.path());
        prop_assert_eq!(sliced.cost(), whole.cost());
        prop_assert_eq!(sliced.searched_nodes(), whole.searched_nodes());
    }
}

// ---------------------------------------------------------------------------
// Partial fallback
// ---------------------------------------------------------------------------

#[test]
fn partial_stops_closest_to_an_unreachable_target() {
    let g = GridGraph::from_ascii(
        "
        ......#...
        ......#...
        ......#...
        ",
        10,
    );
    let target = g.center(Point::new(9, 0));
    let r = PathRequest::shortest(g.center(Point::new(0, 2)), target)
        .partial(true)
        .search(&g);
    assert_eq!(r.state(), CompleteState::Partial);
    assert_eq!(r.end_node(), g.node_at(Point::new(5, 0)));
    assert_eq!(r.cost(), 70);

    let r = PathRequest::shortest(g.center(Point::new(0, 2)), target).search(&g);
    assert!(matches!(r.error(), Some(SearchError::Unreachable(_))));
}

// ---------------------------------------------------------------------------
// Flood and tracer
// ---------------------------------------------------------------------------

#[test]
fn traced_flood_paths_are_shortest_paths() {
    let mut g = cave(11);
    for i in 0..g.node_count() as u32 {
        let p = g.cell_of(NodeId(i));
        g.set_penalty(p, 0);
    }
    let area = largest_area(&g);
    let origin = area[area.len() / 3];
    let r = PathRequest::flood(g.position(origin)).search(&g);
    assert!(r.is_complete());
    let flood: Arc<FloodMap> = r.flood().cloned().expect("flood map");
    assert_eq!(flood.reached().len(), area.len());

    for &n in area.iter().step_by(5) {
        assert!(flood.has_path_to(n));
        let traced = PathRequest::flood_trace(g.position(n), flood.clone()).search(&g);
        assert!(traced.is_complete());
        assert_eq!(traced.path().first().copied(), Some(n));
        assert_eq!(traced.path().last().copied(), Some(origin));

        let direct = PathRequest::shortest(g.position(origin), g.position(n))
            .heuristic(Heuristic::None)
            .search(&g);
        assert_eq!(traced.cost(), direct.cost(), "to {n}");
        let back: Vec<NodeId> = traced.path().iter().rev().copied().collect();
        assert_eq!(back, direct.path(), "to {n}");
    }
}

// ---------------------------------------------------------------------------
// Multi-target
// ---------------------------------------------------------------------------

#[test]
fn closest_of_three() {
    let g = GridGraph::new(12, 1, 10);
    let at = |x| g.center(Point::new(x, 0));
    let r = PathRequest::multi_target(at(0), vec![at(10), at(3), at(7)])
        .paths_for_all(false)
        .search(&g);
    assert_eq!(r.chosen_target(), Some(1));
    assert_eq!(r.end_node(), g.node_at(Point::new(3, 0)));
}

/// Every heuristic mode retargets and rebuilds the open list as targets
/// resolve; each target's cost must still be the true shortest cost.
#[test]
fn every_target_gets_its_shortest_path() {
    let g = cave(5);
    let area = largest_area(&g);
    let start = area[0];
    let targets: Vec<NodeId> = area.iter().copied().skip(3).step_by(area.len() / 6 + 1).collect();
    let reference = reference_costs(&g, start);
    let points: Vec<Point> = targets.iter().map(|&t| g.position(t)).collect();

    for mode in [
        HeuristicMode::None,
        HeuristicMode::Average,
        HeuristicMode::MovingAverage,
        HeuristicMode::Midpoint,
        HeuristicMode::MovingMidpoint,
        HeuristicMode::Sequential,
    ] {
        let r = PathRequest::multi_target(g.position(start), points.clone())
            .heuristic_mode(mode)
            .search(&g);
        assert!(r.is_complete(), "{mode:?}");
        for (t, tp) in targets.iter().zip(r.targets()) {
            assert_eq!(tp.cost, reference[t.index()], "{mode:?} target {}", tp.index);
            assert_eq!(path_cost(&g, &tp.nodes), tp.cost.unwrap_or(0));
        }
        let best = targets.iter().filter_map(|t| reference[t.index()]).min();
        assert_eq!(Some(r.cost()), best, "{mode:?}");
    }
}

#[test]
fn stepped_multi_target_matches_unbounded() {
    let g = cave(2);
    let area = largest_area(&g);
    let points: Vec<Point> = area.iter().rev().step_by(9).take(5).map(|&n| g.position(n)).collect();
    let req = || PathRequest::multi_target(g.position(area[0]), points.clone());
    let whole = req().search(&g);
    let sliced = stepped(&g, req(), 3);
    assert_eq!(whole.targets(), sliced.targets());
    assert_eq!(whole.chosen_target(), sliced.chosen_target());
}
