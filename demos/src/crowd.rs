//! Headless crowd simulation.
//!
//! Agents wander a generated cave. Each frame every idle agent submits a
//! path request (a trip to a random floor cell, a random walk, or a flight
//! from the crowd's centre), and the pathfinder is pumped under a fixed
//! per-frame time budget. Searches that do not fit in one frame continue in
//! the next.
//!
//! Usage:
//!   cargo run -p wayfarer-demos --bin crowd -- --agents 200 --frames 300
//!   RUST_LOG=debug cargo run -p wayfarer-demos --bin crowd

use std::collections::HashMap;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use wayfarer_core::{CaveGen, CellularAutomataRule, GridGraph, NavGraph, NodeId, Point};
use wayfarer_paths::{
    Deadline, EndpointMode, PathLog, PathRequest, Pathfinder, PathfinderConfig, RequestHandle,
    Traversal,
};

/// Tag of rough terrain cells.
const ROUGH: u32 = 1;

/// Headless crowd simulation over a generated cave
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map width in cells
    #[arg(long, default_value_t = 120)]
    width: i32,

    /// Map height in cells
    #[arg(long, default_value_t = 80)]
    height: i32,

    /// Number of agents
    #[arg(short, long, default_value_t = 100)]
    agents: usize,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 200)]
    frames: u32,

    /// Pathfinding budget per frame, in microseconds
    #[arg(short, long, default_value_t = 2000)]
    budget_us: u64,

    /// Search arenas, i.e. searches in flight at once
    #[arg(long, default_value_t = 4)]
    arenas: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,
}

#[derive(Debug)]
struct Agent {
    at: Point,
    waypoints: Vec<Point>,
    next: usize,
    pending: Option<RequestHandle>,
    /// Agents that avoid rough terrain take longer routes.
    cautious: bool,
}

impl Agent {
    fn idle(&self) -> bool {
        self.pending.is_none() && self.next >= self.waypoints.len()
    }

    fn advance(&mut self) {
        if let Some(&p) = self.waypoints.get(self.next) {
            self.at = p;
            self.next += 1;
        }
    }
}

#[derive(Debug, Default)]
struct Stats {
    submitted: usize,
    delivered: usize,
    failed: usize,
    searched: u64,
    busiest_frame: Duration,
}

fn generate(args: &Args, rng: &mut StdRng) -> GridGraph {
    let mut caves = CaveGen::new(args.width, args.height, StdRng::seed_from_u64(rng.random()));
    let floor = caves.cellular_automata(0.45, &[CellularAutomataRule::default()]);
    let rough = caves.scatter_rough_terrain(0.15, ROUGH, 3000);
    info!(
        "generated {}x{} cave: {floor} floor cells, {} rough",
        args.width,
        args.height,
        rough.len()
    );
    caves.build(wayfarer_core::DEFAULT_NODE_SIZE, &rough)
}

fn floor_cells(g: &GridGraph) -> Vec<NodeId> {
    (0..g.node_count() as u32)
        .map(NodeId)
        .filter(|&n| g.node(n).walkable)
        .collect()
}

fn request_for(agent: &Agent, g: &GridGraph, floor: &[NodeId], centre: Point, rng: &mut StdRng) -> PathRequest {
    let node_size = g.node_size() as u32;
    let req = match rng.random_range(0..10) {
        0..6 => {
            let to = floor[rng.random_range(0..floor.len())];
            PathRequest::shortest(agent.at, g.position(to)).partial(true)
        }
        6..9 => PathRequest::random_walk(agent.at, node_size * rng.random_range(5..15)).seed(rng.random()),
        _ => PathRequest::flee(agent.at, centre, node_size * 10).seed(rng.random()),
    };
    let req = req.endpoints(EndpointMode::Original);
    if agent.cautious {
        req.traversal(Traversal::new().with_tag_penalty(ROUGH, 5000))
    } else {
        req
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let g = generate(&args, &mut rng);
    let floor = floor_cells(&g);
    if floor.is_empty() {
        info!("the cave has no floor, nothing to simulate");
        return;
    }

    let mut agents: Vec<Agent> = (0..args.agents)
        .map(|i| Agent {
            at: g.position(floor[rng.random_range(0..floor.len())]),
            waypoints: Vec::new(),
            next: 0,
            pending: None,
            cautious: i % 3 == 0,
        })
        .collect();

    let mut pf = Pathfinder::new(PathfinderConfig {
        arena_count: args.arenas.max(1),
        log_results: PathLog::OnlyErrors,
        ..PathfinderConfig::default()
    });
    let budget = Duration::from_micros(args.budget_us);
    let mut owners: HashMap<RequestHandle, usize> = HashMap::new();
    let mut stats = Stats::default();

    for frame in 0..args.frames {
        let n = agents.len().max(1) as i64;
        let (sx, sy) = agents
            .iter()
            .fold((0i64, 0i64), |(x, y), a| (x + a.at.x as i64, y + a.at.y as i64));
        let centre = Point::new((sx / n) as i32, (sy / n) as i32);

        for (i, agent) in agents.iter_mut().enumerate() {
            if agent.idle() {
                let h = pf.submit(request_for(agent, &g, &floor, centre, &mut rng));
                agent.pending = Some(h);
                owners.insert(h, i);
                stats.submitted += 1;
            }
        }

        let started = Instant::now();
        let done = pf.pump(&g, Deadline::After(budget));
        stats.busiest_frame = stats.busiest_frame.max(started.elapsed());

        let finished: Vec<RequestHandle> = owners
            .keys()
            .copied()
            .filter(|&h| pf.result(h).is_some())
            .collect();
        for h in finished {
            let (Some(i), Some(result)) = (owners.remove(&h), pf.take_result(h)) else {
                continue;
            };
            let agent = &mut agents[i];
            agent.pending = None;
            stats.delivered += 1;
            stats.searched += u64::from(result.searched_nodes());
            if result.is_error() {
                stats.failed += 1;
                continue;
            }
            agent.waypoints = result.waypoints().to_vec();
            agent.next = 0;
        }

        for agent in &mut agents {
            agent.advance();
        }
        debug!("frame {frame}: {done} delivered, {} pending", pf.pending());
    }

    info!(
        "{} frames: {} requests, {} delivered, {} failed, {} nodes searched, busiest frame {:?}",
        args.frames,
        stats.submitted,
        stats.delivered,
        stats.failed,
        stats.searched,
        stats.busiest_frame
    );
}
