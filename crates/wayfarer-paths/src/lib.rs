//! Time-sliced incremental path searches over navigation graphs.
//!
//! Every search is a [`PathRequest`] that runs through a fixed lifecycle
//! (prepare, initialize, step, trace, cleanup, finish) on a reusable
//! [`SearchArena`]. Stepping stops whenever a [`Deadline`] passes and
//! resumes later exactly where it left off, so a game loop can spread many
//! agents' searches over several frames.
//!
//! The variants share one machinery:
//!
//! - **Shortest path** ([`PathRequest::shortest`]), optionally falling back
//!   to the closest reachable node.
//! - **Custom termination** ([`PathRequest::custom`]) through an
//!   [`EndingCondition`].
//! - **Random walk** and **flee** ([`PathRequest::random_walk`],
//!   [`PathRequest::flee`]).
//! - **Flood fill** ([`PathRequest::flood`]) producing a [`FloodMap`], and
//!   paths read back from it ([`PathRequest::flood_trace`]).
//! - **Multi-target** ([`PathRequest::multi_target`],
//!   [`PathRequest::multi_start`]).
//! - **Reachability within a cost** ([`PathRequest::within_cost`]).
//!
//! [`Pathfinder`] owns the arenas and schedules submitted requests
//! cooperatively.
//!
//! ```
//! use wayfarer_core::{GridGraph, Point};
//! use wayfarer_paths::{Deadline, PathRequest, Pathfinder};
//!
//! let grid = GridGraph::from_ascii(
//!     "
//!     ....
//!     .##.
//!     ....
//!     ",
//!     10,
//! );
//! let mut pf = Pathfinder::default();
//! let h = pf.submit(PathRequest::shortest(grid.center(Point::new(0, 1)), grid.center(Point::new(3, 1))));
//! pf.pump(&grid, Deadline::Never);
//! assert_eq!(pf.result(h).map(|r| r.cost()), Some(50));
//! ```

mod arena;
mod config;
mod error;
mod flood;
mod heap;
mod heuristic;
mod multi;
mod random;
mod request;
mod result;
mod runner;
mod shortest;
mod termination;
mod traversal;
mod within;

pub use arena::{NodeStatus, RecordFlags, SearchArena, SearchRecord};
pub use config::{PathLog, PathfinderConfig};
pub use error::SearchError;
pub use flood::FloodMap;
pub use heuristic::Heuristic;
pub use multi::HeuristicMode;
pub use random::{Aim, DEFAULT_SPREAD};
pub use request::{Deadline, EndpointMode, PathRequest, Phase, StepStatus};
pub use result::{CompleteState, PathNode, PathResult, TargetPath};
pub use runner::{Pathfinder, RequestHandle};
pub use termination::{EndingCondition, TargetNode, WithinDistance};
pub use traversal::{NodeConstraint, Traversal, TraversalProvider};
