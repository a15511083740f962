use crate::Heuristic;

/// How much the [`Pathfinder`](crate::Pathfinder) logs about delivered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathLog {
    None,
    /// Only failed requests, at `warn` level.
    OnlyErrors,
    /// One `info` line per result.
    #[default]
    Normal,
    /// Like `Normal`, plus the node list of every path.
    Heavy,
}

/// Engine-wide search settings.
///
/// Requests submitted to a [`Pathfinder`](crate::Pathfinder) copy these
/// values; request builder methods then override the request-level ones.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathfinderConfig {
    pub heuristic: Heuristic,
    pub heuristic_scale: f32,
    /// Node expansions after which a single request fails.
    pub max_expansions: u32,
    /// Expansions between wall-clock deadline checks.
    pub time_check_interval: u32,
    /// Longest parent chain a trace may follow.
    pub max_trace_len: usize,
    /// Longest chain a flood trace may follow.
    pub flood_trace_cap: usize,
    /// Number of search arenas, i.e. requests that can be in flight at once.
    pub arena_count: usize,
    pub log_results: PathLog,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::Euclidean,
            heuristic_scale: 1.0,
            max_expansions: 1_000_000,
            time_check_interval: 500,
            max_trace_len: 2048,
            flood_trace_cap: 4096,
            arena_count: 1,
            log_results: PathLog::Normal,
        }
    }
}
