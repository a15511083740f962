use wayfarer_core::Point;

/// Distance estimate used to order the open list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// Plain Dijkstra.
    None,
    /// `|dx| + |dy|`.
    Manhattan,
    /// Diagonal steps cost 1.4, straight steps 1.
    DiagonalManhattan,
    /// Straight-line distance.
    #[default]
    Euclidean,
}

impl Heuristic {
    /// Estimate the cost from `from` to `to`, multiplied by `scale` and
    /// truncated.
    pub fn estimate(self, scale: f32, from: Point, to: Point) -> u32 {
        let d = to - from;
        let (dx, dy) = (d.x.unsigned_abs() as u64, d.y.unsigned_abs() as u64);
        let raw = match self {
            Self::None => return 0,
            Self::Manhattan => (dx + dy) as f64,
            Self::DiagonalManhattan => {
                let diag = dx.min(dy);
                (14 * diag / 10 + (dx.max(dy) - diag)) as f64
            }
            Self::Euclidean => d.magnitude(),
        };
        let scaled = raw * f64::from(scale);
        if scaled <= 0.0 {
            0
        } else {
            scaled.min(u32::MAX as f64) as u32
        }
    }
}
