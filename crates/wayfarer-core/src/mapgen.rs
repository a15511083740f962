//! Cave generation for building test and demo grids.
//!
//! Uses cellular automata: random initial walls, then repeated smoothing
//! rules. The output is a [`GridGraph`].

use rand::{Rng, RngExt};

use crate::grid::{GridCell, GridGraph};
use crate::{Point, Rect};

/// One smoothing pass of the cave automaton.
///
/// A cell turns to wall when its eight surrounding cells hold at least
/// `w_cutoff1` walls, or when the 24 cells within two steps hold at most
/// `w_cutoff2` (which fills open halls with pillars).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellularAutomataRule {
    pub w_cutoff1: i32,
    pub w_cutoff2: i32,
    /// Count cells past the map edge as walls.
    pub walls_out_of_range: bool,
    /// Repetitions of the pass.
    pub reps: usize,
}

impl Default for CellularAutomataRule {
    fn default() -> Self {
        Self {
            w_cutoff1: 5,
            w_cutoff2: 2,
            walls_out_of_range: true,
            reps: 4,
        }
    }
}

/// Cave generator.
pub struct CaveGen<R: Rng> {
    pub rng: R,
    width: i32,
    height: i32,
    walls: Vec<bool>,
}

impl<R: Rng> CaveGen<R> {
    /// Create a generator for a `width` x `height` grid.
    pub fn new(width: i32, height: i32, rng: R) -> Self {
        let len = (width.max(0) * height.max(0)) as usize;
        Self {
            rng,
            width: width.max(0),
            height: height.max(0),
            walls: vec![true; len],
        }
    }

    fn bounds(&self) -> Rect {
        Rect::sized(Point::ZERO, self.width, self.height)
    }

    fn idx(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    /// Run the automaton and return the number of floor cells.
    ///
    /// Each cell starts as a wall with probability `wall_init_pct`, then
    /// each rule in `rules` is applied for its repetitions.
    pub fn cellular_automata(&mut self, wall_init_pct: f64, rules: &[CellularAutomataRule]) -> usize {
        let bounds = self.bounds();

        for p in bounds.points() {
            let r: f64 = self.rng.random();
            let i = self.idx(p);
            self.walls[i] = r < wall_init_pct;
        }

        let mut scratch = vec![false; self.walls.len()];
        for rule in rules {
            for _ in 0..rule.reps {
                for p in bounds.points() {
                    let walls1 = self.count_walls_ring(p, 1, rule.walls_out_of_range);
                    let walls2 = self.count_walls_ring(p, 2, rule.walls_out_of_range);
                    scratch[self.idx(p)] = walls1 >= rule.w_cutoff1 || walls2 <= rule.w_cutoff2;
                }
                self.walls.copy_from_slice(&scratch);
            }
        }

        self.walls.iter().filter(|w| !**w).count()
    }

    /// Pick floor cells with probability `chance` and give each `tag` and a
    /// penalty in `1..=max_penalty`. The result feeds [`build`](Self::build).
    pub fn scatter_rough_terrain(
        &mut self,
        chance: f64,
        tag: u32,
        max_penalty: u32,
    ) -> Vec<(Point, u32, u32)> {
        let mut rough = Vec::new();
        for p in self.bounds().points() {
            if self.walls[self.idx(p)] {
                continue;
            }
            let r: f64 = self.rng.random();
            if r < chance {
                let penalty = self.rng.random_range(1..=max_penalty.max(1));
                rough.push((p, tag, penalty));
            }
        }
        rough
    }

    /// Build the graph, applying `rough` cells as `(cell, tag, penalty)`.
    pub fn build(&self, node_size: i32, rough: &[(Point, u32, u32)]) -> GridGraph {
        let mut cells: Vec<GridCell> = self
            .walls
            .iter()
            .map(|&w| if w { GridCell::WALL } else { GridCell::FLOOR })
            .collect();
        for &(p, tag, penalty) in rough {
            if self.bounds().contains(p) {
                let i = self.idx(p);
                if cells[i].walkable {
                    cells[i].tag = tag;
                    cells[i].penalty = penalty;
                }
            }
        }
        GridGraph::from_cells(self.width, self.height, node_size, cells)
    }

    /// Walls in the square of half-width `radius` around `center`, centre excluded.
    fn count_walls_ring(&self, center: Point, radius: i32, walls_out_of_range: bool) -> i32 {
        let bounds = self.bounds();
        let mut count = 0;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let p = center.shift(dx, dy);
                if bounds.contains(p) {
                    if self.walls[self.idx(p)] {
                        count += 1;
                    }
                } else if walls_out_of_range {
                    count += 1;
                }
            }
        }
        count
    }
}
