//! A navigation graph over a rectangular grid of cells.
//!
//! Each cell is one node. Node ids are row-major cell indices and node
//! positions are cell centres in world units, one cell spanning
//! [`node_size`](GridGraph::node_size) units on each axis.

use crate::area::label_areas;
use crate::graph::{NavGraph, NearestNode, NodeId, NodeInfo};
use crate::{Point, Rect};

/// Default world units per cell.
pub const DEFAULT_NODE_SIZE: i32 = 1000;

/// Terrain data for one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    pub walkable: bool,
    pub tag: u32,
    pub penalty: u32,
}

impl Default for GridCell {
    fn default() -> Self {
        Self::FLOOR
    }
}

impl GridCell {
    /// Walkable, untagged, no penalty.
    pub const FLOOR: Self = Self {
        walkable: true,
        tag: 0,
        penalty: 0,
    };

    /// Not walkable.
    pub const WALL: Self = Self {
        walkable: false,
        tag: 0,
        penalty: 0,
    };
}

/// Which neighbours a cell is connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// Up, right, down, left.
    #[default]
    Four,
    /// Cardinal plus diagonal moves. Diagonals never cut corners.
    Eight,
}

/// Grid-backed [`NavGraph`].
#[derive(Debug, Clone)]
pub struct GridGraph {
    width: i32,
    height: i32,
    node_size: i32,
    connectivity: Connectivity,
    cells: Vec<GridCell>,
    areas: Vec<u32>,
}

impl GridGraph {
    /// Create a fully walkable `width` x `height` grid.
    pub fn new(width: i32, height: i32, node_size: i32) -> Self {
        let len = (width.max(0) * height.max(0)) as usize;
        Self::from_cells(width, height, node_size, vec![GridCell::FLOOR; len])
    }

    /// Create a grid from row-major cells. Missing cells are walls.
    pub fn from_cells(width: i32, height: i32, node_size: i32, mut cells: Vec<GridCell>) -> Self {
        let len = (width.max(0) * height.max(0)) as usize;
        cells.resize(len, GridCell::WALL);
        let mut g = Self {
            width: width.max(0),
            height: height.max(0),
            node_size: node_size.max(1),
            connectivity: Connectivity::Four,
            cells,
            areas: Vec::new(),
        };
        g.recompute_areas();
        g
    }

    /// Parse a map drawn with `#` for walls and `.` for floor.
    ///
    /// Digits `1`-`9` are walkable cells carrying that tag. Leading and
    /// trailing blank lines are ignored; short lines are padded with walls.
    pub fn from_ascii(map: &str, node_size: i32) -> Self {
        let lines: Vec<&str> = map
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let height = lines.len() as i32;
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
        let mut cells = vec![GridCell::WALL; (width * height) as usize];
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' => GridCell::WALL,
                    c if c.is_ascii_digit() => GridCell {
                        tag: c.to_digit(10).unwrap_or(0),
                        ..GridCell::FLOOR
                    },
                    _ => GridCell::FLOOR,
                };
                cells[y * width as usize + x] = cell;
            }
        }
        Self::from_cells(width, height, node_size, cells)
    }

    /// Switch to another neighbourhood and relabel areas.
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self.recompute_areas();
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// World units per cell.
    pub fn node_size(&self) -> i32 {
        self.node_size
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// The grid rectangle in cell coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::sized(Point::ZERO, self.width, self.height)
    }

    /// Get the cell at grid coordinates `p`, or `None` if out of bounds.
    pub fn cell(&self, p: Point) -> Option<GridCell> {
        self.idx(p).map(|i| self.cells[i])
    }

    /// Overwrite the cell at `p`. Call [`recompute_areas`](Self::recompute_areas)
    /// once editing is done.
    pub fn set_cell(&mut self, p: Point, cell: GridCell) {
        if let Some(i) = self.idx(p) {
            self.cells[i] = cell;
        }
    }

    /// Shorthand for toggling walkability of one cell.
    pub fn set_walkable(&mut self, p: Point, walkable: bool) {
        if let Some(i) = self.idx(p) {
            self.cells[i].walkable = walkable;
        }
    }

    /// Shorthand for setting the entry penalty of one cell.
    pub fn set_penalty(&mut self, p: Point, penalty: u32) {
        if let Some(i) = self.idx(p) {
            self.cells[i].penalty = penalty;
        }
    }

    /// Relabel connected areas after cells changed.
    pub fn recompute_areas(&mut self) {
        let len = self.cells.len();
        let mut ebuf = Vec::with_capacity(8);
        let areas = label_areas(
            len,
            |i| self.cells[i].walkable,
            |i, buf| {
                ebuf.clear();
                self.edges_of(i, &mut ebuf);
                buf.extend(ebuf.iter().map(|&(n, _)| n));
            },
        );
        self.areas = areas;
    }

    /// Node of the cell at grid coordinates `p`.
    pub fn node_at(&self, p: Point) -> Option<NodeId> {
        self.idx(p).map(|i| NodeId(i as u32))
    }

    /// Grid coordinates of `id`.
    pub fn cell_of(&self, id: NodeId) -> Point {
        let w = self.width.max(1) as usize;
        Point::new((id.index() % w) as i32, (id.index() / w) as i32)
    }

    /// World position of the centre of grid cell `p`.
    pub fn center(&self, p: Point) -> Point {
        p * self.node_size + Point::new(self.node_size / 2, self.node_size / 2)
    }

    /// World rectangle covered by grid cell `p`.
    pub fn cell_rect(&self, p: Point) -> Rect {
        Rect::sized(p * self.node_size, self.node_size, self.node_size)
    }

    /// Grid cell containing world position `w`.
    pub fn cell_at_world(&self, w: Point) -> Point {
        Point::new(
            w.x.div_euclid(self.node_size),
            w.y.div_euclid(self.node_size),
        )
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds().contains(p) {
            return None;
        }
        Some((p.y * self.width + p.x) as usize)
    }

    fn walkable_at(&self, p: Point) -> bool {
        self.idx(p).is_some_and(|i| self.cells[i].walkable)
    }

    /// Append the outgoing edges of cell index `i`.
    fn edges_of(&self, i: usize, buf: &mut Vec<(usize, u32)>) {
        if !self.cells[i].walkable {
            return;
        }
        let p = self.cell_of(NodeId(i as u32));
        let straight = self.node_size as u32;
        match self.connectivity {
            Connectivity::Four => {
                for n in p.neighbors_4() {
                    if let Some(ni) = self.idx(n).filter(|&ni| self.cells[ni].walkable) {
                        buf.push((ni, straight));
                    }
                }
            }
            Connectivity::Eight => {
                let diagonal = Point::new(self.node_size, self.node_size).cost_magnitude();
                for n in p.neighbors_8() {
                    let Some(ni) = self.idx(n).filter(|&ni| self.cells[ni].walkable) else {
                        continue;
                    };
                    let d = n - p;
                    if d.x != 0 && d.y != 0 {
                        // No corner cutting.
                        if !self.walkable_at(p.shift(d.x, 0)) || !self.walkable_at(p.shift(0, d.y)) {
                            continue;
                        }
                        buf.push((ni, diagonal));
                    } else {
                        buf.push((ni, straight));
                    }
                }
            }
        }
    }
}

impl NavGraph for GridGraph {
    fn node_count(&self) -> usize {
        self.cells.len()
    }

    fn node(&self, id: NodeId) -> NodeInfo {
        let c = self.cells[id.index()];
        NodeInfo {
            position: self.center(self.cell_of(id)),
            area: self.areas[id.index()],
            walkable: c.walkable,
            tag: c.tag,
            penalty: c.penalty,
        }
    }

    fn for_each_edge(&self, id: NodeId, f: &mut dyn FnMut(NodeId, u32)) {
        let mut buf = Vec::with_capacity(8);
        self.edges_of(id.index(), &mut buf);
        for (ni, cost) in buf {
            f(NodeId(ni as u32), cost);
        }
    }

    fn nearest(&self, p: Point, filter: &dyn Fn(NodeId, &NodeInfo) -> bool) -> Option<NearestNode> {
        // Fast path: the cell under the point.
        let under = self.cell_at_world(p);
        if let Some(id) = self.node_at(under) {
            if filter(id, &self.node(id)) {
                return Some(NearestNode {
                    node: id,
                    position: self.cell_rect(under).clamp(p),
                });
            }
        }

        let mut best: Option<(i64, NearestNode)> = None;
        for i in 0..self.cells.len() {
            let id = NodeId(i as u32);
            if !filter(id, &self.node(id)) {
                continue;
            }
            let snapped = self.cell_rect(self.cell_of(id)).clamp(p);
            let d = (snapped - p).sq_magnitude();
            if best.as_ref().is_none_or(|(bd, _)| d < *bd) {
                best = Some((
                    d,
                    NearestNode {
                        node: id,
                        position: snapped,
                    },
                ));
            }
        }
        best.map(|(_, n)| n)
    }
}
