//! Navigation graph types for the wayfarer search engine.
//!
//! This crate provides the pieces a search runs over: integer geometry, the
//! [`NavGraph`] interface, two reference graphs ([`GridGraph`] and
//! [`PointGraph`]), connectivity labelling and a cave generator for building
//! test maps.

pub mod area;
pub mod geom;
pub mod graph;
pub mod grid;
pub mod mapgen;
pub mod points;

pub use area::{NO_AREA, label_areas};
pub use geom::{Point, Rect};
pub use graph::{NavGraph, NearestNode, NodeId, NodeInfo};
pub use grid::{Connectivity, DEFAULT_NODE_SIZE, GridCell, GridGraph};
pub use mapgen::{CaveGen, CellularAutomataRule};
pub use points::PointGraph;
