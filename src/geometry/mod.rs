//! Geometry composer: positions the elements of a problem figure
//!
//! A figure is a DAG of named coordinates, each placed relative to earlier
//! ones in character-width and line-height units, plus the primitives drawn
//! at them. [`compose`] builds the figure of a problem instance and
//! [`Layout::resolve`] turns it into absolute positions.

pub mod composer;
pub mod config;
pub mod error;
pub mod layouts;
pub mod solver;
pub mod types;

pub use composer::{Composer, CELL_HEIGHT, ORIGIN};
pub use config::SizingContext;
pub use error::LayoutError;
pub use layouts::compose;
pub use solver::SolverError;
pub use types::{
    BoundingBox, Content, Coordinate, CoordinateId, Layout, Offset, Point, Position, Primitive, ResolvedLayout,
};
