//! Core types of the coordinate DAG and its resolved form

use std::collections::HashMap;

use crate::problem::Token;

use super::config::SizingContext;
use super::error::LayoutError;
use super::solver;

/// A 2D point; y grows upwards
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A displacement in character widths (`dx`) and line heights (`dy`)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// An axis-aligned rectangle anchored at its lower-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-sized box at a point
    pub fn at(point: Point) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    /// Box spanned by two opposite corners
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::at(a).expand_to_include(b)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn lower_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn upper_right(&self) -> Point {
        Point::new(self.right(), self.top())
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.top()
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let top = self.top().max(other.top());
        BoundingBox::new(x, y, right - x, top - y)
    }

    /// Expand this box to include a point
    pub fn expand_to_include(&self, point: Point) -> BoundingBox {
        let x = self.x.min(point.x);
        let y = self.y.min(point.y);
        let right = self.right().max(point.x);
        let top = self.top().max(point.y);
        BoundingBox::new(x, y, right - x, top - y)
    }

    /// Grow every side by the given margins
    pub fn with_margin(&self, margin_x: f64, margin_y: f64) -> BoundingBox {
        BoundingBox::new(
            self.x - margin_x,
            self.y - margin_y,
            self.width + 2.0 * margin_x,
            self.height + 2.0 * margin_y,
        )
    }
}

/// Handle of a coordinate inside the composition that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateId {
    pub(crate) figure: u64,
    pub(crate) index: usize,
}

impl CoordinateId {
    /// Position of the coordinate in [`Layout::coordinates`]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// How a coordinate is placed
#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    /// Fixed point in layout units
    Absolute(Point),

    /// `anchor + offset`
    Relative { anchor: CoordinateId, offset: Offset },

    /// Midpoint of `a` and `b`, plus `offset`
    Between {
        a: CoordinateId,
        b: CoordinateId,
        offset: Offset,
    },

    /// x taken from `x_of`, y taken from `y_of`, plus `offset`
    Aligned {
        x_of: CoordinateId,
        y_of: CoordinateId,
        offset: Offset,
    },
}

impl Position {
    /// Coordinates this position depends on
    pub fn references(&self) -> Vec<CoordinateId> {
        match self {
            Position::Absolute(_) => Vec::new(),
            Position::Relative { anchor, .. } => vec![*anchor],
            Position::Between { a, b, .. } => vec![*a, *b],
            Position::Aligned { x_of, y_of, .. } => vec![*x_of, *y_of],
        }
    }
}

/// A named point of a figure
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub name: String,
    pub position: Position,
}

/// What a cell displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Literal(String),
    /// Empty box for the student to fill in
    FillIn,
}

impl From<&Token> for Content {
    fn from(token: &Token) -> Self {
        match token {
            Token::Literal(text) => Content::Literal(text.clone()),
            Token::Masked => Content::FillIn,
        }
    }
}

/// A drawable element anchored at coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// A glyph such as an operator sign
    Label { at: CoordinateId, text: String },

    /// A box showing one problem token
    Cell {
        lower_left: CoordinateId,
        upper_right: CoordinateId,
        content: Content,
        /// Index of the token in the instance
        token: usize,
        bordered: bool,
    },

    /// Rules and brackets
    Polyline { points: Vec<CoordinateId> },

    /// The bounding box of the figure
    Rectangle {
        lower_left: CoordinateId,
        upper_right: CoordinateId,
        bordered: bool,
    },
}

impl Primitive {
    pub fn references(&self) -> Vec<CoordinateId> {
        match self {
            Primitive::Label { at, .. } => vec![*at],
            Primitive::Cell {
                lower_left,
                upper_right,
                ..
            }
            | Primitive::Rectangle {
                lower_left,
                upper_right,
                ..
            } => vec![*lower_left, *upper_right],
            Primitive::Polyline { points } => points.clone(),
        }
    }
}

/// Coordinates and primitives of one problem figure
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub(crate) coordinates: Vec<Coordinate>,
    pub(crate) primitives: Vec<Primitive>,
    pub(crate) bounds: (CoordinateId, CoordinateId),
}

impl Layout {
    /// Coordinates in definition order; the first one is the origin
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Lower-left and upper-right corners of the bounding box
    pub fn bounds(&self) -> (CoordinateId, CoordinateId) {
        self.bounds
    }

    pub fn coordinate(&self, name: &str) -> Option<(CoordinateId, &Coordinate)> {
        let figure = self.bounds.0.figure;
        self.coordinates
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == name)
            .map(|(index, c)| (CoordinateId { figure, index }, c))
    }

    /// Compute absolute positions for all coordinates
    pub fn resolve(&self, sizing: &SizingContext) -> Result<ResolvedLayout, LayoutError> {
        sizing.validate()?;
        let points = solver::resolve_positions(&self.coordinates, sizing.char_width, sizing.line_height)?;
        let bounding_box = BoundingBox::from_corners(points[self.bounds.0.index], points[self.bounds.1.index]);
        let names = self
            .coordinates
            .iter()
            .enumerate()
            .map(|(index, c)| (c.name.clone(), index))
            .collect();
        Ok(ResolvedLayout {
            points,
            names,
            primitives: self.primitives.clone(),
            bounding_box,
        })
    }
}

/// A layout with absolute positions
#[derive(Debug, Clone)]
pub struct ResolvedLayout {
    points: Vec<Point>,
    names: HashMap<String, usize>,
    primitives: Vec<Primitive>,
    bounding_box: BoundingBox,
}

impl ResolvedLayout {
    pub fn point(&self, name: &str) -> Option<Point> {
        self.names.get(name).map(|index| self.points[*index])
    }

    pub fn position(&self, id: CoordinateId) -> Option<Point> {
        self.points.get(id.index).copied()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }
}
