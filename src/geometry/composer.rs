//! Incremental construction of a figure's coordinate DAG
//!
//! A [`Composer`] starts with the absolute origin. Every further coordinate
//! is defined from handles returned by earlier definitions, so references
//! always point backwards and the coordinates form a DAG rooted at the
//! origin. [`Composer::finish`] adds the bounding box last.

use std::collections::HashMap;

use crate::problem::Token;

use super::error::LayoutError;
use super::solver::resolve_positions;
use super::types::{
    BoundingBox, Content, Coordinate, CoordinateId, Layout, Offset, Point, Position, Primitive,
};

/// Name of the root coordinate
pub const ORIGIN: &str = "origin";

/// Names of the bounding box corners
pub const BBOX_LOWER_LEFT: &str = "bbox.ll";
pub const BBOX_UPPER_RIGHT: &str = "bbox.ur";

/// Height of a cell, in line heights
pub const CELL_HEIGHT: f64 = 1.5;

/// Builder of one figure
///
/// Each composer tags its handles with a random figure id, so a handle
/// taken from another composer is rejected.
#[derive(Debug)]
pub struct Composer {
    figure: u64,
    coordinates: Vec<Coordinate>,
    names: HashMap<String, usize>,
    primitives: Vec<Primitive>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        let mut composer = Self {
            figure: rand::random(),
            coordinates: Vec::new(),
            names: HashMap::new(),
            primitives: Vec::new(),
        };
        composer.push(ORIGIN.to_string(), Position::Absolute(Point::default()));
        composer
    }

    pub fn origin(&self) -> CoordinateId {
        self.id(0)
    }

    fn id(&self, index: usize) -> CoordinateId {
        CoordinateId {
            figure: self.figure,
            index,
        }
    }

    fn push(&mut self, name: String, position: Position) -> CoordinateId {
        let index = self.coordinates.len();
        self.names.insert(name.clone(), index);
        self.coordinates.push(Coordinate { name, position });
        self.id(index)
    }

    fn check(&self, id: CoordinateId) -> Result<(), LayoutError> {
        if id.figure != self.figure || id.index >= self.coordinates.len() {
            return Err(LayoutError::ForeignCoordinate { index: id.index });
        }
        Ok(())
    }

    /// Define a coordinate; all references must already exist here
    pub fn define(&mut self, name: impl Into<String>, position: Position) -> Result<CoordinateId, LayoutError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(LayoutError::duplicate(name));
        }
        for reference in position.references() {
            self.check(reference)?;
        }
        Ok(self.push(name, position))
    }

    pub fn absolute(&mut self, name: impl Into<String>, point: Point) -> Result<CoordinateId, LayoutError> {
        self.define(name, Position::Absolute(point))
    }

    pub fn relative(
        &mut self,
        name: impl Into<String>,
        anchor: CoordinateId,
        offset: Offset,
    ) -> Result<CoordinateId, LayoutError> {
        self.define(name, Position::Relative { anchor, offset })
    }

    pub fn between(
        &mut self,
        name: impl Into<String>,
        a: CoordinateId,
        b: CoordinateId,
        offset: Offset,
    ) -> Result<CoordinateId, LayoutError> {
        self.define(name, Position::Between { a, b, offset })
    }

    pub fn aligned(
        &mut self,
        name: impl Into<String>,
        x_of: CoordinateId,
        y_of: CoordinateId,
        offset: Offset,
    ) -> Result<CoordinateId, LayoutError> {
        self.define(name, Position::Aligned { x_of, y_of, offset })
    }

    /// Handle of a previously defined coordinate
    pub fn lookup(&self, name: &str) -> Result<CoordinateId, LayoutError> {
        self.names
            .get(name)
            .map(|index| self.id(*index))
            .ok_or_else(|| LayoutError::undefined(name))
    }

    pub fn add(&mut self, primitive: Primitive) -> Result<(), LayoutError> {
        for reference in primitive.references() {
            self.check(reference)?;
        }
        self.primitives.push(primitive);
        Ok(())
    }

    /// Place a glyph at `anchor + offset`
    pub fn label(
        &mut self,
        name: impl Into<String>,
        anchor: CoordinateId,
        offset: Offset,
        text: impl Into<String>,
    ) -> Result<CoordinateId, LayoutError> {
        let at = self.relative(name, anchor, offset)?;
        self.add(Primitive::Label {
            at,
            text: text.into(),
        })?;
        Ok(at)
    }

    /// Place a `width` wide cell with its lower-left corner at `anchor + offset`
    ///
    /// Returns the lower-left corner; the upper-right one is named
    /// `<name>.ur`. Fill-in cells get a border.
    pub fn cell(
        &mut self,
        name: impl Into<String>,
        anchor: CoordinateId,
        offset: Offset,
        width: f64,
        index: usize,
        token: &Token,
    ) -> Result<CoordinateId, LayoutError> {
        let name = name.into();
        let lower_left = self.relative(name.clone(), anchor, offset)?;
        let upper_right = self.relative(format!("{name}.ur"), lower_left, Offset::new(width, CELL_HEIGHT))?;
        self.add(Primitive::Cell {
            lower_left,
            upper_right,
            content: Content::from(token),
            token: index,
            bordered: token.is_masked(),
        })?;
        Ok(lower_left)
    }

    /// Place cells left to right, `gap` widths apart, the first one at
    /// `anchor + offset`
    pub fn row<'t>(
        &mut self,
        prefix: &str,
        anchor: CoordinateId,
        offset: Offset,
        width: f64,
        gap: f64,
        tokens: impl IntoIterator<Item = (usize, &'t Token)>,
    ) -> Result<Vec<CoordinateId>, LayoutError> {
        let mut cells: Vec<CoordinateId> = Vec::new();
        for (column, (index, token)) in tokens.into_iter().enumerate() {
            let (anchor, offset) = match cells.last() {
                Some(previous) => (*previous, Offset::new(width + gap, 0.0)),
                None => (anchor, offset),
            };
            cells.push(self.cell(format!("{prefix}.{column}"), anchor, offset, width, index, token)?);
        }
        Ok(cells)
    }

    /// Add a separator rule or bracket through the given coordinates
    pub fn polyline(&mut self, points: Vec<CoordinateId>) -> Result<(), LayoutError> {
        self.add(Primitive::Polyline { points })
    }

    /// Close the figure with its bounding box
    ///
    /// The box is the smallest rectangle enclosing every coordinate, grown
    /// by the margins (character widths and line heights). Its corners are
    /// defined relative to the origin.
    pub fn finish(mut self, margin_x: f64, margin_y: f64) -> Result<Layout, LayoutError> {
        let points = resolve_positions(&self.coordinates, 1.0, 1.0)?;
        let enclosing = points
            .iter()
            .fold(BoundingBox::at(Point::default()), |bbox, point| bbox.expand_to_include(*point))
            .with_margin(margin_x, margin_y);

        let origin = self.origin();
        let lower_left = self.relative(
            BBOX_LOWER_LEFT,
            origin,
            Offset::new(enclosing.x, enclosing.y),
        )?;
        let upper_right = self.relative(
            BBOX_UPPER_RIGHT,
            lower_left,
            Offset::new(enclosing.width, enclosing.height),
        )?;
        self.add(Primitive::Rectangle {
            lower_left,
            upper_right,
            bordered: false,
        })?;

        Ok(Layout {
            coordinates: self.coordinates,
            primitives: self.primitives,
            bounds: (lower_left, upper_right),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SizingContext;

    #[test]
    fn test_origin_is_first() {
        let composer = Composer::new();
        assert_eq!(composer.lookup(ORIGIN).unwrap(), composer.origin());
        assert!(matches!(
            composer.lookup("nowhere"),
            Err(LayoutError::UndefinedCoordinate { .. })
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut composer = Composer::new();
        let origin = composer.origin();
        composer.relative("a", origin, Offset::new(1.0, 0.0)).unwrap();
        let err = composer.relative("a", origin, Offset::new(2.0, 0.0)).unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateCoordinate { .. }));
    }

    #[test]
    fn test_foreign_handles_rejected() {
        let mut first = Composer::new();
        let origin = first.origin();
        let elsewhere = first.relative("far", origin, Offset::new(5.0, 5.0)).unwrap();

        let mut second = Composer::new();
        let err = second.relative("b", elsewhere, Offset::zero()).unwrap_err();
        assert!(matches!(err, LayoutError::ForeignCoordinate { .. }));
    }

    #[test]
    fn test_handles_of_other_figures_rejected_at_any_index() {
        let first = Composer::new();
        let mut second = Composer::new();
        let err = second
            .relative("b", first.origin(), Offset::new(1.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, LayoutError::ForeignCoordinate { index: 0 }));
        assert!(second.relative("c", second.origin(), Offset::zero()).is_ok());
    }

    #[test]
    fn test_bounding_box_encloses_everything() {
        let mut composer = Composer::new();
        let origin = composer.origin();
        composer
            .cell("c", origin, Offset::new(2.0, 1.0), 4.0, 0, &Token::Masked)
            .unwrap();
        let layout = composer.finish(1.0, 0.5).unwrap();

        let resolved = layout.resolve(&SizingContext::new().with_units(1.0, 1.0)).unwrap();
        let bbox = resolved.bounding_box();
        assert!((bbox.x - -1.0).abs() < 1e-9);
        assert!((bbox.y - -0.5).abs() < 1e-9);
        assert!((bbox.right() - 7.0).abs() < 1e-9);
        assert!((bbox.top() - 3.0).abs() < 1e-9);
        assert!(matches!(
            layout.primitives().last(),
            Some(Primitive::Rectangle { bordered: false, .. })
        ));
    }

    #[test]
    fn test_cells_bordered_only_when_masked() {
        let mut composer = Composer::new();
        let origin = composer.origin();
        let tokens = [Token::Literal("4".into()), Token::Masked];
        composer
            .row("r", origin, Offset::zero(), 3.0, 1.0, tokens.iter().enumerate())
            .unwrap();
        let layout = composer.finish(1.0, 1.0).unwrap();
        let borders: Vec<bool> = layout
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Cell { bordered, .. } => Some(*bordered),
                _ => None,
            })
            .collect();
        assert_eq!(borders, vec![false, true]);
        assert!(layout.coordinate("r.1.ur").is_some());
    }
}
