//! Constraint solver integration for coordinate resolution
//!
//! This module wraps the kasuari Cassowary solver. Every coordinate of a
//! figure contributes one required equality per axis; solving the system
//! yields the absolute positions.

use std::collections::HashMap;

use kasuari::{Solver as KasuariSolver, Strength, Variable as KasuariVariable, WeightedRelation::*};
use thiserror::Error;
use tracing::trace;

use super::types::{Coordinate, Point, Position};

/// Axis of a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// A variable in the constraint system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutVariable {
    pub coordinate: usize,
    pub axis: Axis,
}

impl LayoutVariable {
    pub fn x(coordinate: usize) -> Self {
        Self {
            coordinate,
            axis: Axis::X,
        }
    }

    pub fn y(coordinate: usize) -> Self {
        Self {
            coordinate,
            axis: Axis::Y,
        }
    }
}

/// A constraint in the layout system
#[derive(Debug, Clone)]
pub enum LayoutConstraint {
    /// variable = value
    Fixed { variable: LayoutVariable, value: f64 },

    /// left = right + offset
    Equal {
        left: LayoutVariable,
        right: LayoutVariable,
        offset: f64,
    },

    /// target = (a + b) / 2 + offset
    Midpoint {
        target: LayoutVariable,
        a: LayoutVariable,
        b: LayoutVariable,
        offset: f64,
    },
}

impl LayoutConstraint {
    fn describe(&self) -> String {
        match self {
            LayoutConstraint::Fixed { variable, value } => format!("{} = {}", name(variable), value),
            LayoutConstraint::Equal { left, right, offset } => {
                format!("{} = {} + {}", name(left), name(right), offset)
            }
            LayoutConstraint::Midpoint { target, a, b, offset } => format!(
                "{} = midpoint({}, {}) + {}",
                name(target),
                name(a),
                name(b),
                offset
            ),
        }
    }
}

fn name(variable: &LayoutVariable) -> String {
    format!("#{}.{:?}", variable.coordinate, variable.axis)
}

/// Errors from the constraint solver
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unsatisfiable constraint: {0}")]
    Unsatisfiable(String),

    #[error("internal solver error: {0}")]
    Internal(String),
}

/// Wrapper around the kasuari solver
pub struct ConstraintSolver {
    solver: KasuariSolver,
    variables: HashMap<LayoutVariable, KasuariVariable>,
}

impl ConstraintSolver {
    pub fn new() -> Self {
        Self {
            solver: KasuariSolver::new(),
            variables: HashMap::new(),
        }
    }

    fn var(&mut self, variable: LayoutVariable) -> KasuariVariable {
        *self.variables.entry(variable).or_insert_with(KasuariVariable::new)
    }

    fn convert_kasuari_error(e: kasuari::AddConstraintError, desc: String) -> SolverError {
        match e {
            kasuari::AddConstraintError::UnsatisfiableConstraint => SolverError::Unsatisfiable(desc),
            kasuari::AddConstraintError::DuplicateConstraint => {
                SolverError::Internal(format!("duplicate constraint: {}", desc))
            }
            kasuari::AddConstraintError::InternalSolverError(msg) => {
                SolverError::Internal(format!("{} while adding {}", msg, desc))
            }
        }
    }

    /// Add a required constraint
    pub fn add_constraint(&mut self, constraint: LayoutConstraint) -> Result<(), SolverError> {
        let desc = constraint.describe();
        let added = match constraint {
            LayoutConstraint::Fixed { variable, value } => {
                let var = self.var(variable);
                self.solver.add_constraint(var | EQ(Strength::REQUIRED) | value)
            }
            LayoutConstraint::Equal { left, right, offset } => {
                let left = self.var(left);
                let right = self.var(right);
                self.solver
                    .add_constraint(left | EQ(Strength::REQUIRED) | right + offset)
            }
            LayoutConstraint::Midpoint { target, a, b, offset } => {
                let target = self.var(target);
                let a = self.var(a);
                let b = self.var(b);
                // 2 * target = a + b + 2 * offset
                self.solver
                    .add_constraint(2.0 * target | EQ(Strength::REQUIRED) | a + b + 2.0 * offset)
            }
        };
        added.map_err(|e| Self::convert_kasuari_error(e, desc))
    }

    /// Solve the system
    ///
    /// kasuari only reports variables that moved away from zero, so absent
    /// variables are zero.
    pub fn solve(&mut self) -> Solution {
        let mut reverse: HashMap<KasuariVariable, LayoutVariable> =
            self.variables.iter().map(|(ours, k)| (*k, *ours)).collect();
        let mut values = HashMap::new();
        for (kvar, value) in self.solver.fetch_changes() {
            if let Some(ours) = reverse.remove(kvar) {
                values.insert(ours, *value);
            }
        }
        Solution { values }
    }
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Solution from the constraint solver
pub struct Solution {
    values: HashMap<LayoutVariable, f64>,
}

impl Solution {
    pub fn get(&self, variable: LayoutVariable) -> f64 {
        self.values.get(&variable).copied().unwrap_or(0.0)
    }
}

/// Absolute positions of `coordinates`, one per coordinate
///
/// Offsets are scaled by the unit sizes; absolute positions are given in
/// units as well.
pub fn resolve_positions(
    coordinates: &[Coordinate],
    char_width: f64,
    line_height: f64,
) -> Result<Vec<Point>, SolverError> {
    let mut solver = ConstraintSolver::new();
    for (index, coordinate) in coordinates.iter().enumerate() {
        let (x, y) = (LayoutVariable::x(index), LayoutVariable::y(index));
        let constraints = match &coordinate.position {
            Position::Absolute(point) => [
                LayoutConstraint::Fixed {
                    variable: x,
                    value: point.x * char_width,
                },
                LayoutConstraint::Fixed {
                    variable: y,
                    value: point.y * line_height,
                },
            ],
            Position::Relative { anchor, offset } => [
                LayoutConstraint::Equal {
                    left: x,
                    right: LayoutVariable::x(anchor.index),
                    offset: offset.dx * char_width,
                },
                LayoutConstraint::Equal {
                    left: y,
                    right: LayoutVariable::y(anchor.index),
                    offset: offset.dy * line_height,
                },
            ],
            Position::Between { a, b, offset } => [
                LayoutConstraint::Midpoint {
                    target: x,
                    a: LayoutVariable::x(a.index),
                    b: LayoutVariable::x(b.index),
                    offset: offset.dx * char_width,
                },
                LayoutConstraint::Midpoint {
                    target: y,
                    a: LayoutVariable::y(a.index),
                    b: LayoutVariable::y(b.index),
                    offset: offset.dy * line_height,
                },
            ],
            Position::Aligned { x_of, y_of, offset } => [
                LayoutConstraint::Equal {
                    left: x,
                    right: LayoutVariable::x(x_of.index),
                    offset: offset.dx * char_width,
                },
                LayoutConstraint::Equal {
                    left: y,
                    right: LayoutVariable::y(y_of.index),
                    offset: offset.dy * line_height,
                },
            ],
        };
        for constraint in constraints {
            solver.add_constraint(constraint)?;
        }
    }

    let solution = solver.solve();
    Ok(coordinates
        .iter()
        .enumerate()
        .map(|(index, coordinate)| {
            let point = Point::new(
                solution.get(LayoutVariable::x(index)),
                solution.get(LayoutVariable::y(index)),
            );
            trace!(name = %coordinate.name, x = point.x, y = point.y, "resolved coordinate");
            point
        })
        .collect())
}
