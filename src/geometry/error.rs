//! Error types for figure composition

use thiserror::Error;

use crate::problem::ProblemKind;

use super::solver::SolverError;

/// Errors that can occur while composing or resolving a figure
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Lookup of a coordinate name that was never defined
    #[error("undefined coordinate '{name}'")]
    UndefinedCoordinate { name: String },

    /// A name defined twice in the same figure
    #[error("coordinate '{name}' is already defined")]
    DuplicateCoordinate { name: String },

    /// A handle created by a different composition
    #[error("coordinate #{index} does not belong to this figure")]
    ForeignCoordinate { index: usize },

    #[error("invalid sizing '{field}': {reason}")]
    InvalidSizing { field: String, reason: String },

    /// The instance does not have the shape its parameters describe
    #[error("{kind} instance does not match its parameters: {reason}")]
    ShapeMismatch { kind: ProblemKind, reason: String },

    #[error("constraint solver error: {0}")]
    Solver(#[from] SolverError),
}

impl LayoutError {
    pub fn undefined(name: impl Into<String>) -> Self {
        Self::UndefinedCoordinate { name: name.into() }
    }

    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateCoordinate { name: name.into() }
    }

    pub fn sizing(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSizing {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn shape(kind: ProblemKind, reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            kind,
            reason: reason.into(),
        }
    }
}
