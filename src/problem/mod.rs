//! Problem instances and the generators that produce them
//!
//! Every generator follows the same protocol (see [`sampling::Generator`]):
//! a feasibility check on the typed parameters, rejection sampling of a full
//! solution, and a [`MaskPlan`] choosing which solution tokens are hidden.

pub mod basic;
pub mod division;
pub mod mystery;
pub mod operator;
pub mod params;
pub mod sampling;
pub mod sequence;
pub mod table;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GenerationSettings;
use crate::error::{ConfigError, GenerationError};

pub use basic::{BasicOperation, BasicOperationType};
pub use division::Division;
pub use mystery::MysteryOperation;
pub use operator::Operator;
pub use params::{ParamMap, ParamValue, ProblemParameters, Validated};
pub use sequence::{Sequence, SequenceType};
pub use table::{MultiplicationTable, TableType};

/// Marker standing in for a value the student has to fill in
pub const MASK: &str = "?";

/// The five kinds of problems that can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProblemKind {
    BasicOperation,
    Division,
    Sequence,
    MultiplicationTable,
    MysteryOperation,
}

impl ProblemKind {
    pub const ALL: [ProblemKind; 5] = [
        Self::BasicOperation,
        Self::Division,
        Self::Sequence,
        Self::MultiplicationTable,
        Self::MysteryOperation,
    ];

    /// Tag used in the wire format
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BasicOperation => "BasicOperation",
            Self::Division => "Division",
            Self::Sequence => "Sequence",
            Self::MultiplicationTable => "MultiplicationTable",
            Self::MysteryOperation => "MysteryOperation",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemKind {
    type Err = ConfigError;

    /// Case-insensitive, ignoring `_` and `-` (`multiplication_table` works)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().to_lowercase() == folded)
            .ok_or_else(|| ConfigError::UnknownKind(s.to_string()))
    }
}

impl TryFrom<String> for ProblemKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProblemKind> for String {
    fn from(kind: ProblemKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One position of a problem: either a visible literal or a fill-in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Token {
    Literal(String),
    Masked,
}

impl Token {
    pub fn is_masked(&self) -> bool {
        matches!(self, Token::Masked)
    }

    /// The literal text, if shown
    pub fn literal(&self) -> Option<&str> {
        match self {
            Token::Literal(s) => Some(s),
            Token::Masked => None,
        }
    }

    /// Text as written in the wire format
    pub fn as_str(&self) -> &str {
        match self {
            Token::Literal(s) => s,
            Token::Masked => MASK,
        }
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        if value == MASK {
            Token::Masked
        } else {
            Token::Literal(value)
        }
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        match token {
            Token::Literal(s) => s,
            Token::Masked => MASK.to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positions of a solution that are replaced by fill-in markers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskPlan {
    positions: BTreeSet<usize>,
}

impl MaskPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide a single position
    pub fn hide(&mut self, position: usize) {
        self.positions.insert(position);
    }

    /// Hide exactly `count` positions drawn uniformly without replacement
    /// from `start..start + len`
    ///
    /// `count` must not exceed `len`; feasibility checks guarantee it.
    pub fn hide_random<R: Rng + ?Sized>(&mut self, rng: &mut R, start: usize, len: usize, count: usize) {
        let count = count.min(len);
        for offset in rand::seq::index::sample(rng, len, count) {
            self.positions.insert(start + offset);
        }
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.iter().copied()
    }

    /// Tokens of `solution` with the planned positions masked
    pub fn apply(&self, solution: &[String]) -> Vec<Token> {
        solution
            .iter()
            .enumerate()
            .map(|(i, value)| {
                if self.contains(i) {
                    Token::Masked
                } else {
                    Token::Literal(value.clone())
                }
            })
            .collect()
    }
}

/// Violations of the instance invariants found in external data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("args has {args} tokens but solution has {solution}")]
    LengthMismatch { args: usize, solution: usize },

    #[error("token {index} is '{arg}' but the solution holds '{solution}'")]
    LiteralMismatch {
        index: usize,
        arg: String,
        solution: String,
    },

    #[error("solution token {index} is masked")]
    MaskedSolution { index: usize },
}

/// A generated problem: visible tokens and the full solution
///
/// `args` and `solution` always have the same length, and every literal in
/// `args` equals the solution token at the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemInstance {
    kind: ProblemKind,
    args: Vec<Token>,
    solution: Vec<String>,
}

impl ProblemInstance {
    /// Build an instance by masking a full solution
    pub fn masked(kind: ProblemKind, solution: Vec<String>, plan: &MaskPlan) -> Self {
        Self {
            kind,
            args: plan.apply(&solution),
            solution,
        }
    }

    /// Build an instance from externally supplied tokens, checking invariants
    pub fn new(kind: ProblemKind, args: Vec<Token>, solution: Vec<String>) -> Result<Self, WireError> {
        if args.len() != solution.len() {
            return Err(WireError::LengthMismatch {
                args: args.len(),
                solution: solution.len(),
            });
        }
        for (index, (arg, value)) in args.iter().zip(&solution).enumerate() {
            if value == MASK {
                return Err(WireError::MaskedSolution { index });
            }
            if let Token::Literal(text) = arg {
                if text != value {
                    return Err(WireError::LiteralMismatch {
                        index,
                        arg: text.clone(),
                        solution: value.clone(),
                    });
                }
            }
        }
        Ok(Self {
            kind,
            args,
            solution,
        })
    }

    pub fn kind(&self) -> ProblemKind {
        self.kind
    }

    pub fn args(&self) -> &[Token] {
        &self.args
    }

    pub fn solution(&self) -> &[String] {
        &self.solution
    }

    /// Positions hidden from the student
    pub fn masked_positions(&self) -> Vec<usize> {
        self.args
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_masked())
            .map(|(i, _)| i)
            .collect()
    }

    /// Solution token at `index` parsed as an integer
    pub fn value(&self, index: usize) -> Option<i64> {
        self.solution.get(index).and_then(|s| s.parse().ok())
    }
}

/// Wire representation of one instance inside a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemRecord {
    #[serde(rename = "type")]
    pub kind: ProblemKind,
    pub id: u32,
    pub args: Vec<Token>,
    pub solution: Vec<String>,
}

impl ProblemRecord {
    pub fn new(id: u32, instance: ProblemInstance) -> Self {
        Self {
            kind: instance.kind,
            id,
            args: instance.args,
            solution: instance.solution,
        }
    }

    /// Validate the record and turn it back into an instance
    pub fn into_instance(self) -> Result<ProblemInstance, WireError> {
        ProblemInstance::new(self.kind, self.args, self.solution)
    }
}

/// Generate one masked instance for already validated parameters
pub fn generate<R: Rng + ?Sized>(
    params: &ProblemParameters,
    rng: &mut R,
    settings: &GenerationSettings,
) -> Result<ProblemInstance, GenerationError> {
    match params {
        ProblemParameters::BasicOperation(p) => sampling::run(p, rng, settings),
        ProblemParameters::Division(p) => sampling::run(p, rng, settings),
        ProblemParameters::Sequence(p) => sampling::run(p, rng, settings),
        ProblemParameters::MultiplicationTable(p) => sampling::run(p, rng, settings),
        ProblemParameters::MysteryOperation(p) => sampling::run(p, rng, settings),
    }
}
