//! Mathprob - arithmetic worksheet problem generation
//!
//! This library validates problem parameters, generates masked problem
//! instances by rejection sampling, and lays each instance out as a figure
//! of relatively positioned coordinates for a renderer to draw.
//!
//! # Example
//!
//! ```rust
//! use mathprob::{generate_problem, GeneratorConfig, ParamMap, ProblemKind, ProblemParameters};
//!
//! let args: ParamMap = serde_json::from_str(
//!     r#"{"type": "result", "operator": "+", "nboperands": 2, "nbdigitsop": 1, "nbdigitsrslt": 1}"#,
//! )
//! .unwrap();
//! let params = ProblemParameters::from_map(ProblemKind::BasicOperation, &args)
//!     .unwrap()
//!     .parameters;
//!
//! let config = GeneratorConfig::new().with_seed(7);
//! let problem = generate_problem(&params, &mut config.rng(), &config).unwrap();
//! assert_eq!(problem.instance.args().len(), 3);
//! assert!(problem.instance.args()[2].is_masked());
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod geometry;
pub mod numeric;
pub mod problem;

pub use batch::{generate_batch, parse_master_problems, MasterProblem};
pub use config::{GenerationSettings, GeneratorConfig};
pub use error::{ConfigError, GenerationError};
pub use geometry::{compose, Layout, LayoutError, ResolvedLayout, SizingContext};
pub use problem::{
    generate, ParamMap, ParamValue, ProblemInstance, ProblemKind, ProblemParameters, ProblemRecord, Token,
    WireError,
};

use rand::Rng;
use thiserror::Error;

/// Errors that can occur anywhere in the generation pipeline
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("malformed problem record: {0}")]
    Wire(#[from] WireError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A generated instance together with its figure
#[derive(Debug, Clone)]
pub struct Problem {
    pub instance: ProblemInstance,
    pub layout: Layout,
}

/// Generate one instance and lay it out
pub fn generate_problem<R: Rng + ?Sized>(
    params: &ProblemParameters,
    rng: &mut R,
    config: &GeneratorConfig,
) -> Result<Problem, SheetError> {
    let instance = problem::generate(params, rng, &config.generation)?;
    let layout = compose(params, &instance, &config.layout)?;
    Ok(Problem { instance, layout })
}

/// Validate raw parameters, then generate and lay out one instance
pub fn generate_from_map<R: Rng + ?Sized>(
    kind: ProblemKind,
    args: &ParamMap,
    rng: &mut R,
    config: &GeneratorConfig,
) -> Result<Problem, SheetError> {
    let validated = ProblemParameters::from_map(kind, args)?;
    generate_problem(&validated.parameters, rng, config)
}
