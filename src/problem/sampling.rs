//! The generator protocol: feasibility check, rejection sampling, masking

use rand::Rng;
use tracing::debug;

use crate::config::GenerationSettings;
use crate::error::GenerationError;

use super::{MaskPlan, ProblemInstance, ProblemKind};

/// A problem kind's generation strategy
pub trait Generator: Sized {
    /// Kind tag of the produced instances
    const KIND: ProblemKind;

    /// Verify the parameters admit at least one instance
    ///
    /// Returns the parameters sampling should use, which may differ from
    /// `self` when a kind adjusts infeasible requests instead of failing.
    fn feasible(&self, settings: &GenerationSettings) -> Result<Self, GenerationError>;

    /// Draw a full solution
    fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        settings: &GenerationSettings,
    ) -> Result<Vec<String>, GenerationError>;

    /// Choose the positions of `solution` to hide
    fn mask<R: Rng + ?Sized>(&self, solution: &[String], rng: &mut R) -> MaskPlan;
}

/// Run the full protocol for one instance
pub fn run<G: Generator, R: Rng + ?Sized>(
    params: &G,
    rng: &mut R,
    settings: &GenerationSettings,
) -> Result<ProblemInstance, GenerationError> {
    let params = params.feasible(settings)?;
    let solution = params.sample(rng, settings)?;
    let plan = params.mask(&solution, rng);
    Ok(ProblemInstance::masked(G::KIND, solution, &plan))
}

/// Call `draw` until it accepts a sample or the attempt budget runs out
///
/// `draw` returns `Ok(None)` to reject a sample.
pub fn rejection_sample<R, T, F>(
    kind: ProblemKind,
    rng: &mut R,
    max_attempts: u32,
    mut draw: F,
) -> Result<T, GenerationError>
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> Result<Option<T>, GenerationError>,
{
    for attempt in 1..=max_attempts {
        if let Some(sample) = draw(rng)? {
            debug!(%kind, attempt, "accepted sample");
            return Ok(sample);
        }
    }
    Err(GenerationError::SamplingNonTermination {
        kind,
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_accepts_first_valid_sample() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut calls = 0;
        let value = rejection_sample(ProblemKind::Division, &mut rng, 10, |_| {
            calls += 1;
            Ok((calls == 3).then_some(calls))
        })
        .unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn test_budget_exhaustion_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let result: Result<(), _> =
            rejection_sample(ProblemKind::Sequence, &mut rng, 25, |_| Ok(None));
        match result {
            Err(GenerationError::SamplingNonTermination { kind, attempts }) => {
                assert_eq!(kind, ProblemKind::Sequence);
                assert_eq!(attempts, 25);
            }
            other => panic!("expected SamplingNonTermination, got {:?}", other),
        }
    }

    #[test]
    fn test_draw_errors_propagate() {
        let mut rng = StdRng::seed_from_u64(1);
        let result: Result<(), _> = rejection_sample(ProblemKind::Sequence, &mut rng, 5, |_| {
            Err(GenerationError::InvalidDigits(0))
        });
        assert!(matches!(result, Err(GenerationError::InvalidDigits(0))));
    }
}
