//! Runs of consecutive integers with hidden positions

use rand::Rng;

use crate::config::GenerationSettings;
use crate::error::GenerationError;

use super::sampling::Generator;
use super::{MaskPlan, ProblemKind};

/// Items allowed in a single sequence
pub const MAX_ITEMS: u32 = 100;

/// Which endpoints of the run are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceType {
    /// Neither endpoint; one random interior item is shown instead
    None,
    First,
    Last,
    Both,
}

impl SequenceType {
    fn shows_first(self) -> bool {
        matches!(self, SequenceType::First | SequenceType::Both)
    }

    fn shows_last(self) -> bool {
        matches!(self, SequenceType::Last | SequenceType::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    pub seqtype: SequenceType,
    pub items: u32,
    pub geq: i64,
    pub leq: i64,
}

impl Generator for Sequence {
    const KIND: ProblemKind = ProblemKind::Sequence;

    fn feasible(&self, _settings: &GenerationSettings) -> Result<Self, GenerationError> {
        if !(1..=MAX_ITEMS).contains(&self.items) {
            return Err(GenerationError::infeasible(
                Self::KIND,
                format!("a sequence holds between 1 and {MAX_ITEMS} items, not {}", self.items),
            ));
        }
        let width = i128::from(self.leq) - i128::from(self.geq) + 1;
        if width < i128::from(self.items) {
            return Err(GenerationError::infeasible(
                Self::KIND,
                format!(
                    "it is not possible to fit {} different numbers taken from the range [{}, {}]",
                    self.items, self.geq, self.leq
                ),
            ));
        }
        Ok(*self)
    }

    /// Solution layout: `[v0, …, v(n-1)]`
    fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        _settings: &GenerationSettings,
    ) -> Result<Vec<String>, GenerationError> {
        let items = i64::from(self.items);
        let start = rng.random_range(self.geq..=self.leq - items + 1);
        Ok((start..start + items).map(|v| v.to_string()).collect())
    }

    fn mask<R: Rng + ?Sized>(&self, solution: &[String], rng: &mut R) -> MaskPlan {
        let n = solution.len();
        let hint = if n > 2 {
            rng.random_range(1..n - 1)
        } else {
            rng.random_range(0..n)
        };

        let mut plan = MaskPlan::new();
        for idx in 0..n {
            let shown = (idx == 0 && self.seqtype.shows_first())
                || (idx == n - 1 && self.seqtype.shows_last())
                || (idx == hint && self.seqtype == SequenceType::None);
            if !shown {
                plan.hide(idx);
            }
        }
        plan
    }
}
