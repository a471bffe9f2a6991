//! Mystery operations: a two-operand operation with hidden digits

use rand::Rng;

use crate::config::GenerationSettings;
use crate::error::GenerationError;
use crate::numeric::{digit_count, digits_of, random_with_digits, MAX_DIGITS};

use super::operator::Operator;
use super::sampling::{rejection_sample, Generator};
use super::{MaskPlan, ProblemKind};

/// Tokens ahead of the digits: operator and the three digit counts
pub const HEADER_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MysteryOperation {
    pub operator: Operator,
    pub digits1: u32,
    pub digits2: u32,
    pub answer_digits: u32,
    pub masked1: u32,
    pub masked2: u32,
    pub masked_answer: u32,
}

impl MysteryOperation {
    /// Inclusive range of answer digit counts reachable with this operator
    ///
    /// `None` when no answer exists at all, i.e. a difference or a quotient
    /// whose second operand is longer than the first.
    pub fn answer_digit_range(&self) -> Option<(u32, u32)> {
        let (d1, d2) = (self.digits1, self.digits2);
        match self.operator {
            Operator::Add => Some((d1.max(d2), d1.max(d2) + 1)),
            Operator::Sub => (d1 >= d2).then_some((1, d1)),
            Operator::Mul => Some(((d1 + d2).saturating_sub(1).max(1), d1 + d2)),
            Operator::Div => d1.checked_sub(d2).map(|gap| (1, gap + 1)),
        }
    }

    /// Number of tokens in a solution
    pub fn token_count(&self) -> usize {
        HEADER_LEN + (self.digits1 + self.digits2 + self.answer_digits) as usize
    }

    /// Draw one candidate; divisions are always exact (no remainder shown)
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<(i64, i64, i64)>, GenerationError> {
        let (first, second, answer) = match self.operator {
            // Draw divisor and quotient so that the division is exact.
            Operator::Div => {
                let divisor = random_with_digits(rng, self.digits2)?;
                let quotient = random_with_digits(rng, self.answer_digits)?;
                let Some(dividend) = divisor.checked_mul(quotient) else {
                    return Ok(None);
                };
                (dividend, divisor, quotient)
            }
            operator => {
                let first = random_with_digits(rng, self.digits1)?;
                let second = random_with_digits(rng, self.digits2)?;
                let Some(answer) = operator.apply(first, second) else {
                    return Ok(None);
                };
                (first, second, answer)
            }
        };
        let fits = digit_count(first) == self.digits1
            && digit_count(second) == self.digits2
            && digit_count(answer) == self.answer_digits;
        Ok(fits.then_some((first, second, answer)))
    }
}

impl Generator for MysteryOperation {
    const KIND: ProblemKind = ProblemKind::MysteryOperation;

    fn feasible(&self, _settings: &GenerationSettings) -> Result<Self, GenerationError> {
        for digits in [self.digits1, self.digits2, self.answer_digits] {
            if !(1..=MAX_DIGITS).contains(&digits) {
                return Err(GenerationError::InvalidDigits(digits));
            }
        }
        for (field, masked, digits) in [
            ("first operand", self.masked1, self.digits1),
            ("second operand", self.masked2, self.digits2),
            ("answer", self.masked_answer, self.answer_digits),
        ] {
            if masked > digits {
                return Err(GenerationError::infeasible(
                    Self::KIND,
                    format!("cannot mask {masked} digits of a {digits}-digit {field}"),
                ));
            }
        }

        let Some((lowest, highest)) = self.answer_digit_range() else {
            return Err(GenerationError::infeasible(
                Self::KIND,
                format!(
                    "a {} needs a first operand at least as long as the second, got {} and {} digits",
                    self.operator.name(),
                    self.digits1,
                    self.digits2
                ),
            ));
        };
        if self.answer_digits < lowest || self.answer_digits > highest {
            return Err(GenerationError::infeasible(
                Self::KIND,
                format!(
                    "a {} of {}-digit and {}-digit operands yields answers with {} to {} digits, not {}",
                    self.operator.name(),
                    self.digits1,
                    self.digits2,
                    lowest,
                    highest,
                    self.answer_digits
                ),
            ));
        }
        Ok(*self)
    }

    /// Solution layout: `[operator, d1, d2, r, digits(op1)…, digits(op2)…, digits(answer)…]`
    fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        settings: &GenerationSettings,
    ) -> Result<Vec<String>, GenerationError> {
        let (first, second, answer) =
            rejection_sample(Self::KIND, rng, settings.max_attempts, |rng| self.draw(rng))?;

        let mut solution = Vec::with_capacity(self.token_count());
        solution.push(self.operator.symbol().to_string());
        solution.extend(
            [self.digits1, self.digits2, self.answer_digits]
                .iter()
                .map(u32::to_string),
        );
        for value in [first, second, answer] {
            solution.extend(digits_of(value).iter().map(u8::to_string));
        }
        Ok(solution)
    }

    fn mask<R: Rng + ?Sized>(&self, _solution: &[String], rng: &mut R) -> MaskPlan {
        let d1 = self.digits1 as usize;
        let d2 = self.digits2 as usize;
        let mut plan = MaskPlan::new();
        plan.hide_random(rng, HEADER_LEN, d1, self.masked1 as usize);
        plan.hide_random(rng, HEADER_LEN + d1, d2, self.masked2 as usize);
        plan.hide_random(
            rng,
            HEADER_LEN + d1 + d2,
            self.answer_digits as usize,
            self.masked_answer as usize,
        );
        plan
    }
}
