//! Long divisions: dividend, divisor, quotient and remainder

use rand::Rng;
use tracing::warn;

use crate::config::GenerationSettings;
use crate::error::GenerationError;
use crate::numeric::{digit_count, random_with_digits, MAX_DIGITS};

use super::sampling::{rejection_sample, Generator};
use super::{MaskPlan, ProblemKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Division {
    pub dividend_digits: u32,
    pub divisor_digits: u32,
    pub quotient_digits: u32,
}

impl Division {
    /// Inclusive range of quotient digit counts for these operand sizes
    pub fn quotient_digit_range(&self) -> (u32, u32) {
        let gap = self.dividend_digits.saturating_sub(self.divisor_digits);
        (gap.max(1), gap + 1)
    }
}

impl Generator for Division {
    const KIND: ProblemKind = ProblemKind::Division;

    /// Quotient digit counts outside the reachable range are clamped to the
    /// nearest bound with a warning, unless strict division is configured.
    fn feasible(&self, settings: &GenerationSettings) -> Result<Self, GenerationError> {
        for digits in [self.dividend_digits, self.divisor_digits] {
            if !(1..=MAX_DIGITS).contains(&digits) {
                return Err(GenerationError::InvalidDigits(digits));
            }
        }
        if self.dividend_digits < self.divisor_digits {
            return Err(GenerationError::infeasible(
                Self::KIND,
                format!(
                    "a dividend with {} digits is always smaller than a divisor with {} digits",
                    self.dividend_digits, self.divisor_digits
                ),
            ));
        }

        let (lowest, highest) = self.quotient_digit_range();
        let clamped = self.quotient_digits.clamp(lowest, highest);
        if clamped == self.quotient_digits {
            return Ok(*self);
        }
        if settings.strict_division {
            return Err(GenerationError::infeasible(
                Self::KIND,
                format!(
                    "quotients with {} digits are impossible with {} digits in the dividend and {} in the divisor (expected {} to {})",
                    self.quotient_digits, self.dividend_digits, self.divisor_digits, lowest, highest
                ),
            ));
        }
        warn!(
            requested = self.quotient_digits,
            dividend_digits = self.dividend_digits,
            divisor_digits = self.divisor_digits,
            generated = clamped,
            "quotient digit count is not reachable, clamping"
        );
        Ok(Division {
            quotient_digits: clamped,
            ..*self
        })
    }

    /// Solution layout: `[dividend, divisor, quotient, remainder]`
    fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        settings: &GenerationSettings,
    ) -> Result<Vec<String>, GenerationError> {
        let (dividend, divisor, quotient) =
            rejection_sample(Self::KIND, rng, settings.max_attempts, |rng| {
                let dividend = random_with_digits(rng, self.dividend_digits)?;
                let divisor = random_with_digits(rng, self.divisor_digits)?;
                let quotient = dividend / divisor;
                let accepted = quotient != 0 && digit_count(quotient) == self.quotient_digits;
                Ok(accepted.then_some((dividend, divisor, quotient)))
            })?;

        Ok(vec![
            dividend.to_string(),
            divisor.to_string(),
            quotient.to_string(),
            (dividend - divisor * quotient).to_string(),
        ])
    }

    fn mask<R: Rng + ?Sized>(&self, _solution: &[String], _rng: &mut R) -> MaskPlan {
        let mut plan = MaskPlan::new();
        plan.hide(2);
        plan.hide(3);
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::sampling::run;
    use crate::problem::Token;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn division(dv: u32, dr: u32, q: u32) -> Division {
        Division {
            dividend_digits: dv,
            divisor_digits: dr,
            quotient_digits: q,
        }
    }

    #[test]
    fn test_quotient_range() {
        assert_eq!(division(3, 1, 0).quotient_digit_range(), (2, 3));
        assert_eq!(division(2, 2, 0).quotient_digit_range(), (1, 1));
    }

    #[test]
    fn test_lenient_clamping() {
        let settings = GenerationSettings::default();
        assert_eq!(division(3, 1, 7).feasible(&settings).unwrap(), division(3, 1, 3));
        assert_eq!(division(4, 1, 1).feasible(&settings).unwrap(), division(4, 1, 3));
        assert_eq!(division(3, 1, 2).feasible(&settings).unwrap(), division(3, 1, 2));
    }

    #[test]
    fn test_strict_division_fails_fast() {
        let settings = GenerationSettings {
            strict_division: true,
            ..GenerationSettings::default()
        };
        let err = division(3, 1, 7).feasible(&settings).unwrap_err();
        assert!(matches!(err, GenerationError::Infeasible { .. }));
    }

    #[test]
    fn test_divisor_longer_than_dividend() {
        let err = division(1, 2, 1)
            .feasible(&GenerationSettings::default())
            .unwrap_err();
        assert!(err.to_string().contains("always smaller"));
    }

    #[test]
    fn test_quotient_and_remainder_hidden() {
        let mut rng = StdRng::seed_from_u64(2);
        let instance = run(&division(3, 1, 2), &mut rng, &GenerationSettings::default()).unwrap();
        assert!(matches!(instance.args()[0], Token::Literal(_)));
        assert!(matches!(instance.args()[1], Token::Literal(_)));
        assert_eq!(instance.masked_positions(), vec![2, 3]);
        assert_eq!(digit_count(instance.value(2).unwrap()), 2);
    }
}
