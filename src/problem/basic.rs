//! Basic operations: `k` operands with `d` digits each and an `r`-digit result

use rand::Rng;

use crate::config::GenerationSettings;
use crate::error::GenerationError;
use crate::numeric::{digit_count, pow10, random_with_digits, MAX_DIGITS};

use super::operator::Operator;
use super::sampling::{rejection_sample, Generator};
use super::{MaskPlan, ProblemKind};

/// Which part of the operation the student has to supply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicOperationType {
    /// All operands shown, result hidden
    Result,
    /// Result shown, one operand hidden
    Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicOperation {
    pub botype: BasicOperationType,
    pub operator: Operator,
    pub operands: u32,
    pub operand_digits: u32,
    pub result_digits: u32,
}

impl BasicOperation {
    /// Inclusive range of result digit counts reachable with this operator
    pub fn result_digit_range(&self) -> Option<(u32, u32)> {
        let k = i64::from(self.operands);
        let d = self.operand_digits.max(1);
        // Values past i64 exceed any digit count we can produce anyway.
        let count = |v: Option<i64>| v.map_or(MAX_DIGITS + 1, digit_count);
        match self.operator {
            Operator::Add => {
                let lowest = pow10(d - 1).and_then(|p| p.checked_mul(k));
                let highest = pow10(d).and_then(|p| (p - 1).checked_mul(k));
                Some((count(lowest), count(highest)))
            }
            Operator::Sub => {
                let highest = pow10(d).and_then(|p| p.checked_mul(k - 1));
                Some((1, count(highest)))
            }
            Operator::Mul => Some((1 + self.operands * (d - 1), self.operands * d)),
            Operator::Div => (self.operands == 2).then_some((1, 1)),
        }
    }
}

impl Generator for BasicOperation {
    const KIND: ProblemKind = ProblemKind::BasicOperation;

    fn feasible(&self, _settings: &GenerationSettings) -> Result<Self, GenerationError> {
        if self.operands < 2 || !(1..=MAX_DIGITS).contains(&self.operand_digits) {
            return Err(GenerationError::infeasible(
                Self::KIND,
                format!(
                    "{} operands with {} digits each cannot be generated",
                    self.operands, self.operand_digits
                ),
            ));
        }
        let Some((lowest, highest)) = self.result_digit_range() else {
            return Err(GenerationError::infeasible(
                Self::KIND,
                format!(
                    "a division takes exactly 2 operands, {} requested",
                    self.operands
                ),
            ));
        };
        if self.result_digits < lowest || self.result_digits > highest {
            return Err(GenerationError::infeasible(
                Self::KIND,
                format!(
                    "a {} of {} operands with {} digits each yields results with {} to {} digits, not {}",
                    self.operator.name(),
                    self.operands,
                    self.operand_digits,
                    lowest,
                    highest,
                    self.result_digits
                ),
            ));
        }
        Ok(*self)
    }

    /// Solution layout: `[op1, …, opk, result]`
    fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        settings: &GenerationSettings,
    ) -> Result<Vec<String>, GenerationError> {
        let (operands, result) = rejection_sample(Self::KIND, rng, settings.max_attempts, |rng| {
            let operands = (0..self.operands)
                .map(|_| random_with_digits(rng, self.operand_digits))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(self
                .operator
                .fold(&operands)
                .filter(|r| digit_count(*r) == self.result_digits)
                .map(|r| (operands, r)))
        })?;

        let mut solution: Vec<String> = operands.iter().map(i64::to_string).collect();
        solution.push(result.to_string());
        Ok(solution)
    }

    fn mask<R: Rng + ?Sized>(&self, solution: &[String], rng: &mut R) -> MaskPlan {
        let mut plan = MaskPlan::new();
        match self.botype {
            BasicOperationType::Result => plan.hide(solution.len() - 1),
            BasicOperationType::Operand => plan.hide(rng.random_range(0..self.operands as usize)),
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::sampling::run;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn op(operator: Operator, operands: u32, d: u32, r: u32) -> BasicOperation {
        BasicOperation {
            botype: BasicOperationType::Result,
            operator,
            operands,
            operand_digits: d,
            result_digits: r,
        }
    }

    #[test]
    fn test_sum_digit_range() {
        assert_eq!(op(Operator::Add, 2, 1, 1).result_digit_range(), Some((1, 2)));
        assert_eq!(op(Operator::Add, 3, 2, 2).result_digit_range(), Some((2, 3)));
        assert_eq!(op(Operator::Add, 20, 1, 2).result_digit_range(), Some((2, 3)));
    }

    #[test]
    fn test_product_digit_range() {
        assert_eq!(op(Operator::Mul, 2, 2, 3).result_digit_range(), Some((3, 4)));
        assert_eq!(op(Operator::Mul, 3, 1, 1).result_digit_range(), Some((1, 3)));
    }

    #[test]
    fn test_division_needs_two_operands() {
        let settings = GenerationSettings::default();
        assert!(op(Operator::Div, 3, 1, 1).feasible(&settings).is_err());
        assert!(op(Operator::Div, 2, 1, 2).feasible(&settings).is_err());
        assert!(op(Operator::Div, 2, 2, 1).feasible(&settings).is_ok());
    }

    #[test]
    fn test_infeasible_sum_message() {
        let err = op(Operator::Add, 2, 1, 3)
            .feasible(&GenerationSettings::default())
            .unwrap_err();
        assert!(err.to_string().contains("1 to 2 digits, not 3"));
    }

    #[test]
    fn test_subtraction_stays_non_negative() {
        let mut rng = StdRng::seed_from_u64(11);
        let settings = GenerationSettings::default();
        let params = op(Operator::Sub, 3, 2, 1);
        for _ in 0..200 {
            let instance = run(&params, &mut rng, &settings).unwrap();
            let values: Vec<i64> = (0..4).map(|i| instance.value(i).unwrap()).collect();
            assert_eq!(values[0] - values[1] - values[2], values[3]);
            assert!(values[3] >= 0 && values[3] <= 9);
        }
    }

    #[test]
    fn test_operand_type_hides_one_operand() {
        let mut rng = StdRng::seed_from_u64(5);
        let settings = GenerationSettings::default();
        let params = BasicOperation {
            botype: BasicOperationType::Operand,
            ..op(Operator::Mul, 3, 1, 2)
        };
        for _ in 0..200 {
            let instance = run(&params, &mut rng, &settings).unwrap();
            let masked = instance.masked_positions();
            assert_eq!(masked.len(), 1);
            assert!(masked[0] < 3);
        }
    }
}
