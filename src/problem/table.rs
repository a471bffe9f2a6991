//! Multiplication tables: one factor times every integer of a range

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GenerationSettings;
use crate::error::GenerationError;
use crate::numeric::{digit_bounds, random_with_digits};

use super::sampling::Generator;
use super::{MaskPlan, ProblemKind};

/// Rows allowed in a single table
pub const MAX_ROWS: i64 = 100;

/// Which part of each row the student has to supply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableType {
    /// Both factors shown, product hidden
    Result,
    /// Product shown, one factor hidden per row
    Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiplicationTable {
    pub mttype: TableType,
    pub factor_digits: u32,
    pub geq: i64,
    pub leq: i64,
    /// Randomly swap the display order of the two factors per row
    pub inv: bool,
    /// Keep rows in ascending order of the running factor
    pub sorted: bool,
}

impl MultiplicationTable {
    pub fn rows(&self) -> usize {
        (self.leq - self.geq + 1).max(0) as usize
    }
}

impl Generator for MultiplicationTable {
    const KIND: ProblemKind = ProblemKind::MultiplicationTable;

    fn feasible(&self, _settings: &GenerationSettings) -> Result<Self, GenerationError> {
        let (_, largest_factor) = digit_bounds(self.factor_digits)?;
        let rows = i128::from(self.leq) - i128::from(self.geq) + 1;
        if rows < 1 || rows > i128::from(MAX_ROWS) {
            return Err(GenerationError::infeasible(
                Self::KIND,
                format!(
                    "the range [{}, {}] must hold between 1 and {} rows",
                    self.geq, self.leq, MAX_ROWS
                ),
            ));
        }
        let largest_row = self.geq.unsigned_abs().max(self.leq.unsigned_abs());
        if i64::try_from(largest_row)
            .ok()
            .and_then(|row| row.checked_mul(largest_factor))
            .is_none()
        {
            return Err(GenerationError::infeasible(
                Self::KIND,
                format!(
                    "products of {}-digit factors with {} overflow",
                    self.factor_digits, largest_row
                ),
            ));
        }
        Ok(*self)
    }

    /// Solution layout: `[factor, a1, b1, p1, …]` with rows in display order
    fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        _settings: &GenerationSettings,
    ) -> Result<Vec<String>, GenerationError> {
        let factor = random_with_digits(rng, self.factor_digits)?;

        let mut rows: Vec<[i64; 3]> = (self.geq..=self.leq)
            .map(|i| {
                let product = factor * i;
                if self.inv && rng.random_bool(0.5) {
                    [i, factor, product]
                } else {
                    [factor, i, product]
                }
            })
            .collect();
        if !self.sorted {
            rows.shuffle(rng);
        }

        let mut solution = Vec::with_capacity(1 + 3 * rows.len());
        solution.push(factor.to_string());
        solution.extend(rows.iter().flatten().map(i64::to_string));
        Ok(solution)
    }

    fn mask<R: Rng + ?Sized>(&self, solution: &[String], rng: &mut R) -> MaskPlan {
        let mut plan = MaskPlan::new();
        for row in 0..(solution.len() - 1) / 3 {
            let base = 1 + 3 * row;
            match self.mttype {
                TableType::Result => plan.hide(base + 2),
                TableType::Operand => plan.hide(if rng.random_bool(0.5) { base } else { base + 1 }),
            }
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

    fn table(mttype: TableType, inv: bool, sorted: bool) -> MultiplicationTable {
        MultiplicationTable {
            mttype,
            factor_digits: 1,
            geq: 1,
            leq: 10,
            inv,
            sorted,
        }
    }

    #[test]
    fn test_rows_cover_range() {
        let mut rng = StdRng::seed_from_u64(8);
        let instance = run(
            &table(TableType::Result, true, false),
            &mut rng,
            &GenerationSettings::default(),
        )
        .unwrap();
        assert_eq!(instance.solution().len(), 31);

        let factor = instance.value(0).unwrap();
        let mut running: Vec<i64> = (0..10)
            .map(|row| {
                let a = instance.value(1 + 3 * row).unwrap();
                let b = instance.value(2 + 3 * row).unwrap();
                assert_eq!(a * b, instance.value(3 + 3 * row).unwrap());
                assert!(a == factor || b == factor);
                if a == factor {
                    b
                } else {
                    a
                }
            })
            .collect();
        running.sort();
        assert_eq!(running, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_operand_type_never_hides_product() {
        let mut rng = StdRng::seed_from_u64(3);
        let instance = run(
            &table(TableType::Operand, false, true),
            &mut rng,
            &GenerationSettings::default(),
        )
        .unwrap();
        let masked = instance.masked_positions();
        assert_eq!(masked.len(), 10);
        for position in masked {
            assert_ne!(position, 0);
            assert_ne!((position - 1) % 3, 2);
        }
    }

    #[test]
    fn test_empty_range_is_infeasible() {
        let params = MultiplicationTable {
            geq: 5,
            leq: 4,
            ..table(TableType::Result, false, true)
        };
        assert!(params.feasible(&GenerationSettings::default()).is_err());
    }
}
