//! JSON batches: master problems in, numbered problem records out
//!
//! A master document is an array of entries such as
//!
//! ```json
//! [{"type": "Sequence", "nbprobs": 2, "args": {"type": 3, "nbitems": 5, "geq": 0, "leq": 20}}]
//! ```
//!
//! each asking for `nbprobs` instances of one kind. The output is an array
//! of [`ProblemRecord`]s numbered from 1.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::ConfigError;
use crate::problem::{self, ParamMap, ProblemKind, ProblemParameters, ProblemRecord};
use crate::SheetError;

/// One entry of a master document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterProblem {
    #[serde(rename = "type")]
    pub kind: ProblemKind,
    /// Number of instances to generate
    pub nbprobs: u32,
    pub args: ParamMap,
}

/// Read the entries of a master document
pub fn parse_master_problems(json: &str) -> Result<Vec<MasterProblem>, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Generate every instance requested by `masters`
///
/// Arguments of all entries are validated before anything is generated. Any
/// failure aborts the whole batch.
pub fn generate_batch<R: Rng + ?Sized>(
    masters: &[MasterProblem],
    rng: &mut R,
    config: &GeneratorConfig,
) -> Result<Vec<ProblemRecord>, SheetError> {
    let parameters = masters
        .iter()
        .map(|master| ProblemParameters::from_map(master.kind, &master.args).map(|v| v.parameters))
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::new();
    for (master, params) in masters.iter().zip(&parameters) {
        debug!(kind = %master.kind, count = master.nbprobs, "generating master problem");
        for _ in 0..master.nbprobs {
            let instance = problem::generate(params, rng, &config.generation)?;
            let id = records.len() as u32 + 1;
            records.push(ProblemRecord::new(id, instance));
        }
    }
    Ok(records)
}

/// Write records as a JSON array
pub fn to_json(records: &[ProblemRecord]) -> Result<String, SheetError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Read a JSON array of records, checking each one is a consistent instance
pub fn parse_records(json: &str) -> Result<Vec<ProblemRecord>, SheetError> {
    let records: Vec<ProblemRecord> = serde_json::from_str(json)?;
    for record in &records {
        record.clone().into_instance()?;
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Token;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const MASTERS: &str = r#"[
        {"type": "Sequence", "nbprobs": 2, "args": {"type": 3, "nbitems": 5, "geq": 0, "leq": 20}},
        {"type": "division", "nbprobs": 1, "args": {"nbdvdigits": 3, "nbdrdigits": 1, "nbqdigits": 2}}
    ]"#;

    #[test]
    fn test_parse_master_problems() {
        let masters = parse_master_problems(MASTERS).unwrap();
        assert_eq!(masters.len(), 2);
        assert_eq!(masters[0].kind, ProblemKind::Sequence);
        assert_eq!(masters[1].kind, ProblemKind::Division);
        assert_eq!(masters[1].nbprobs, 1);
    }

    #[test]
    fn test_batch_ids_are_consecutive() {
        let masters = parse_master_problems(MASTERS).unwrap();
        let mut rng = StdRng::seed_from_u64(12);
        let records = generate_batch(&masters, &mut rng, &GeneratorConfig::default()).unwrap();
        let ids: Vec<u32> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(records[2].kind, ProblemKind::Division);
        assert_eq!(records[2].args[2], Token::Masked);
    }

    #[test]
    fn test_one_bad_entry_aborts_batch() {
        let masters = parse_master_problems(
            r#"[
                {"type": "Sequence", "nbprobs": 1, "args": {"type": 0, "nbitems": 3, "geq": 0, "leq": 9}},
                {"type": "Sequence", "nbprobs": 1, "args": {"type": 0, "nbitems": 3}}
            ]"#,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_batch(&masters, &mut rng, &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, SheetError::Config(ConfigError::MissingKey { .. })));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = parse_master_problems(r#"[{"type": "Fractions", "nbprobs": 1, "args": {}}]"#).unwrap_err();
        assert!(err.to_string().contains("Fractions"));
    }

    #[test]
    fn test_inconsistent_record_rejected() {
        let json = r#"[{"type": "Division", "id": 1, "args": ["17", "?", "?", "?"], "solution": ["18", "5", "3", "3"]}]"#;
        let err = parse_records(json).unwrap_err();
        assert!(matches!(err, SheetError::Wire(_)));
    }
}
