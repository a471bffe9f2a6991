//! Typed problem parameters and the validator that builds them
//!
//! Parameters arrive as a loosely typed map (usually the `args` object of a
//! master problem). [`ProblemParameters::from_map`] checks mandatory keys,
//! coerces values and range-checks them, returning a complete record or an
//! error. Unknown keys are tolerated and reported.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::numeric::{pow10, MAX_DIGITS};

use super::basic::{BasicOperation, BasicOperationType};
use super::division::Division;
use super::mystery::MysteryOperation;
use super::operator::Operator;
use super::sequence::{Sequence, SequenceType, MAX_ITEMS};
use super::table::{MultiplicationTable, TableType};
use super::ProblemKind;

/// Largest number of operands of a basic operation
pub const MAX_OPERANDS: u32 = 99;

/// A dynamically typed parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

/// Option name to value
pub type ParamMap = BTreeMap<String, ParamValue>;

/// A validated record together with the keys that were ignored
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub parameters: T,
    pub unknown_keys: Vec<String>,
}

/// Typed parameters of one problem kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemParameters {
    BasicOperation(BasicOperation),
    Division(Division),
    Sequence(Sequence),
    MultiplicationTable(MultiplicationTable),
    MysteryOperation(MysteryOperation),
}

impl ProblemParameters {
    pub fn kind(&self) -> ProblemKind {
        match self {
            Self::BasicOperation(_) => ProblemKind::BasicOperation,
            Self::Division(_) => ProblemKind::Division,
            Self::Sequence(_) => ProblemKind::Sequence,
            Self::MultiplicationTable(_) => ProblemKind::MultiplicationTable,
            Self::MysteryOperation(_) => ProblemKind::MysteryOperation,
        }
    }

    /// Validate `map` as the parameters of a `kind` problem
    pub fn from_map(kind: ProblemKind, map: &ParamMap) -> Result<Validated<Self>, ConfigError> {
        let mut reader = ParamReader::new(kind, map);
        let parameters = match kind {
            ProblemKind::BasicOperation => Self::BasicOperation(BasicOperation {
                botype: reader.choice(
                    "type",
                    "a basic operation type",
                    &[
                        ("result", BasicOperationType::Result),
                        ("operand", BasicOperationType::Operand),
                    ],
                )?,
                operator: reader.operator("operator")?,
                operands: reader.count("nboperands", 2, MAX_OPERANDS)?,
                operand_digits: reader.digits("nbdigitsop")?,
                result_digits: reader.digits("nbdigitsrslt")?,
            }),
            ProblemKind::Division => Self::Division(Division {
                dividend_digits: reader.digits("nbdvdigits")?,
                divisor_digits: reader.digits("nbdrdigits")?,
                quotient_digits: reader.digits("nbqdigits")?,
            }),
            ProblemKind::Sequence => Self::Sequence(Sequence {
                seqtype: reader.choice(
                    "type",
                    "a sequence type",
                    &[
                        ("none", SequenceType::None),
                        ("first", SequenceType::First),
                        ("last", SequenceType::Last),
                        ("both", SequenceType::Both),
                    ],
                )?,
                items: reader.count("nbitems", 1, MAX_ITEMS)?,
                geq: reader.bounded("geq")?,
                leq: reader.bounded("leq")?,
            }),
            ProblemKind::MultiplicationTable => {
                let table = MultiplicationTable {
                    mttype: reader.choice(
                        "type",
                        "a multiplication table type",
                        &[("result", TableType::Result), ("operand", TableType::Operand)],
                    )?,
                    factor_digits: reader.digits("nbdigits")?,
                    geq: reader.bounded_or("geq", 1)?,
                    leq: reader.bounded_or("leq", 10)?,
                    inv: reader.boolean_or("inv", false)?,
                    sorted: reader.boolean_or("sorted", true)?,
                };
                if table.geq > table.leq {
                    return Err(ConfigError::invalid(
                        kind,
                        "geq",
                        format!("{} is larger than leq = {}", table.geq, table.leq),
                    ));
                }
                Self::MultiplicationTable(table)
            }
            ProblemKind::MysteryOperation => Self::MysteryOperation(MysteryOperation {
                operator: reader.operator("operator")?,
                digits1: reader.digits("nbdigits1")?,
                digits2: reader.digits("nbdigits2")?,
                answer_digits: reader.digits("nbdigitsanswer")?,
                masked1: reader.count("nbmasked1", 0, MAX_DIGITS)?,
                masked2: reader.count("nbmasked2", 0, MAX_DIGITS)?,
                masked_answer: reader.count("nbmaskedanswer", 0, MAX_DIGITS)?,
            }),
        };
        Ok(Validated {
            parameters,
            unknown_keys: reader.finish(),
        })
    }
}

impl From<BasicOperation> for ProblemParameters {
    fn from(params: BasicOperation) -> Self {
        Self::BasicOperation(params)
    }
}

impl From<Division> for ProblemParameters {
    fn from(params: Division) -> Self {
        Self::Division(params)
    }
}

impl From<Sequence> for ProblemParameters {
    fn from(params: Sequence) -> Self {
        Self::Sequence(params)
    }
}

impl From<MultiplicationTable> for ProblemParameters {
    fn from(params: MultiplicationTable) -> Self {
        Self::MultiplicationTable(params)
    }
}

impl From<MysteryOperation> for ProblemParameters {
    fn from(params: MysteryOperation) -> Self {
        Self::MysteryOperation(params)
    }
}

/// Reads keys out of a parameter map, remembering which ones were consumed
struct ParamReader<'a> {
    kind: ProblemKind,
    map: &'a ParamMap,
    used: BTreeSet<&'static str>,
}

impl<'a> ParamReader<'a> {
    fn new(kind: ProblemKind, map: &'a ParamMap) -> Self {
        Self {
            kind,
            map,
            used: BTreeSet::new(),
        }
    }

    fn lookup(&mut self, key: &'static str) -> Option<&'a ParamValue> {
        self.used.insert(key);
        self.map.get(key)
    }

    fn require(&mut self, key: &'static str) -> Result<&'a ParamValue, ConfigError> {
        self.lookup(key)
            .ok_or_else(|| ConfigError::missing(self.kind, key))
    }

    fn coerce_int(&self, key: &str, value: &ParamValue) -> Result<i64, ConfigError> {
        match value {
            ParamValue::Int(v) => Ok(*v),
            ParamValue::Float(v) if v.is_finite() && v.abs() < i64::MAX as f64 => Ok(v.trunc() as i64),
            ParamValue::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| ConfigError::wrong_type(self.kind, key, "an integer")),
            _ => Err(ConfigError::wrong_type(self.kind, key, "an integer")),
        }
    }

    fn coerce_bool(&self, key: &str, value: &ParamValue) -> Result<bool, ConfigError> {
        match value {
            ParamValue::Bool(v) => Ok(*v),
            ParamValue::Int(v) => Ok(*v != 0),
            ParamValue::Str(s) => Ok(!s.is_empty() && !s.eq_ignore_ascii_case("false")),
            ParamValue::Float(_) => Err(ConfigError::wrong_type(self.kind, key, "a boolean")),
        }
    }

    fn integer(&mut self, key: &'static str) -> Result<i64, ConfigError> {
        let value = self.require(key)?;
        self.coerce_int(key, value)
    }

    /// An integer within `min..=max`
    fn count(&mut self, key: &'static str, min: u32, max: u32) -> Result<u32, ConfigError> {
        let value = self.integer(key)?;
        match u32::try_from(value) {
            Ok(v) if (min..=max).contains(&v) => Ok(v),
            _ => Err(ConfigError::invalid(
                self.kind,
                key,
                format!("{value} is not within [{min}, {max}]"),
            )),
        }
    }

    fn digits(&mut self, key: &'static str) -> Result<u32, ConfigError> {
        self.count(key, 1, MAX_DIGITS)
    }

    /// An integer whose magnitude has at most `MAX_DIGITS` digits
    fn bounded(&mut self, key: &'static str) -> Result<i64, ConfigError> {
        let value = self.integer(key)?;
        self.check_bounded(key, value)
    }

    fn bounded_or(&mut self, key: &'static str, default: i64) -> Result<i64, ConfigError> {
        match self.lookup(key) {
            Some(value) => {
                let value = self.coerce_int(key, value)?;
                self.check_bounded(key, value)
            }
            None => Ok(default),
        }
    }

    fn check_bounded(&self, key: &str, value: i64) -> Result<i64, ConfigError> {
        let limit = pow10(MAX_DIGITS).unwrap_or(i64::MAX);
        if value.unsigned_abs() >= limit.unsigned_abs() {
            return Err(ConfigError::invalid(
                self.kind,
                key,
                format!("{value} has more than {MAX_DIGITS} digits"),
            ));
        }
        Ok(value)
    }

    fn boolean_or(&mut self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.lookup(key) {
            Some(value) => self.coerce_bool(key, value),
            None => Ok(default),
        }
    }

    /// An enumeration given either by name or by its legacy integer code,
    /// the index into `options`
    fn choice<T: Copy>(
        &mut self,
        key: &'static str,
        expected: &'static str,
        options: &[(&str, T)],
    ) -> Result<T, ConfigError> {
        let value = self.require(key)?;
        if let ParamValue::Str(name) = value {
            if let Some((_, option)) = options
                .iter()
                .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name.trim()))
            {
                return Ok(*option);
            }
        }
        let code = self
            .coerce_int(key, value)
            .map_err(|_| ConfigError::wrong_type(self.kind, key, expected))?;
        usize::try_from(code)
            .ok()
            .and_then(|index| options.get(index))
            .map(|(_, option)| *option)
            .ok_or_else(|| {
                ConfigError::invalid(
                    self.kind,
                    key,
                    format!("{code} is not a code between 0 and {}", options.len() - 1),
                )
            })
    }

    fn operator(&mut self, key: &'static str) -> Result<Operator, ConfigError> {
        match self.require(key)? {
            ParamValue::Str(s) => s.parse().map_err(|_| {
                ConfigError::invalid(self.kind, key, format!("'{s}' is not one of + - * /"))
            }),
            _ => Err(ConfigError::wrong_type(self.kind, key, "an operator symbol")),
        }
    }

    /// Keys of the map that no read touched, each reported once
    fn finish(self) -> Vec<String> {
        let unknown: Vec<String> = self
            .map
            .keys()
            .filter(|key| !self.used.contains(key.as_str()))
            .cloned()
            .collect();
        for key in &unknown {
            warn!(kind = %self.kind, key = %key, "ignoring unknown parameter");
        }
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(entries: &[(&str, ParamValue)]) -> ParamMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_basic_operation_from_legacy_codes() {
        let args = map(&[
            ("type", 1.into()),
            ("operator", "+".into()),
            ("nboperands", 2.into()),
            ("nbdigitsop", "3".into()),
            ("nbdigitsrslt", 3.5.into()),
        ]);
        let validated = ProblemParameters::from_map(ProblemKind::BasicOperation, &args).unwrap();
        assert_eq!(
            validated.parameters,
            ProblemParameters::BasicOperation(BasicOperation {
                botype: BasicOperationType::Operand,
                operator: Operator::Add,
                operands: 2,
                operand_digits: 3,
                result_digits: 3,
            })
        );
        assert!(validated.unknown_keys.is_empty());
    }

    #[test]
    fn test_missing_key_is_named() {
        let args = map(&[("nbdvdigits", 3.into()), ("nbdrdigits", 1.into())]);
        let err = ProblemParameters::from_map(ProblemKind::Division, &args).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { .. }));
        assert_eq!(err.key(), Some("nbqdigits"));
    }

    #[test]
    fn test_wrong_type_is_named() {
        let args = map(&[
            ("nbdvdigits", "three".into()),
            ("nbdrdigits", 1.into()),
            ("nbqdigits", 2.into()),
        ]);
        let err = ProblemParameters::from_map(ProblemKind::Division, &args).unwrap_err();
        assert_eq!(
            err.to_string(),
            "key 'nbdvdigits' for Division should be given as an integer"
        );
    }

    #[test]
    fn test_unknown_keys_are_reported() {
        let args = map(&[
            ("type", "both".into()),
            ("nbitems", 5.into()),
            ("geq", 0.into()),
            ("leq", 20.into()),
            ("color", "red".into()),
        ]);
        let validated = ProblemParameters::from_map(ProblemKind::Sequence, &args).unwrap();
        assert_eq!(validated.unknown_keys, vec!["color".to_string()]);
        assert_eq!(validated.parameters.kind(), ProblemKind::Sequence);
    }

    #[test]
    fn test_table_defaults() {
        let args = map(&[("type", "result".into()), ("nbdigits", 1.into())]);
        let validated = ProblemParameters::from_map(ProblemKind::MultiplicationTable, &args).unwrap();
        assert_eq!(
            validated.parameters,
            ProblemParameters::MultiplicationTable(MultiplicationTable {
                mttype: TableType::Result,
                factor_digits: 1,
                geq: 1,
                leq: 10,
                inv: false,
                sorted: true,
            })
        );
    }

    #[test]
    fn test_boolean_coercion() {
        let base = [("type", ParamValue::from(0)), ("nbdigits", ParamValue::from(1))];
        for (value, expected) in [
            (ParamValue::from("False"), false),
            (ParamValue::from(""), false),
            (ParamValue::from("yes"), true),
            (ParamValue::from(0), false),
            (ParamValue::from(2), true),
            (ParamValue::from(true), true),
        ] {
            let mut args = map(&base);
            args.insert("inv".into(), value);
            let validated = ProblemParameters::from_map(ProblemKind::MultiplicationTable, &args).unwrap();
            match validated.parameters {
                ProblemParameters::MultiplicationTable(table) => assert_eq!(table.inv, expected),
                other => panic!("unexpected parameters {:?}", other),
            }
        }
    }

    #[test]
    fn test_range_checks() {
        let args = map(&[
            ("type", 0.into()),
            ("operator", "*".into()),
            ("nboperands", 1.into()),
            ("nbdigitsop", 1.into()),
            ("nbdigitsrslt", 1.into()),
        ]);
        let err = ProblemParameters::from_map(ProblemKind::BasicOperation, &args).unwrap_err();
        assert_eq!(err.key(), Some("nboperands"));

        let args = map(&[("type", 0.into()), ("nbdigits", 0.into())]);
        let err = ProblemParameters::from_map(ProblemKind::MultiplicationTable, &args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let args = map(&[
            ("type", 0.into()),
            ("nbdigits", 1.into()),
            ("geq", 9.into()),
            ("leq", 3.into()),
        ]);
        let err = ProblemParameters::from_map(ProblemKind::MultiplicationTable, &args).unwrap_err();
        assert_eq!(err.key(), Some("geq"));
    }

    #[test]
    fn test_sequence_length_is_capped() {
        let args = map(&[
            ("type", "none".into()),
            ("nbitems", 4_000_000_000_i64.into()),
            ("geq", (-100_000_000_000_000_000_i64).into()),
            ("leq", 100_000_000_000_000_000_i64.into()),
        ]);
        let err = ProblemParameters::from_map(ProblemKind::Sequence, &args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(err.key(), Some("nbitems"));
        assert!(err.to_string().contains("[1, 100]"));
    }

    #[test]
    fn test_enum_codes_out_of_range() {
        let args = map(&[
            ("type", 4.into()),
            ("nbitems", 5.into()),
            ("geq", 0.into()),
            ("leq", 20.into()),
        ]);
        let err = ProblemParameters::from_map(ProblemKind::Sequence, &args).unwrap_err();
        assert!(err.to_string().contains("between 0 and 3"));
    }

    #[test]
    fn test_param_values_from_json() {
        let args: ParamMap =
            serde_json::from_str(r#"{"a": true, "b": 3, "c": 2.5, "d": "x"}"#).unwrap();
        assert_eq!(args["a"], ParamValue::Bool(true));
        assert_eq!(args["b"], ParamValue::Int(3));
        assert_eq!(args["c"], ParamValue::Float(2.5));
        assert_eq!(args["d"], ParamValue::Str("x".into()));
    }
}
