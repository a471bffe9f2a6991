//! Error types for parameter validation and problem generation

use thiserror::Error;

use crate::problem::ProblemKind;

/// Errors raised while turning untyped input into typed problem parameters
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A mandatory key is absent from the parameter map
    #[error("missing key '{key}' for {kind}")]
    MissingKey { kind: ProblemKind, key: String },

    /// A key is present but its value cannot be coerced to the expected type
    #[error("key '{key}' for {kind} should be given as {expected}")]
    WrongType {
        kind: ProblemKind,
        key: String,
        expected: &'static str,
    },

    /// A key has the right type but an unusable value
    #[error("invalid value for key '{key}' of {kind}: {reason}")]
    InvalidValue {
        kind: ProblemKind,
        key: String,
        reason: String,
    },

    /// A problem type name that is not acknowledged
    #[error("unknown problem type '{0}'")]
    UnknownKind(String),

    /// Malformed setting in the generator configuration
    #[error("invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse configuration TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn missing(kind: ProblemKind, key: impl Into<String>) -> Self {
        Self::MissingKey {
            kind,
            key: key.into(),
        }
    }

    pub fn wrong_type(kind: ProblemKind, key: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            kind,
            key: key.into(),
            expected,
        }
    }

    pub fn invalid(kind: ProblemKind, key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            kind,
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn setting(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// The offending key, if the error is tied to one
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingKey { key, .. }
            | Self::WrongType { key, .. }
            | Self::InvalidValue { key, .. }
            | Self::InvalidSetting { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Errors raised by the problem generators
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The requested digit/range combination admits no instance
    #[error("infeasible {kind}: {reason}")]
    Infeasible { kind: ProblemKind, reason: String },

    /// Rejection sampling exhausted its attempt budget
    #[error("no valid {kind} found after {attempts} attempts")]
    SamplingNonTermination { kind: ProblemKind, attempts: u32 },

    /// A random number was requested with an unusable digit count
    #[error("cannot draw a number with {0} digits")]
    InvalidDigits(u32),
}

impl GenerationError {
    pub fn infeasible(kind: ProblemKind, reason: impl Into<String>) -> Self {
        Self::Infeasible {
            kind,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_names_key() {
        let err = ConfigError::missing(ProblemKind::Sequence, "nbitems");
        assert_eq!(err.to_string(), "missing key 'nbitems' for Sequence");
        assert_eq!(err.key(), Some("nbitems"));
    }

    #[test]
    fn test_wrong_type_names_expected() {
        let err = ConfigError::wrong_type(ProblemKind::Division, "nbqdigits", "an integer");
        assert!(err.to_string().contains("an integer"));
        assert!(err.to_string().contains("nbqdigits"));
    }

    #[test]
    fn test_infeasible_display() {
        let err = GenerationError::infeasible(ProblemKind::BasicOperation, "too many digits");
        assert_eq!(err.to_string(), "infeasible BasicOperation: too many digits");
    }
}
