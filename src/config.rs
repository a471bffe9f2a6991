//! Generator configuration loaded from TOML
//!
//! A configuration has a `[generation]` table steering the generators and a
//! `[layout]` table sizing the drawings. Missing tables and keys fall back to
//! the embedded defaults.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::geometry::SizingContext;

/// Configuration document spelling out the default values
pub const DEFAULT_CONFIG: &str = r#"
[generation]
# Rejection-sampling budget per instance
max_attempts = 100000
# Fail instead of clamping unreachable division quotient digit counts
strict_division = false
# seed = 42

[layout]
char_width = 0.5
line_height = 0.7
margin_x = 1.0
margin_y = 0.5
"#;

/// Settings shared by all generators
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationSettings {
    /// Samples drawn before giving up on an instance
    pub max_attempts: u32,

    /// Reject division digit counts the operands cannot produce
    pub strict_division: bool,

    /// Seed for a deterministic random source
    pub seed: Option<u64>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_attempts: 100_000,
            strict_division: false,
            seed: None,
        }
    }
}

/// Complete configuration of a generation run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub generation: GenerationSettings,
    pub layout: SizingContext,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generation: GenerationSettings::default(),
            layout: SizingContext::default(),
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.max_attempts == 0 {
            return Err(ConfigError::setting(
                "generation.max_attempts",
                "at least one attempt is needed",
            ));
        }
        self.layout
            .validate()
            .map_err(|err| ConfigError::setting("layout", err.to_string()))
    }

    /// Random source for a run: seeded when a seed is configured
    pub fn rng(&self) -> StdRng {
        match self.generation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.generation.seed = Some(seed);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.generation.max_attempts = max_attempts;
        self
    }

    pub fn with_strict_division(mut self, strict: bool) -> Self {
        self.generation.strict_division = strict;
        self
    }

    pub fn with_sizing(mut self, sizing: SizingContext) -> Self {
        self.layout = sizing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::Rng;

    #[test]
    fn test_embedded_default_matches_default_values() {
        let config = GeneratorConfig::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.generation, GenerationSettings::default());
        assert_eq!(config.layout, SizingContext::default());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(GeneratorConfig::from_str("").unwrap(), GeneratorConfig::new());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = GeneratorConfig::from_str(
            r#"
            [generation]
            strict_division = true
            seed = 7
            "#,
        )
        .unwrap();
        assert!(config.generation.strict_division);
        assert_eq!(config.generation.seed, Some(7));
        assert_eq!(config.generation.max_attempts, 100_000);
        assert_eq!(config.layout, SizingContext::default());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let err = GeneratorConfig::from_str("[generation]\nmax_attempts = 0\n").unwrap_err();
        assert_eq!(err.key(), Some("generation.max_attempts"));

        let err = GeneratorConfig::from_str("[layout]\nmargin_y = 3.0\n").unwrap_err();
        assert!(err.to_string().contains("margin_y"));

        let err = GeneratorConfig::from_str("[generation]\nretries = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let config = GeneratorConfig::new().with_seed(99);
        let a: Vec<u32> = (0..5).map(|_| config.rng().random()).collect();
        let mut first = config.rng();
        let mut second = config.rng();
        let b: Vec<u32> = (0..5).map(|_| first.random()).collect();
        let c: Vec<u32> = (0..5).map(|_| second.random()).collect();
        assert_eq!(b, c);
        assert!(a.iter().all(|v| *v == a[0]));
    }

    #[test]
    fn test_builders() {
        let config = GeneratorConfig::new()
            .with_max_attempts(10)
            .with_strict_division(true)
            .with_sizing(SizingContext::new().with_margins(1.5, 1.5));
        assert_eq!(config.generation.max_attempts, 10);
        assert!(config.generation.strict_division);
        assert_eq!(config.layout.margin_x, 1.5);
    }
}
