//! Pipeline configuration
//!
//! All fields have defaults, so an empty TOML document is a valid config.
//!
//! ```toml
//! max_concurrent_units = 4
//! required_stages = ["universities", "settings"]
//!
//! [settle]
//! initial_delay_ms = 25
//! max_attempts = 8
//! ```

use crate::error::ConfigError;
use crate::stage::{Stage, SuccessPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Upper bound on units of one stage in flight at once
    pub max_concurrent_units: usize,
    /// Settling read between dependent stages
    pub settle: SettleConfig,
    /// Stages whose failures make the run unsuccessful
    pub required_stages: Vec<Stage>,
}

impl PipelineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With max concurrent units
    #[inline]
    #[must_use]
    pub fn with_max_concurrent_units(mut self, max: usize) -> Self {
        self.max_concurrent_units = max;
        self
    }

    /// With settling read configuration
    #[inline]
    #[must_use]
    pub fn with_settle(mut self, settle: SettleConfig) -> Self {
        self.settle = settle;
        self
    }

    /// With required stages
    #[inline]
    #[must_use]
    pub fn with_required_stages(mut self, stages: impl IntoIterator<Item = Stage>) -> Self {
        self.required_stages = stages.into_iter().collect();
        self
    }

    /// Success policy derived from `required_stages`
    #[must_use]
    pub fn success_policy(&self) -> SuccessPolicy {
        SuccessPolicy::new(self.required_stages.iter().copied())
    }

    /// Parse and validate a TOML config
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed input, `ConfigError::InvalidValue`
    /// if a value is out of range
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`PipelineConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// The first out-of-range value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_units == 0 {
            return Err(ConfigError::invalid("max_concurrent_units", "must be at least 1"));
        }
        self.settle.validate()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_units: 8,
            settle: SettleConfig::default(),
            required_stages: SuccessPolicy::DEFAULT_REQUIRED.to_vec(),
        }
    }
}

/// Bounded retry-with-backoff read used between dependent stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleConfig {
    /// Delay before the second read
    pub initial_delay_ms: u64,
    /// Growth factor applied after each miss
    pub multiplier: f64,
    /// Cap on a single delay
    pub max_delay_ms: u64,
    /// Total reads, including the first
    pub max_attempts: u32,
}

impl SettleConfig {
    /// Largest accepted growth factor
    pub const MAX_MULTIPLIER: f64 = 16.0;

    /// Delay before the second read
    #[inline]
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Cap on a single delay
    #[inline]
    #[must_use]
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Delay following a given delay, never above [`SettleConfig::max_delay`]
    ///
    /// Total for any multiplier: a product that is not a representable
    /// duration (overflow, NaN, negative) is clamped to the cap.
    #[must_use]
    pub fn next_delay(&self, current: Duration) -> Duration {
        let max = self.max_delay();
        Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .map_or(max, |next| next.min(max))
    }

    /// Check value ranges
    ///
    /// # Errors
    /// The first out-of-range value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid("settle.max_attempts", "must be at least 1"));
        }
        if !(1.0..=Self::MAX_MULTIPLIER).contains(&self.multiplier) {
            return Err(ConfigError::invalid(
                "settle.multiplier",
                format!(
                    "must be within 1.0..={}, got {}",
                    Self::MAX_MULTIPLIER,
                    self.multiplier
                ),
            ));
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err(ConfigError::invalid(
                "settle.max_delay_ms",
                "must not be below initial_delay_ms",
            ));
        }
        Ok(())
    }
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 50,
            multiplier: 2.0,
            max_delay_ms: 1_000,
            max_attempts: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.max_concurrent_units, 8);
        assert_eq!(config.settle.max_attempts, 5);
    }

    #[test]
    fn parses_partial_document() {
        let config = PipelineConfig::from_toml_str(
            r#"
max_concurrent_units = 2
required_stages = ["universities", "programs"]

[settle]
max_attempts = 9
"#,
        )
        .unwrap();

        assert_eq!(config.max_concurrent_units, 2);
        assert_eq!(config.settle.max_attempts, 9);
        assert_eq!(config.settle.initial_delay_ms, 50);
        let policy = config.success_policy();
        assert!(policy.is_required(Stage::Programs));
        assert!(!policy.is_required(Stage::Settings));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let err = PipelineConfig::from_toml_str("max_concurrent_units = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "max_concurrent_units",
                ..
            }
        ));
    }

    #[test]
    fn rejects_shrinking_backoff() {
        let err = PipelineConfig::from_toml_str("[settle]\nmultiplier = 0.5").unwrap_err();
        assert!(err.to_string().contains("settle.multiplier"));
    }

    #[test]
    fn rejects_runaway_backoff() {
        for text in ["[settle]\nmultiplier = 1e300", "[settle]\nmultiplier = nan"] {
            let err = PipelineConfig::from_toml_str(text).unwrap_err();
            assert!(err.to_string().contains("settle.multiplier"), "{text}");
        }
    }

    #[test]
    fn next_delay_clamps_unrepresentable_products() {
        let cap = Duration::from_millis(1_000);
        for multiplier in [1e300, f64::INFINITY, f64::NAN, -2.0] {
            let settle = SettleConfig {
                multiplier,
                ..SettleConfig::default()
            };
            assert_eq!(settle.next_delay(Duration::from_millis(50)), cap, "{multiplier}");
            assert_eq!(settle.next_delay(Duration::MAX), cap, "{multiplier}");
        }
    }

    #[test]
    fn rejects_unknown_stage() {
        let err = PipelineConfig::from_toml_str("required_stages = [\"users\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn backoff_grows_and_caps() {
        let settle = SettleConfig::default();
        let d1 = settle.initial_delay();
        let d2 = settle.next_delay(d1);
        assert_eq!(d2, Duration::from_millis(100));

        let mut delay = d1;
        for _ in 0..20 {
            delay = settle.next_delay(delay);
        }
        assert_eq!(delay, settle.max_delay());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_concurrent_units = 3").unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.max_concurrent_units, 3);

        let missing = PipelineConfig::load("/no/such/seedbed.toml").unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn builder_methods() {
        let config = PipelineConfig::new()
            .with_max_concurrent_units(1)
            .with_required_stages([Stage::Universities]);
        assert_eq!(config.max_concurrent_units, 1);
        assert!(!config.success_policy().is_required(Stage::Settings));
    }
}
