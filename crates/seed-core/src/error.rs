//! Error types for Seedbed Core
//!
//! Provides error handling for:
//! - Reset failures (fatal to a reset-and-run call)
//! - Configuration loading and validation
//! - Catalog loading
//!
//! Per-unit store failures are not errors at this level: they are recorded
//! as [`crate::UnitOutcome::Failed`] and never cross a stage boundary.

use seed_catalog::CatalogError;
use seed_store::{EntityType, StoreError};
use std::path::PathBuf;

/// Main provisioning error type
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// A delete failed during reset; creation was not attempted
    #[error("reset aborted while deleting {entity}: {source}")]
    ResetAborted {
        /// Table whose delete failed
        entity: EntityType,
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid catalog
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl ProvisionError {
    /// Check if error ended a reset before any creation ran
    #[inline]
    #[must_use]
    pub fn is_reset_aborted(&self) -> bool {
        matches!(self, Self::ResetAborted { .. })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for the config schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    /// Create out-of-range error
    #[inline]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_aborted_display() {
        let err = ProvisionError::ResetAborted {
            entity: EntityType::Program,
            source: StoreError::Unavailable("connection refused".to_string()),
        };
        assert!(err.is_reset_aborted());
        assert!(err.to_string().contains("deleting programs"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn config_error_converts() {
        let err: ProvisionError = ConfigError::invalid("max_concurrent_units", "must be > 0").into();
        assert!(!err.is_reset_aborted());
        assert!(err.to_string().contains("max_concurrent_units"));
    }
}
