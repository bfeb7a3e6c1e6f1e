//! Store error types
//!
//! Adapter-level failures surfaced by [`crate::EntityStore`] implementations.

use crate::entity::EntityType;
use std::time::Duration;

/// Store adapter error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A row with the same natural key already exists
    #[error("unique violation on {entity}: {key}")]
    UniqueViolation {
        /// Table the insert targeted
        entity: EntityType,
        /// Rendered natural key
        key: String,
    },

    /// Referenced row does not exist, or is still referenced on delete
    #[error("foreign key violation on {entity}: {reference}")]
    ForeignKeyViolation {
        /// Table the operation targeted
        entity: EntityType,
        /// Description of the offending reference
        reference: String,
    },

    /// Connectivity failure
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Caller lacks the required privilege
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Per-call timeout elapsed
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// Any other constraint violation (check, not-null, ...)
    #[error("constraint violation: {0}")]
    Constraint(String),
}

impl StoreError {
    /// Insert lost a check-then-insert race on the natural key
    #[inline]
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }

    /// Transient failures that may succeed on a later call
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}
