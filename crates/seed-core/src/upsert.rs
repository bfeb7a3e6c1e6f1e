//! Idempotent upsert
//!
//! One check-then-insert primitive shared by every entity type:
//! 1. Compute the natural key of the candidate
//! 2. Skip if a row with that key exists
//! 3. Otherwise insert; a unique violation on insert means another writer
//!    won the race and is reclassified as a skip
//!
//! Append-only entities have no natural key and are inserted directly.
//! Never returns an error: every path ends in a [`UnitOutcome`].

use crate::outcome::{SkipReason, UnitOutcome};
use seed_store::{EntityStore, Record};
use std::sync::Arc;

/// Check-then-insert against one store
#[derive(Clone)]
pub struct IdempotentUpsert {
    store: Arc<dyn EntityStore>,
}

impl IdempotentUpsert {
    /// Create upsert bound to a store
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Create `record` unless its natural key is already present
    pub async fn apply(&self, record: Record) -> UnitOutcome {
        let Some(key) = record.natural_key() else {
            return self.append(record).await;
        };

        match self.store.exists(&key).await {
            Ok(true) => {
                return UnitOutcome::Skipped {
                    reason: SkipReason::Duplicate,
                }
            }
            Ok(false) => {}
            Err(error) => return UnitOutcome::Failed { error },
        }

        match self.store.insert(record).await {
            Ok(id) => UnitOutcome::Created { id },
            Err(error) if error.is_unique_violation() => {
                tracing::debug!("Lost insert race on {}", key);
                UnitOutcome::Skipped {
                    reason: SkipReason::LostRace,
                }
            }
            Err(error) => UnitOutcome::Failed { error },
        }
    }

    async fn append(&self, record: Record) -> UnitOutcome {
        match self.store.insert(record).await {
            Ok(id) => UnitOutcome::Created { id },
            Err(error) => UnitOutcome::Failed { error },
        }
    }
}

impl std::fmt::Debug for IdempotentUpsert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdempotentUpsert").finish_non_exhaustive()
    }
}
