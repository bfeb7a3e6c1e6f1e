//! Settling read between dependent stages
//!
//! Polls the parent table until every id created upstream in this run is
//! visible, backing off through the injected [`Clock`]. Exhausting the
//! attempt budget is not an error: the caller proceeds with what is
//! visible, and any missing parent surfaces later as a precondition skip.
//! Transient read failures share the same attempt budget.

use crate::clock::Clock;
use crate::config::SettleConfig;
use seed_store::{EntityStore, EntityType, Filter, RecordId, StoreError, StoredRecord};
use std::collections::HashSet;

/// Rows returned by a settling read
#[derive(Debug, Clone)]
pub struct Settled {
    /// Rows visible on the final read
    pub rows: Vec<StoredRecord>,
    /// Reads performed
    pub attempts: u32,
    /// Expected ids that never became visible
    pub missing: usize,
}

impl Settled {
    /// Check if every expected id was observed
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing == 0
    }
}

/// Bounded retry-with-backoff read
pub struct SettlingRead<'a> {
    store: &'a dyn EntityStore,
    clock: &'a dyn Clock,
    config: &'a SettleConfig,
}

impl<'a> SettlingRead<'a> {
    /// Create settling read
    #[must_use]
    pub fn new(store: &'a dyn EntityStore, clock: &'a dyn Clock, config: &'a SettleConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Read all rows of `entity`, retrying until `expected` are visible
    ///
    /// # Errors
    /// The first non-retryable store error, or the last retryable one once
    /// the attempts are spent
    pub async fn await_visible(
        &self,
        entity: EntityType,
        expected: &[RecordId],
    ) -> Result<Settled, StoreError> {
        let mut delay = self.config.initial_delay();
        let mut attempts = 0;

        loop {
            attempts += 1;
            let rows = match self.store.query(entity, &Filter::All).await {
                Ok(rows) => rows,
                Err(err) if err.is_retryable() && attempts < self.config.max_attempts => {
                    tracing::debug!("Retrying {} read in {:?}: {}", entity, delay, err);
                    self.clock.sleep(delay).await;
                    delay = self.config.next_delay(delay);
                    continue;
                }
                Err(err) => return Err(err),
            };
            let visible: HashSet<RecordId> = rows.iter().map(|row| row.id).collect();
            let missing = expected.iter().filter(|id| !visible.contains(id)).count();

            if missing == 0 {
                return Ok(Settled {
                    rows,
                    attempts,
                    missing,
                });
            }

            if attempts >= self.config.max_attempts {
                tracing::warn!(
                    "{} of {} {} rows still not visible after {} reads",
                    missing,
                    expected.len(),
                    entity,
                    attempts
                );
                return Ok(Settled {
                    rows,
                    attempts,
                    missing,
                });
            }

            tracing::debug!("Waiting {:?} for {} {} rows", delay, missing, entity);
            self.clock.sleep(delay).await;
            delay = self.config.next_delay(delay);
        }
    }
}
