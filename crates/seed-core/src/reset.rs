//! Reset controller
//!
//! Deletes every provisioned table, children before parents, in the exact
//! reverse of [`Stage::ORDER`]. The first failed delete aborts the reset:
//! no further tables are touched and creation must not run.

use crate::error::ProvisionError;
use crate::stage::Stage;
use seed_store::EntityStore;
use std::sync::Arc;

/// Rows removed per stage, in deletion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub deleted: Vec<(Stage, u64)>,
}

impl ResetReport {
    /// Rows removed for one stage
    #[must_use]
    pub fn deleted(&self, stage: Stage) -> Option<u64> {
        self.deleted
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, count)| *count)
    }

    /// Rows removed across all stages
    #[must_use]
    pub fn total(&self) -> u64 {
        self.deleted.iter().map(|(_, count)| count).sum()
    }
}

/// Fail-fast reverse-order deleter
pub struct ResetController {
    store: Arc<dyn EntityStore>,
}

impl ResetController {
    /// Create controller over a store
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Delete all provisioned rows
    ///
    /// # Errors
    /// `ProvisionError::ResetAborted` naming the table whose delete failed
    pub async fn reset(&self) -> Result<ResetReport, ProvisionError> {
        let mut report = ResetReport::default();

        for stage in Stage::reset_order() {
            let entity = stage.entity_type();
            match self.store.delete_all(entity).await {
                Ok(count) => {
                    tracing::info!("Deleted {} {} rows", count, entity);
                    report.deleted.push((stage, count));
                }
                Err(source) => {
                    tracing::error!("Reset aborted deleting {}: {}", entity, source);
                    return Err(ProvisionError::ResetAborted { entity, source });
                }
            }
        }

        Ok(report)
    }
}

impl std::fmt::Debug for ResetController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetController").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockStore;
    use mockall::Sequence;
    use seed_store::{EntityType, StoreError};

    #[tokio::test]
    async fn deletes_children_before_parents() {
        let mut store = MockStore::new();
        let mut seq = Sequence::new();
        for stage in Stage::reset_order() {
            store
                .expect_delete_all()
                .withf(move |entity| *entity == stage.entity_type())
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(2));
        }

        let report = ResetController::new(Arc::new(store)).reset().await.unwrap();
        assert_eq!(report.deleted.len(), 7);
        assert_eq!(report.deleted[0].0, Stage::Notifications);
        assert_eq!(report.deleted(Stage::Universities), Some(2));
        assert_eq!(report.total(), 14);
    }

    #[tokio::test]
    async fn first_failure_stops_the_reset() {
        let mut store = MockStore::new();
        store
            .expect_delete_all()
            .withf(|entity| {
                matches!(entity, EntityType::Notification | EntityType::Message)
            })
            .returning(|_| Ok(0));
        store
            .expect_delete_all()
            .withf(|entity| *entity == EntityType::Application)
            .times(1)
            .returning(|_| Err(StoreError::PermissionDenied("applications".to_string())));
        // programs, settings and universities must never be reached
        store
            .expect_delete_all()
            .withf(|entity| {
                !matches!(
                    entity,
                    EntityType::Notification | EntityType::Message | EntityType::Application
                )
            })
            .never();

        let err = ResetController::new(Arc::new(store)).reset().await.unwrap_err();
        assert!(err.is_reset_aborted());
        assert!(matches!(
            err,
            ProvisionError::ResetAborted {
                entity: EntityType::Application,
                ..
            }
        ));
    }
}
