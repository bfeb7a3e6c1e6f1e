//! Entity store adapter contract
//!
//! Abstracts existence-check, insert, bulk-delete and query against the
//! backing store. Implementations own transport, pooling and per-call
//! timeouts; callers only see [`StoreError`].

use crate::entity::{EntityType, RecordId};
use crate::error::StoreError;
use crate::record::{Filter, NaturalKey, Record, StoredRecord};
use async_trait::async_trait;
use std::sync::Arc;

/// Backing store operations used by the provisioning pipeline
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Check whether a row with this natural key exists
    async fn exists(&self, key: &NaturalKey) -> Result<bool, StoreError>;

    /// Insert a row and return its store-assigned id
    ///
    /// # Errors
    /// - `StoreError::UniqueViolation` if the natural key is taken
    /// - `StoreError::ForeignKeyViolation` if a referenced row is missing
    async fn insert(&self, record: Record) -> Result<RecordId, StoreError>;

    /// Delete every row of one entity type, returning the number removed
    async fn delete_all(&self, entity: EntityType) -> Result<u64, StoreError>;

    /// Select rows of one entity type
    async fn query(
        &self,
        entity: EntityType,
        filter: &Filter,
    ) -> Result<Vec<StoredRecord>, StoreError>;

    /// Number of rows of one entity type
    async fn count(&self, entity: EntityType) -> Result<usize, StoreError> {
        Ok(self.query(entity, &Filter::All).await?.len())
    }
}

#[async_trait]
impl<S: EntityStore + ?Sized> EntityStore for Arc<S> {
    async fn exists(&self, key: &NaturalKey) -> Result<bool, StoreError> {
        (**self).exists(key).await
    }

    async fn insert(&self, record: Record) -> Result<RecordId, StoreError> {
        (**self).insert(record).await
    }

    async fn delete_all(&self, entity: EntityType) -> Result<u64, StoreError> {
        (**self).delete_all(entity).await
    }

    async fn query(
        &self,
        entity: EntityType,
        filter: &Filter,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        (**self).query(entity, filter).await
    }

    async fn count(&self, entity: EntityType) -> Result<usize, StoreError> {
        (**self).count(entity).await
    }
}
