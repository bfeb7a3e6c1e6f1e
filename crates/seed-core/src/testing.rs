//! Shared test doubles

use async_trait::async_trait;
use mockall::mock;
use seed_store::{
    EntityStore, EntityType, Filter, NaturalKey, Record, RecordId, StoreError, StoredRecord,
};

mock! {
    pub Store {}

    #[async_trait]
    impl EntityStore for Store {
        async fn exists(&self, key: &NaturalKey) -> Result<bool, StoreError>;
        async fn insert(&self, record: Record) -> Result<RecordId, StoreError>;
        async fn delete_all(&self, entity: EntityType) -> Result<u64, StoreError>;
        async fn query(
            &self,
            entity: EntityType,
            filter: &Filter,
        ) -> Result<Vec<StoredRecord>, StoreError>;
        async fn count(&self, entity: EntityType) -> Result<usize, StoreError>;
    }
}
