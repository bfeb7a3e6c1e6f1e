use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use seed_store::{
    EntityStore, EntityType, Filter, InMemoryStore, NaturalKey, Record, RecordId, StoreError,
    StoredRecord,
};
use std::collections::HashMap;

/// Store with read-after-write lag
///
/// A freshly inserted row stays invisible to the next `lag` queries of its
/// entity type, then shows up. Existence checks are not lagged.
#[derive(Debug)]
pub struct LaggyStore {
    inner: InMemoryStore,
    lag: usize,
    hidden: Mutex<HashMap<RecordId, (EntityType, usize)>>,
    queries: DashMap<EntityType, usize>,
}

impl LaggyStore {
    #[must_use]
    pub fn new(inner: InMemoryStore, lag: usize) -> Self {
        Self {
            inner,
            lag,
            hidden: Mutex::new(HashMap::new()),
            queries: DashMap::new(),
        }
    }

    #[must_use]
    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    /// Queries issued against one entity type
    #[must_use]
    pub fn queries(&self, entity: EntityType) -> usize {
        self.queries.get(&entity).map_or(0, |count| *count)
    }
}

#[async_trait]
impl EntityStore for LaggyStore {
    async fn exists(&self, key: &NaturalKey) -> Result<bool, StoreError> {
        self.inner.exists(key).await
    }

    async fn insert(&self, record: Record) -> Result<RecordId, StoreError> {
        let entity = record.entity_type();
        let id = self.inner.insert(record).await?;
        if self.lag > 0 {
            self.hidden.lock().insert(id, (entity, self.lag));
        }
        Ok(id)
    }

    async fn delete_all(&self, entity: EntityType) -> Result<u64, StoreError> {
        self.hidden.lock().retain(|_, (e, _)| *e != entity);
        self.inner.delete_all(entity).await
    }

    async fn query(
        &self,
        entity: EntityType,
        filter: &Filter,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        *self.queries.entry(entity).or_insert(0) += 1;
        let rows = self.inner.query(entity, filter).await?;

        let mut hidden = self.hidden.lock();
        let visible = rows
            .into_iter()
            .filter(|row| !hidden.contains_key(&row.id))
            .collect();
        for (e, remaining) in hidden.values_mut() {
            if *e == entity {
                *remaining -= 1;
            }
        }
        hidden.retain(|_, (_, remaining)| *remaining > 0);
        Ok(visible)
    }
}
