use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;
use seed_store::{
    EntityStore, EntityType, Filter, InMemoryStore, NaturalKey, Record, RecordId, StoreError,
    StoredRecord,
};

/// Insert attempt as seen by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertAttempt {
    pub entity: EntityType,
    /// References whose target row was absent when the insert was issued
    pub dangling: Vec<(EntityType, RecordId)>,
}

/// [`InMemoryStore`] wrapper with injectable failures
///
/// Faults are keyed by entity type or natural key. Every insert attempt is
/// logged together with any references that were dangling at that moment.
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: InMemoryStore,
    insert_faults: DashMap<EntityType, StoreError>,
    transient_insert_faults: DashMap<EntityType, (usize, StoreError)>,
    key_faults: DashMap<NaturalKey, StoreError>,
    delete_faults: DashMap<EntityType, StoreError>,
    query_faults: DashMap<EntityType, StoreError>,
    stale_exists: DashSet<EntityType>,
    calls: DashMap<&'static str, usize>,
    inserts: Mutex<Vec<InsertAttempt>>,
}

impl FaultyStore {
    #[must_use]
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Fail every insert of `entity`
    #[must_use]
    pub fn fail_inserts(self, entity: EntityType, error: StoreError) -> Self {
        self.insert_faults.insert(entity, error);
        self
    }

    /// Fail the next `count` inserts of `entity`, then let them through
    #[must_use]
    pub fn fail_first_inserts(self, entity: EntityType, count: usize, error: StoreError) -> Self {
        self.transient_insert_faults.insert(entity, (count, error));
        self
    }

    /// Fail the insert of the row with this natural key
    #[must_use]
    pub fn fail_insert_of(self, key: NaturalKey, error: StoreError) -> Self {
        self.key_faults.insert(key, error);
        self
    }

    #[must_use]
    pub fn fail_deletes(self, entity: EntityType, error: StoreError) -> Self {
        self.delete_faults.insert(entity, error);
        self
    }

    #[must_use]
    pub fn fail_queries(self, entity: EntityType, error: StoreError) -> Self {
        self.query_faults.insert(entity, error);
        self
    }

    /// `exists` always answers `false` for `entity`, so inserts of present
    /// keys hit the unique index as if another writer won the race
    #[must_use]
    pub fn stale_exists(self, entity: EntityType) -> Self {
        self.stale_exists.insert(entity);
        self
    }

    /// Remove every injected fault
    pub fn heal(&self) {
        self.insert_faults.clear();
        self.transient_insert_faults.clear();
        self.key_faults.clear();
        self.delete_faults.clear();
        self.query_faults.clear();
        self.stale_exists.clear();
    }

    /// Handle onto the wrapped tables
    #[must_use]
    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    /// Number of calls of one adapter operation
    #[must_use]
    pub fn calls(&self, op: &str) -> usize {
        self.calls.get(op).map_or(0, |count| *count)
    }

    /// Every insert attempt, in arrival order
    #[must_use]
    pub fn insert_attempts(&self) -> Vec<InsertAttempt> {
        self.inserts.lock().clone()
    }

    /// Insert attempts that referenced a missing parent row
    #[must_use]
    pub fn dangling_inserts(&self) -> usize {
        self.inserts
            .lock()
            .iter()
            .filter(|attempt| !attempt.dangling.is_empty())
            .count()
    }

    fn count_call(&self, op: &'static str) {
        *self.calls.entry(op).or_insert(0) += 1;
    }
}

#[async_trait]
impl EntityStore for FaultyStore {
    async fn exists(&self, key: &NaturalKey) -> Result<bool, StoreError> {
        self.count_call("exists");
        if self.stale_exists.contains(&key.entity_type()) {
            return Ok(false);
        }
        self.inner.exists(key).await
    }

    async fn insert(&self, record: Record) -> Result<RecordId, StoreError> {
        self.count_call("insert");
        let entity = record.entity_type();
        let dangling = record
            .references()
            .into_iter()
            .filter(|(parent, id)| !self.inner.contains(*parent, *id))
            .collect();
        self.inserts.lock().push(InsertAttempt { entity, dangling });

        if let Some(error) = self.insert_faults.get(&entity) {
            return Err(error.clone());
        }
        if let Some(mut fault) = self.transient_insert_faults.get_mut(&entity) {
            let (remaining, error) = &mut *fault;
            if *remaining > 0 {
                *remaining -= 1;
                return Err(error.clone());
            }
        }
        if let Some(key) = record.natural_key() {
            if let Some(error) = self.key_faults.get(&key) {
                return Err(error.clone());
            }
        }
        self.inner.insert(record).await
    }

    async fn delete_all(&self, entity: EntityType) -> Result<u64, StoreError> {
        self.count_call("delete_all");
        if let Some(error) = self.delete_faults.get(&entity) {
            return Err(error.clone());
        }
        self.inner.delete_all(entity).await
    }

    async fn query(
        &self,
        entity: EntityType,
        filter: &Filter,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        self.count_call("query");
        if let Some(error) = self.query_faults.get(&entity) {
            return Err(error.clone());
        }
        self.inner.query(entity, filter).await
    }
}
