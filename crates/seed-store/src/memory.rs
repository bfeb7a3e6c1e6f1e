//! In-memory reference store
//!
//! Provides [`InMemoryStore`], a relational stand-in with one table per
//! entity type. Each table keeps its own unique index on the natural key.
//! Inserts enforce referential existence and `delete_all` uses RESTRICT
//! semantics, so a parent table cannot be emptied while children still
//! reference it.

use crate::adapter::EntityStore;
use crate::entity::{EntityType, RecordId};
use crate::error::StoreError;
use crate::record::{Filter, NaturalKey, Record, StoredRecord};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Thread-safe in-memory store
///
/// Cloning yields another handle onto the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    by_entity: HashMap<EntityType, Table>,
}

/// Rows of one entity type plus its natural-key index
#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<RecordId, StoredRecord>,
    unique: HashMap<NaturalKey, RecordId>,
}

impl Tables {
    fn table(&self, entity: EntityType) -> Option<&Table> {
        self.by_entity.get(&entity)
    }

    fn contains(&self, entity: EntityType, id: RecordId) -> bool {
        self.table(entity)
            .is_some_and(|t| t.rows.contains_key(&id))
    }

    /// Rows in other tables still pointing into `entity`
    fn dependents_of(&self, entity: EntityType) -> usize {
        self.by_entity
            .iter()
            .filter(|(child, _)| **child != entity)
            .flat_map(|(_, table)| table.rows.values())
            .filter(|row| row.record.references().iter().any(|(e, _)| *e == entity))
            .count()
    }
}

impl InMemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert synchronously; used by fixtures and the async adapter
    ///
    /// # Errors
    /// Same as [`EntityStore::insert`]
    pub fn insert_now(&self, record: Record) -> Result<RecordId, StoreError> {
        let entity = record.entity_type();
        let mut tables = self.tables.write();

        for (parent, id) in record.references() {
            if !tables.contains(parent, id) {
                return Err(StoreError::ForeignKeyViolation {
                    entity,
                    reference: format!("{parent} row {id} does not exist"),
                });
            }
        }

        let key = record.natural_key();
        let table = tables.by_entity.entry(entity).or_default();
        if let Some(key) = &key {
            if table.unique.contains_key(key) {
                return Err(StoreError::UniqueViolation {
                    entity,
                    key: key.to_string(),
                });
            }
        }

        let id = RecordId::new();
        if let Some(key) = key {
            table.unique.insert(key, id);
        }
        table.rows.insert(
            id,
            StoredRecord {
                id,
                created_at: Utc::now(),
                record,
            },
        );
        Ok(id)
    }

    /// Row counts per entity type, including empty tables
    #[must_use]
    pub fn counts(&self) -> BTreeMap<EntityType, usize> {
        let tables = self.tables.read();
        EntityType::ALL
            .into_iter()
            .map(|e| (e, tables.table(e).map_or(0, |t| t.rows.len())))
            .collect()
    }

    /// Row count of one entity type
    #[must_use]
    pub fn len(&self, entity: EntityType) -> usize {
        self.tables.read().table(entity).map_or(0, |t| t.rows.len())
    }

    /// Check whether a row id is present
    #[must_use]
    pub fn contains(&self, entity: EntityType, id: RecordId) -> bool {
        self.tables.read().contains(entity, id)
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn exists(&self, key: &NaturalKey) -> Result<bool, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .table(key.entity_type())
            .is_some_and(|t| t.unique.contains_key(key)))
    }

    async fn insert(&self, record: Record) -> Result<RecordId, StoreError> {
        self.insert_now(record)
    }

    async fn delete_all(&self, entity: EntityType) -> Result<u64, StoreError> {
        let mut tables = self.tables.write();

        let dependents = tables.dependents_of(entity);
        if dependents > 0 && tables.table(entity).is_some_and(|t| !t.rows.is_empty()) {
            return Err(StoreError::ForeignKeyViolation {
                entity,
                reference: format!("still referenced by {dependents} row(s)"),
            });
        }

        let removed = tables
            .by_entity
            .remove(&entity)
            .map_or(0, |t| t.rows.len());
        Ok(removed as u64)
    }

    async fn query(
        &self,
        entity: EntityType,
        filter: &Filter,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        let tables = self.tables.read();
        let Some(table) = tables.table(entity) else {
            return Ok(Vec::new());
        };

        let rows = match filter {
            Filter::NaturalKey(key) => table
                .unique
                .get(key)
                .and_then(|id| table.rows.get(id))
                .cloned()
                .into_iter()
                .collect(),
            _ => table
                .rows
                .values()
                .filter(|row| filter.matches(&row.record))
                .cloned()
                .collect(),
        };
        Ok(rows)
    }

    async fn count(&self, entity: EntityType) -> Result<usize, StoreError> {
        Ok(self.len(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{DegreeType, UserRole};
    use crate::record::{Program, University, User};

    fn university(name: &str) -> Record {
        Record::University(University {
            name: name.to_string(),
            name_local: name.to_string(),
            country: "Turkey".to_string(),
            city: "Ankara".to_string(),
            founded_year: 1956,
            website: "https://example.edu.tr".to_string(),
            is_active: true,
        })
    }

    fn program(name: &str, university_id: RecordId) -> Record {
        Record::Program(Program {
            name: name.to_string(),
            name_local: name.to_string(),
            university_id,
            degree_type: DegreeType::Master,
            language: "English".to_string(),
            duration_years: 2,
            tuition_fee: 3000,
            quota: 30,
            is_active: true,
        })
    }

    #[tokio::test]
    async fn insert_then_exists() {
        let store = InMemoryStore::new();
        let record = university("METU");
        let key = record.natural_key().unwrap();

        assert!(!store.exists(&key).await.unwrap());
        store.insert(record).await.unwrap();
        assert!(store.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_natural_key_is_rejected() {
        let store = InMemoryStore::new();
        store.insert(university("METU")).await.unwrap();

        let err = store.insert(university("METU")).await.unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(store.len(EntityType::University), 1);
    }

    #[tokio::test]
    async fn insert_requires_existing_parent() {
        let store = InMemoryStore::new();
        let err = store
            .insert(program("Physics", RecordId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { .. }));
        assert_eq!(store.len(EntityType::Program), 0);
    }

    #[tokio::test]
    async fn delete_all_restricts_referenced_parents() {
        let store = InMemoryStore::new();
        let uni = store.insert(university("METU")).await.unwrap();
        store.insert(program("Physics", uni)).await.unwrap();

        let err = store.delete_all(EntityType::University).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { .. }));

        assert_eq!(store.delete_all(EntityType::Program).await.unwrap(), 1);
        assert_eq!(store.delete_all(EntityType::University).await.unwrap(), 1);
        assert_eq!(store.delete_all(EntityType::University).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn query_by_field_and_natural_key() {
        let store = InMemoryStore::new();
        store
            .insert(Record::User(User {
                email: "ayse@example.com".to_string(),
                full_name: "Ayşe Yılmaz".to_string(),
                role: UserRole::Student,
            }))
            .await
            .unwrap();
        store
            .insert(Record::User(User {
                email: "admin@example.com".to_string(),
                full_name: "Admin".to_string(),
                role: UserRole::Admin,
            }))
            .await
            .unwrap();

        let students = store
            .query(EntityType::User, &Filter::field("role", "student"))
            .await
            .unwrap();
        assert_eq!(students.len(), 1);

        let key = NaturalKey::User {
            email: "admin@example.com".to_string(),
        };
        let admins = store
            .query(EntityType::User, &Filter::NaturalKey(key))
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(store.count(EntityType::User).await.unwrap(), 2);
    }

    #[test]
    fn counts_cover_every_table() {
        let store = InMemoryStore::new();
        let counts = store.counts();
        assert_eq!(counts.len(), EntityType::ALL.len());
        assert!(counts.values().all(|c| *c == 0));
    }
}
