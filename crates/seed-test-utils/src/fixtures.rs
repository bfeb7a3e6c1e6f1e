use crate::clock::ManualClock;
use seed_catalog::{demo_accounts, SeedCatalog};
use seed_core::{Clock, PipelineConfig, ProvisioningPipeline};
use seed_store::{EntityStore, InMemoryStore, Record, User, UserRole};
use std::sync::Arc;

/// Pre-existing accounts the pipeline resolves students and recipients from
#[must_use]
pub fn demo_users() -> Vec<User> {
    let mut users = demo_accounts();
    // sorts after STUDENT_EMAIL, never picked
    users.push(User {
        email: "zeynep.student@example.com".to_string(),
        full_name: "Second Student".to_string(),
        role: UserRole::Student,
    });
    users
}

/// Empty store holding only the demo accounts
#[must_use]
pub fn store_with_users() -> InMemoryStore {
    let store = InMemoryStore::new();
    for user in demo_users() {
        store.insert_now(Record::User(user)).unwrap();
    }
    store
}

/// Pipeline over `store` and the standard catalog, driven by a manual clock
pub fn setup_pipeline(store: Arc<dyn EntityStore>) -> (ProvisioningPipeline, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let pipeline = ProvisioningPipeline::new(store, Arc::new(SeedCatalog::standard()))
        .with_config(PipelineConfig::default())
        .with_clock(Arc::clone(&clock) as Arc<dyn Clock>);
    (pipeline, clock)
}
