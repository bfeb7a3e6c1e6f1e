use pretty_assertions::assert_eq;
use seed_core::{PipelineConfig, SettleConfig, Stage};
use seed_store::EntityType;
use seed_test_utils::{setup_pipeline, store_with_users, LaggyStore};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn lagging_parents_are_awaited_with_backoff() {
    let store = Arc::new(LaggyStore::new(store_with_users(), 2));
    let (pipeline, clock) = setup_pipeline(store.clone());

    let result = pipeline.run_provisioning().await;

    assert!(result.success, "{}", result.message);
    assert_eq!(store.inner().len(EntityType::Program), 8);
    assert_eq!(store.inner().len(EntityType::Application), 2);
    assert_eq!(store.inner().len(EntityType::Message), 3);

    // programs, applications and messages each wait out two hidden reads
    let sleeps = clock.sleeps();
    assert_eq!(sleeps.len(), 6);
    assert_eq!(sleeps[0], Duration::from_millis(50));
    assert_eq!(sleeps[1], Duration::from_millis(100));
}

#[tokio::test]
async fn exhausted_settling_degrades_to_precondition_skips() {
    let store = Arc::new(LaggyStore::new(store_with_users(), 10));
    let (pipeline, clock) = setup_pipeline(store.clone());
    let pipeline = pipeline.with_config(PipelineConfig::default().with_settle(SettleConfig {
        max_attempts: 3,
        ..SettleConfig::default()
    }));

    let result = pipeline.run_provisioning().await;

    let programs = result.stage(Stage::Programs).unwrap();
    assert_eq!(programs.precondition_unmet, 8);
    assert_eq!(programs.failed, 0);
    assert_eq!(store.inner().len(EntityType::Program), 0);
    // still a success: only best-effort stages came up short
    assert!(result.success);
    assert_eq!(
        &clock.sleeps()[..2],
        &[Duration::from_millis(50), Duration::from_millis(100)]
    );
}

#[tokio::test]
async fn immediate_visibility_never_sleeps() {
    let store = Arc::new(LaggyStore::new(store_with_users(), 0));
    let (pipeline, clock) = setup_pipeline(store);

    let result = pipeline.run_provisioning().await;

    assert!(result.success);
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn oversized_backoff_multiplier_is_capped() {
    let store = Arc::new(LaggyStore::new(store_with_users(), 2));
    let (pipeline, clock) = setup_pipeline(store.clone());
    // builder setters do not validate; the delay must stay bounded anyway
    let pipeline = pipeline.with_config(PipelineConfig::default().with_settle(SettleConfig {
        multiplier: 1e300,
        max_attempts: 3,
        ..SettleConfig::default()
    }));

    let result = pipeline.run_provisioning().await;

    assert!(result.success, "{}", result.message);
    assert_eq!(store.inner().len(EntityType::Message), 3);
    let sleeps = clock.sleeps();
    assert_eq!(sleeps.len(), 6);
    assert_eq!(sleeps[0], Duration::from_millis(50));
    assert_eq!(sleeps[1], Duration::from_secs(1));
}
