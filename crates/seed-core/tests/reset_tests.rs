use pretty_assertions::assert_eq;
use seed_store::{EntityType, StoreError};
use seed_test_utils::{setup_pipeline, store_with_users, FaultyStore};
use std::sync::Arc;

#[tokio::test]
async fn reset_twice_yields_identical_counts() {
    let store = store_with_users();
    let (pipeline, _clock) = setup_pipeline(Arc::new(store.clone()));
    pipeline.run_provisioning().await;

    let first = pipeline.reset_and_run_provisioning().await;
    let after_first = store.counts();
    let second = pipeline.reset_and_run_provisioning().await;
    let after_second = store.counts();

    assert!(first.success && second.success);
    assert_eq!(after_first, after_second);
    assert_eq!(after_first[&EntityType::University], 5);
    assert_eq!(after_first[&EntityType::Message], 3);
    // pre-existing accounts survive a reset
    assert_eq!(after_first[&EntityType::User], 3);
}

#[tokio::test]
async fn reset_reports_deleted_rows() {
    let store = store_with_users();
    let (pipeline, _clock) = setup_pipeline(Arc::new(store.clone()));
    pipeline.run_provisioning().await;

    let result = pipeline.reset_and_run_provisioning().await;

    assert_eq!(result.flag("reset"), Some(true));
    assert_eq!(result.count("universities_deleted"), Some(5));
    assert_eq!(result.count("programs_deleted"), Some(8));
    assert_eq!(result.count("notifications_deleted"), Some(3));
    // every row was recreated rather than skipped
    assert_eq!(result.count("universities_created"), Some(5));
    assert_eq!(result.count("universities_skipped"), Some(0));
    assert!(result.message.starts_with("Reset and provisioning completed"));

    let keys: Vec<&String> = result.details.keys().take(2).collect();
    assert_eq!(keys, vec!["reset", "notifications_deleted"]);
}

#[tokio::test]
async fn failed_delete_aborts_before_creation() {
    let inner = store_with_users();
    let (seed, _clock) = setup_pipeline(Arc::new(inner.clone()));
    seed.run_provisioning().await;

    let store = Arc::new(FaultyStore::new(inner.clone()).fail_deletes(
        EntityType::Program,
        StoreError::PermissionDenied("programs".into()),
    ));
    let (pipeline, _clock) = setup_pipeline(store.clone());

    let result = pipeline.reset_and_run_provisioning().await;

    assert!(!result.success);
    assert_eq!(result.flag("reset"), Some(false));
    assert_eq!(result.details.len(), 1);
    assert!(result.stages.is_empty());
    assert!(result.message.contains("deleting programs"));

    // children went first, parents were never touched, nothing was inserted
    assert_eq!(inner.len(EntityType::Application), 0);
    assert_eq!(inner.len(EntityType::Program), 8);
    assert_eq!(inner.len(EntityType::University), 5);
    assert_eq!(store.calls("insert"), 0);
    assert_eq!(store.calls("delete_all"), 4);
}

#[tokio::test]
async fn reset_recovers_after_heal() {
    let inner = store_with_users();
    let store = Arc::new(
        FaultyStore::new(inner.clone())
            .fail_deletes(EntityType::Setting, StoreError::Unavailable("down".into())),
    );
    let (pipeline, _clock) = setup_pipeline(store.clone());
    pipeline.run_provisioning().await;

    assert!(!pipeline.reset_and_run_provisioning().await.success);

    store.heal();
    let result = pipeline.reset_and_run_provisioning().await;
    assert!(result.success, "{}", result.message);
    assert_eq!(inner.len(EntityType::Setting), 6);
}
