//! Stage scheduler
//!
//! Runs the stages of [`Stage::ORDER`] one after another. Each stage:
//! - Reads the parent tables it resolves references against, through the
//!   settling read so rows created earlier in this run are visible
//! - Plans its units from the catalog
//! - Dispatches all units concurrently, bounded by `max_concurrent_units`
//! - Folds the unit outcomes into a [`StageReport`]
//!
//! A stage starts only after its prerequisites have completed, whether or
//! not they fully succeeded.

use crate::clock::Clock;
use crate::config::PipelineConfig;
use crate::outcome::{StageReport, UnitOutcome, UnitResult};
use crate::plan::{PlannedUnit, Resolver, StagePlanner};
use crate::settle::SettlingRead;
use crate::stage::Stage;
use crate::upsert::IdempotentUpsert;
use futures::stream::{self, StreamExt};
use seed_catalog::SeedCatalog;
use seed_store::{EntityStore, EntityType, RecordId, StoreError};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::Instrument;

/// Progress of one run across stages
#[derive(Debug, Default)]
pub struct RunState {
    created: HashMap<EntityType, Vec<RecordId>>,
    completed: HashSet<Stage>,
}

impl RunState {
    /// Create empty run state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids created this run for an entity type
    #[must_use]
    pub fn created(&self, entity: EntityType) -> &[RecordId] {
        self.created
            .get(&entity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Check if a stage has completed
    #[inline]
    #[must_use]
    pub fn is_completed(&self, stage: Stage) -> bool {
        self.completed.contains(&stage)
    }

    fn complete(&mut self, report: &StageReport) {
        self.created
            .entry(report.stage.entity_type())
            .or_default()
            .extend(report.created_ids.iter().copied());
        self.completed.insert(report.stage);
    }
}

/// Executes stages against one store
pub struct StageScheduler {
    store: Arc<dyn EntityStore>,
    catalog: Arc<SeedCatalog>,
    config: PipelineConfig,
    clock: Arc<dyn Clock>,
    upsert: IdempotentUpsert,
}

impl StageScheduler {
    /// Create scheduler
    #[must_use]
    pub fn new(
        store: Arc<dyn EntityStore>,
        catalog: Arc<SeedCatalog>,
        config: PipelineConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            upsert: IdempotentUpsert::new(Arc::clone(&store)),
            store,
            catalog,
            config,
            clock,
        }
    }

    /// Run every stage in order
    pub async fn run(&self) -> Vec<StageReport> {
        let mut state = RunState::new();
        let mut reports = Vec::with_capacity(Stage::ORDER.len());

        for stage in Stage::ORDER {
            let report = self.run_stage(stage, &mut state).await;
            reports.push(report);
        }

        reports
    }

    /// Run one stage whose prerequisites are complete in `state`
    pub async fn run_stage(&self, stage: Stage, state: &mut RunState) -> StageReport {
        debug_assert!(
            stage.prerequisites().iter().all(|p| state.is_completed(*p)),
            "{stage} started before its prerequisites"
        );

        let span = tracing::info_span!("stage", stage = %stage);
        let report = self.execute_stage(stage, state).instrument(span).await;
        state.complete(&report);
        report
    }

    async fn execute_stage(&self, stage: Stage, state: &RunState) -> StageReport {
        let entries = self.catalog.entry_count(stage.entity_type());
        if entries == 0 {
            tracing::debug!("No catalog entries for {}", stage);
            return StageReport::new(stage);
        }

        let resolver = match self.resolve(stage, state).await {
            Ok(resolver) => resolver,
            Err(error) => {
                tracing::error!("Planning {} failed: {}", stage, error);
                return StageReport::planning_failed(stage, entries, &error);
            }
        };

        let units = StagePlanner::new(&self.catalog, &resolver).plan(stage);
        tracing::debug!("Planned {} units", units.len());

        let results: Vec<UnitResult> = stream::iter(units)
            .map(|unit| self.dispatch(unit))
            .buffer_unordered(self.config.max_concurrent_units.max(1))
            .collect()
            .await;

        let report = StageReport::from_results(stage, results);
        tracing::info!(
            "Stage {} completed: {} created, {} skipped, {} failed",
            stage,
            report.succeeded,
            report.skipped,
            report.failed
        );
        report
    }

    /// Read every table the stage plans against
    async fn resolve(&self, stage: Stage, state: &RunState) -> Result<Resolver, StoreError> {
        let settle = SettlingRead::new(
            self.store.as_ref(),
            self.clock.as_ref(),
            &self.config.settle,
        );
        let mut resolver = Resolver::new();

        for entity in StagePlanner::reads(stage) {
            let settled = settle.await_visible(*entity, state.created(*entity)).await?;
            if settled.attempts > 1 {
                tracing::debug!("{} settled after {} reads", entity, settled.attempts);
            }
            resolver.absorb(&settled.rows);
        }

        Ok(resolver)
    }

    async fn dispatch(&self, unit: PlannedUnit) -> UnitResult {
        match unit {
            PlannedUnit::Upsert { label, record } => {
                let outcome = self.upsert.apply(record).await;
                match &outcome {
                    UnitOutcome::Created { id } => tracing::debug!("Created {} ({})", label, id),
                    UnitOutcome::Skipped { reason } => {
                        tracing::debug!("Skipped {}: {}", label, reason);
                    }
                    UnitOutcome::Failed { error } => tracing::warn!("Failed {}: {}", label, error),
                }
                UnitResult::new(label, outcome)
            }
            PlannedUnit::Skip { label, reason } => {
                tracing::debug!("Skipped {}: {}", label, reason);
                UnitResult::new(label, UnitOutcome::Skipped { reason })
            }
        }
    }
}

impl std::fmt::Debug for StageScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageScheduler")
            .field("catalog", &self.catalog.version)
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
