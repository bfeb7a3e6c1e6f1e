//! Unit outcomes and stage aggregation
//!
//! Every unit of work returns a typed [`UnitOutcome`]; nothing is thrown.
//! [`StageReport`] folds a stage's outcomes into counts. The fold is
//! commutative: completion order of concurrent units never changes the
//! resulting report.

use crate::stage::Stage;
use seed_store::{RecordId, StoreError};
use serde::Serialize;
use std::fmt;

/// Why a unit did not insert anything
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Natural key already present
    Duplicate,
    /// Existence check passed but insert hit the unique index
    LostRace,
    /// Append-only rows already seeded for the owning parent
    AlreadySeeded,
    /// Parent rows needed by the unit are unavailable
    PreconditionUnmet(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Duplicate => f.write_str("already exists"),
            SkipReason::LostRace => f.write_str("created concurrently"),
            SkipReason::AlreadySeeded => f.write_str("already seeded"),
            SkipReason::PreconditionUnmet(why) => write!(f, "precondition unmet: {why}"),
        }
    }
}

/// Result of one attempt-create-one-record unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Row inserted
    Created { id: RecordId },
    /// Nothing inserted, not an error
    Skipped { reason: SkipReason },
    /// Store failure, retained for diagnostics
    Failed { error: StoreError },
}

impl UnitOutcome {
    /// Check if a row was inserted
    #[inline]
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    /// Check if the unit was skipped
    #[inline]
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Check if the unit failed
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome tagged with a human-readable unit label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitResult {
    pub label: String,
    pub outcome: UnitOutcome,
}

impl UnitResult {
    /// Create unit result
    #[inline]
    pub fn new(label: impl Into<String>, outcome: UnitOutcome) -> Self {
        Self {
            label: label.into(),
            outcome,
        }
    }
}

/// Aggregated outcome of one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub succeeded: u64,
    pub skipped: u64,
    pub failed: u64,
    /// Units skipped because their parents were unavailable
    pub precondition_unmet: u64,
    /// `label: error` for every failed unit, sorted
    pub errors: Vec<String>,
    /// Ids of rows created by this stage, sorted
    pub created_ids: Vec<RecordId>,
}

impl StageReport {
    /// Create empty report
    #[must_use]
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            succeeded: 0,
            skipped: 0,
            failed: 0,
            precondition_unmet: 0,
            errors: Vec::new(),
            created_ids: Vec::new(),
        }
    }

    /// Fold unit results into a report
    pub fn from_results(stage: Stage, results: impl IntoIterator<Item = UnitResult>) -> Self {
        let mut report = Self::new(stage);
        for result in results {
            report.record(result);
        }
        report.normalize();
        report
    }

    /// Report for a stage whose planning read failed: every unit fails
    #[must_use]
    pub fn planning_failed(stage: Stage, units: usize, error: &StoreError) -> Self {
        Self::from_results(
            stage,
            (0..units).map(|idx| {
                UnitResult::new(
                    format!("{stage}#{idx}"),
                    UnitOutcome::Failed {
                        error: error.clone(),
                    },
                )
            }),
        )
    }

    /// Add one unit result
    pub fn record(&mut self, result: UnitResult) {
        match result.outcome {
            UnitOutcome::Created { id } => {
                self.succeeded += 1;
                self.created_ids.push(id);
            }
            UnitOutcome::Skipped { reason } => {
                self.skipped += 1;
                if matches!(reason, SkipReason::PreconditionUnmet(_)) {
                    self.precondition_unmet += 1;
                }
            }
            UnitOutcome::Failed { error } => {
                self.failed += 1;
                self.errors.push(format!("{}: {}", result.label, error));
            }
        }
    }

    fn normalize(&mut self) {
        self.errors.sort_unstable();
        self.created_ids.sort_unstable();
    }

    /// Total units attempted
    #[inline]
    #[must_use]
    pub fn total(&self) -> u64 {
        self.succeeded + self.skipped + self.failed
    }

    /// Check if no unit failed
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
