//! Aggregated provisioning result
//!
//! The single value handed back to callers. `details` is a flat ordered map
//! for display; `stages` carries the full per-stage reports.

use crate::error::ProvisionError;
use crate::outcome::StageReport;
use crate::reset::ResetReport;
use crate::stage::{Stage, SuccessPolicy};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value of one `details` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    Bool(bool),
    Count(u64),
}

impl From<bool> for DetailValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u64> for DetailValue {
    fn from(value: u64) -> Self {
        Self::Count(value)
    }
}

/// Outcome of `run_provisioning` / `reset_and_run_provisioning`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionResult {
    pub success: bool,
    pub message: String,
    pub details: IndexMap<String, DetailValue>,
    pub stages: Vec<StageReport>,
}

impl ProvisionResult {
    /// Build result from stage reports
    ///
    /// Success requires zero failed units in every required stage;
    /// best-effort failures only show up in `details`.
    #[must_use]
    pub fn from_reports(
        reports: Vec<StageReport>,
        policy: &SuccessPolicy,
        reset: Option<&ResetReport>,
    ) -> Self {
        let mut details = IndexMap::new();

        if let Some(reset) = reset {
            details.insert("reset".to_string(), DetailValue::Bool(true));
            for (stage, count) in &reset.deleted {
                details.insert(format!("{}_deleted", stage.key()), DetailValue::Count(*count));
            }
        }

        for report in &reports {
            let key = report.stage.key();
            details.insert(key.to_string(), report.is_clean().into());
            details.insert(format!("{key}_created"), report.succeeded.into());
            details.insert(format!("{key}_skipped"), report.skipped.into());
            details.insert(format!("{key}_failed"), report.failed.into());
        }

        let failed_required: Vec<&str> = reports
            .iter()
            .filter(|r| !r.is_clean() && policy.is_required(r.stage))
            .map(|r| r.stage.key())
            .collect();
        let failed_best_effort: Vec<&str> = reports
            .iter()
            .filter(|r| !r.is_clean() && !policy.is_required(r.stage))
            .map(|r| r.stage.key())
            .collect();

        let success = failed_required.is_empty();
        let created: u64 = reports.iter().map(|r| r.succeeded).sum();
        let skipped: u64 = reports.iter().map(|r| r.skipped).sum();

        let prefix = if reset.is_some() {
            "Reset and provisioning"
        } else {
            "Provisioning"
        };
        let mut message = if success {
            format!("{prefix} completed: {created} created, {skipped} skipped")
        } else {
            format!(
                "{prefix} failed in required stages: {}",
                failed_required.join(", ")
            )
        };
        if !failed_best_effort.is_empty() {
            message.push_str(&format!(
                "; best-effort stages with failures: {}",
                failed_best_effort.join(", ")
            ));
        }

        Self {
            success,
            message,
            details,
            stages: reports,
        }
    }

    /// Result of a reset that failed before creation ran
    #[must_use]
    pub fn reset_aborted(error: &ProvisionError) -> Self {
        let mut details = IndexMap::new();
        details.insert("reset".to_string(), DetailValue::Bool(false));

        Self {
            success: false,
            message: error.to_string(),
            details,
            stages: Vec::new(),
        }
    }

    /// Look up a detail entry
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<DetailValue> {
        self.details.get(key).copied()
    }

    /// Look up a boolean detail
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.detail(key)? {
            DetailValue::Bool(value) => Some(value),
            DetailValue::Count(_) => None,
        }
    }

    /// Look up a count detail
    #[must_use]
    pub fn count(&self, key: &str) -> Option<u64> {
        match self.detail(key)? {
            DetailValue::Count(value) => Some(value),
            DetailValue::Bool(_) => None,
        }
    }

    /// Report of one stage
    #[must_use]
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|r| r.stage == stage)
    }
}
