//! Stages and success policy
//!
//! A stage groups the creation of one entity type. Stages run in the fixed
//! order of [`Stage::ORDER`]; reset deletes in exactly the reverse order.

use seed_store::EntityType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Provisioning stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Universities,
    Settings,
    FileSettings,
    Programs,
    Applications,
    Messages,
    Notifications,
}

impl Stage {
    /// Creation order
    pub const ORDER: [Stage; 7] = [
        Stage::Universities,
        Stage::Settings,
        Stage::FileSettings,
        Stage::Programs,
        Stage::Applications,
        Stage::Messages,
        Stage::Notifications,
    ];

    /// Entity type created by this stage
    #[must_use]
    pub fn entity_type(self) -> EntityType {
        match self {
            Stage::Universities => EntityType::University,
            Stage::Settings => EntityType::Setting,
            Stage::FileSettings => EntityType::FileSetting,
            Stage::Programs => EntityType::Program,
            Stage::Applications => EntityType::Application,
            Stage::Messages => EntityType::Message,
            Stage::Notifications => EntityType::Notification,
        }
    }

    /// Stages that must have completed before this one starts
    #[must_use]
    pub fn prerequisites(self) -> &'static [Stage] {
        match self {
            Stage::Universities | Stage::Settings | Stage::FileSettings | Stage::Notifications => {
                &[]
            }
            Stage::Programs => &[Stage::Universities],
            Stage::Applications => &[Stage::Universities, Stage::Programs],
            Stage::Messages => &[Stage::Applications],
        }
    }

    /// Key under which the stage is reported in result details
    #[must_use]
    pub fn key(self) -> &'static str {
        self.entity_type().table_name()
    }

    /// Reset order: children before parents
    pub fn reset_order() -> impl Iterator<Item = Stage> {
        Self::ORDER.into_iter().rev()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How a stage's failures affect overall success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePolicy {
    /// Any failed unit makes the run unsuccessful
    Required,
    /// Failures are reported but do not flip success
    BestEffort,
}

/// Maps stages to their [`StagePolicy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessPolicy {
    required: HashSet<Stage>,
}

impl SuccessPolicy {
    /// Stages required by default
    pub const DEFAULT_REQUIRED: [Stage; 3] =
        [Stage::Universities, Stage::Settings, Stage::FileSettings];

    /// Create policy with an explicit required set
    #[must_use]
    pub fn new(required: impl IntoIterator<Item = Stage>) -> Self {
        Self {
            required: required.into_iter().collect(),
        }
    }

    /// Policy of one stage
    #[inline]
    #[must_use]
    pub fn policy(&self, stage: Stage) -> StagePolicy {
        if self.required.contains(&stage) {
            StagePolicy::Required
        } else {
            StagePolicy::BestEffort
        }
    }

    /// Check if stage is required
    #[inline]
    #[must_use]
    pub fn is_required(&self, stage: Stage) -> bool {
        self.policy(stage) == StagePolicy::Required
    }
}

impl Default for SuccessPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_REQUIRED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prerequisites_precede_dependents() {
        for (idx, stage) in Stage::ORDER.iter().enumerate() {
            for prereq in stage.prerequisites() {
                let prereq_idx = Stage::ORDER.iter().position(|s| s == prereq).unwrap();
                assert!(prereq_idx < idx, "{prereq} must run before {stage}");
            }
        }
    }

    #[test]
    fn reset_order_is_reverse_of_creation() {
        let reset: Vec<_> = Stage::reset_order().collect();
        assert_eq!(reset.first(), Some(&Stage::Notifications));
        assert_eq!(reset.last(), Some(&Stage::Universities));

        let programs = reset.iter().position(|s| *s == Stage::Programs).unwrap();
        let universities = reset.iter().position(|s| *s == Stage::Universities).unwrap();
        assert!(programs < universities);
    }

    #[test]
    fn keys_match_serde_names() {
        for stage in Stage::ORDER {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.key()));
        }
    }

    #[test]
    fn default_policy_splits_required_and_best_effort() {
        let policy = SuccessPolicy::default();
        assert!(policy.is_required(Stage::Universities));
        assert!(policy.is_required(Stage::Settings));
        assert!(policy.is_required(Stage::FileSettings));
        assert_eq!(policy.policy(Stage::Programs), StagePolicy::BestEffort);
        assert_eq!(policy.policy(Stage::Notifications), StagePolicy::BestEffort);
    }
}
