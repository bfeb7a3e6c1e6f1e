//! Seedbed Core - staged, idempotent provisioning pipeline
//!
//! Populates a store with the records of a [`SeedCatalog`]:
//! - Runs stages in a fixed dependency order, units within a stage concurrently
//! - Skips records whose natural key already exists
//! - Contains failures to the unit that produced them
//! - Optionally resets the store first, children before parents
//! - Folds everything into one [`ProvisionResult`]
//!
//! # Example
//!
//! ```rust
//! use seed_core::ProvisioningPipeline;
//! use seed_catalog::SeedCatalog;
//! use seed_store::InMemoryStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let pipeline = ProvisioningPipeline::new(
//!     Arc::new(InMemoryStore::new()),
//!     Arc::new(SeedCatalog::standard()),
//! );
//!
//! let first = pipeline.run_provisioning().await;
//! assert!(first.success);
//!
//! let second = pipeline.run_provisioning().await;
//! assert_eq!(second.count("universities_created"), Some(0));
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod plan;
pub mod reset;
pub mod result;
pub mod scheduler;
pub mod settle;
pub mod stage;
pub mod upsert;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use clock::{Clock, TokioClock};
pub use config::{PipelineConfig, SettleConfig};
pub use error::{ConfigError, ProvisionError};
pub use outcome::{SkipReason, StageReport, UnitOutcome, UnitResult};
pub use pipeline::ProvisioningPipeline;
pub use plan::{PlannedUnit, Resolver, StagePlanner};
pub use reset::{ResetController, ResetReport};
pub use result::{DetailValue, ProvisionResult};
pub use scheduler::{RunState, StageScheduler};
pub use settle::{Settled, SettlingRead};
pub use stage::{Stage, StagePolicy, SuccessPolicy};
pub use upsert::IdempotentUpsert;

pub use seed_catalog::SeedCatalog;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running the pipeline
    pub use crate::{
        Clock, PipelineConfig, ProvisionResult, ProvisioningPipeline, SeedCatalog, Stage,
        StageReport, SuccessPolicy,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
