//! Provisioning pipeline
//!
//! The public entry point. Composes the reset controller, the stage
//! scheduler and the result aggregator into two operations:
//! - [`ProvisioningPipeline::run_provisioning`]: additive, safe to repeat
//! - [`ProvisioningPipeline::reset_and_run_provisioning`]: delete, then run
//!
//! Both always return a [`ProvisionResult`]; nothing is raised to the caller.

use crate::clock::{Clock, TokioClock};
use crate::config::PipelineConfig;
use crate::error::ProvisionError;
use crate::reset::ResetController;
use crate::result::ProvisionResult;
use crate::scheduler::StageScheduler;
use crate::stage::SuccessPolicy;
use seed_catalog::SeedCatalog;
use seed_store::EntityStore;
use std::path::Path;
use std::sync::Arc;

/// Provisioning façade over one store and one catalog
pub struct ProvisioningPipeline {
    store: Arc<dyn EntityStore>,
    catalog: Arc<SeedCatalog>,
    config: PipelineConfig,
    clock: Arc<dyn Clock>,
}

impl ProvisioningPipeline {
    /// Create pipeline with default configuration
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>, catalog: Arc<SeedCatalog>) -> Self {
        Self {
            store,
            catalog,
            config: PipelineConfig::default(),
            clock: Arc::new(TokioClock),
        }
    }

    /// Create pipeline from on-disk catalog and configuration
    ///
    /// A missing catalog path selects [`SeedCatalog::standard`]; a missing
    /// config path selects the defaults.
    ///
    /// # Errors
    /// `ProvisionError::Catalog` or `ProvisionError::Config` if a file cannot
    /// be read, parsed or validated
    pub fn load(
        store: Arc<dyn EntityStore>,
        catalog_path: Option<&Path>,
        config_path: Option<&Path>,
    ) -> Result<Self, ProvisionError> {
        let catalog = match catalog_path {
            Some(path) => SeedCatalog::from_toml_file(path)?,
            None => SeedCatalog::standard(),
        };

        let config = match config_path {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        Ok(Self::new(store, Arc::new(catalog)).with_config(config))
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// With time source for settling waits
    #[inline]
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Catalog being provisioned
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &SeedCatalog {
        &self.catalog
    }

    /// Create every missing catalog record
    pub async fn run_provisioning(&self) -> ProvisionResult {
        tracing::info!("Running provisioning with catalog {}", self.catalog.version);

        let reports = self.scheduler().run().await;
        let result = ProvisionResult::from_reports(reports, &self.policy(), None);
        log_result(&result);
        result
    }

    /// Delete all provisioned rows, then run provisioning
    ///
    /// Creation is not attempted if any delete fails.
    pub async fn reset_and_run_provisioning(&self) -> ProvisionResult {
        tracing::info!("Resetting before provisioning with catalog {}", self.catalog.version);

        let reset = match ResetController::new(Arc::clone(&self.store)).reset().await {
            Ok(reset) => reset,
            Err(err) => {
                let result = ProvisionResult::reset_aborted(&err);
                log_result(&result);
                return result;
            }
        };

        let reports = self.scheduler().run().await;
        let result = ProvisionResult::from_reports(reports, &self.policy(), Some(&reset));
        log_result(&result);
        result
    }

    fn scheduler(&self) -> StageScheduler {
        StageScheduler::new(
            Arc::clone(&self.store),
            Arc::clone(&self.catalog),
            self.config.clone(),
            Arc::clone(&self.clock),
        )
    }

    fn policy(&self) -> SuccessPolicy {
        self.config.success_policy()
    }
}

fn log_result(result: &ProvisionResult) {
    if result.success {
        tracing::info!("{}", result.message);
    } else {
        tracing::error!("{}", result.message);
    }
}

impl std::fmt::Debug for ProvisioningPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisioningPipeline")
            .field("catalog", &self.catalog.version)
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
