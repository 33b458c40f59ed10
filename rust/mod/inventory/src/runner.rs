use mro_client::{ApiError, BackendConfig, PageSource, RestClient, fetch_all};
use mro_core::{ConfigError, EnvConfig};
use thiserror::Error;
use tracing::{Instrument, info, info_span};

use crate::check::check_integrity;
use crate::model::{BATCH_COLUMNS, Batch, PRODUCT_COLUMNS, Product};
use crate::options::CheckOptions;
use crate::report::IntegrityReport;

pub const PRODUCTS_TABLE: &str = "products";
pub const BATCHES_TABLE: &str = "batches";

/// The check could not run. Distinct from integrity findings, which are
/// carried by [`IntegrityReport`].
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("fetch failed: {0}")]
    Api(#[from] ApiError),
}

/// Fetches both tables from a [`PageSource`] and checks them.
pub struct Checker<S> {
    source: S,
    options: CheckOptions,
}

impl Checker<RestClient> {
    /// Checker against the backend named in the environment.
    pub fn from_env(env: &EnvConfig) -> Result<Self, CheckError> {
        let backend = BackendConfig::from_env(env)?;
        let options = CheckOptions::from_env(env)?;
        info!(url = %backend.url, page_size = options.page_size, "checker configured");
        Ok(Self::new(RestClient::from_config(&backend)?, options))
    }
}

impl<S: PageSource> Checker<S> {
    pub fn new(source: S, options: CheckOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Read `products` and `batches` in full, then check them. Any fetch
    /// failure aborts the run; no partial report is produced.
    pub async fn run(&self) -> Result<IntegrityReport, CheckError> {
        let products: Vec<Product> = fetch_all(
            &self.source,
            PRODUCTS_TABLE,
            PRODUCT_COLUMNS,
            self.options.page_size,
        )
        .instrument(info_span!("fetch", table = PRODUCTS_TABLE))
        .await?;
        info!(count = products.len(), "products loaded");

        let batches: Vec<Batch> = fetch_all(
            &self.source,
            BATCHES_TABLE,
            BATCH_COLUMNS,
            self.options.page_size,
        )
        .instrument(info_span!("fetch", table = BATCHES_TABLE))
        .await?;
        info!(count = batches.len(), "batches loaded");

        let report = check_integrity(&products, &batches, &self.options);
        info!(
            duplicate_numbers = report.duplicates_by_batch_number.len(),
            duplicate_pairs = report.duplicates_by_product_and_batch.len(),
            orphans = report.orphans_count,
            "integrity check finished"
        );
        Ok(report)
    }
}
