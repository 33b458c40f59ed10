use std::fmt;
use std::str::FromStr;

use mro_client::DEFAULT_PAGE_SIZE;
use mro_core::{ConfigError, EnvConfig};

pub const PAGE_SIZE_KEY: &str = "BATCH_CHECK_PAGE_SIZE";
pub const ORPHAN_SAMPLE_KEY: &str = "BATCH_CHECK_ORPHAN_SAMPLE";
pub const NULL_BATCH_NUMBER_KEY: &str = "BATCH_CHECK_NULL_BATCH_NUMBER";

/// Orphans listed in the report payload; the count is never capped.
pub const DEFAULT_ORPHAN_SAMPLE: usize = 200;

/// How a null `batch_number` takes part in duplicate grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullBatchNumber {
    /// Group as `""`. Several null batch numbers under one product are
    /// reported as duplicates of each other.
    #[default]
    AsEmpty,
    /// Leave batches without a batch number out of both groupings.
    Skip,
}

impl FromStr for NullBatchNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "empty" | "as-empty" | "as_empty" => Ok(Self::AsEmpty),
            "skip" => Ok(Self::Skip),
            other => Err(format!("expected \"empty\" or \"skip\", got \"{}\"", other)),
        }
    }
}

impl fmt::Display for NullBatchNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AsEmpty => f.write_str("empty"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

/// Tuning for one integrity run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Rows requested per page.
    pub page_size: usize,
    /// Maximum orphans carried in the report.
    pub orphan_sample_limit: usize,
    pub null_batch_number: NullBatchNumber,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            orphan_sample_limit: DEFAULT_ORPHAN_SAMPLE,
            null_batch_number: NullBatchNumber::default(),
        }
    }
}

impl CheckOptions {
    pub fn from_env(env: &EnvConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let page_size: usize = env.parse_or(PAGE_SIZE_KEY, defaults.page_size)?;
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                key: PAGE_SIZE_KEY.to_string(),
                message: "page size must be at least 1".into(),
            });
        }
        Ok(Self {
            page_size,
            orphan_sample_limit: env.parse_or(ORPHAN_SAMPLE_KEY, defaults.orphan_sample_limit)?,
            null_batch_number: env.parse_or(NULL_BATCH_NUMBER_KEY, defaults.null_batch_number)?,
        })
    }
}
