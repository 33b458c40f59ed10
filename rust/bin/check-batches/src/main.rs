//! `check-batches`: inventory batch integrity gate.
//!
//! Reads `products` and `batches` from the hosted backend and reports
//! duplicate batch numbers and orphaned batches.
//!
//! Exit status:
//!   0  no issues
//!   1  the check could not run (configuration, network, auth)
//!   2  duplicates or orphans found
//!
//! Credentials come from `.env`, `.env.local` and the process environment
//! (highest precedence), see `mro_core::config`.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use inventory::{Checker, IntegrityReport};
use mro_core::{EnvConfig, exit_code};
use tracing::{debug, error};

/// Inventory batch integrity checker.
#[derive(Parser, Debug)]
#[command(name = "check-batches", version, about = "Report duplicate and orphaned inventory batches")]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    mro_core::init_logging("info");
    let _cli = Cli::parse();

    let result = run().await;
    match &result {
        Ok(report) => print_report(report),
        Err(e) => error!("batch check failed: {:#}", e),
    }
    ExitCode::from(status(&result) as u8)
}

async fn run() -> anyhow::Result<IntegrityReport> {
    let env = EnvConfig::load(Path::new("."))?;
    let checker = Checker::from_env(&env)?;
    debug!(options = ?checker.options(), "running batch check");
    Ok(checker.run().await?)
}

/// Process exit status for a finished run.
fn status(result: &anyhow::Result<IntegrityReport>) -> i32 {
    match result {
        Ok(report) => report.exit_code(),
        Err(_) => exit_code::FAILURE,
    }
}

fn print_report(report: &IntegrityReport) {
    print!("{}", report.render_text());
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("failed to encode report: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use inventory::check_integrity;
    use inventory::model::{Batch, Product, RecordId};
    use inventory::{CheckError, CheckOptions};
    use mro_core::ConfigError;

    use super::*;

    fn report(batches: &[Batch]) -> IntegrityReport {
        let products = [Product { id: RecordId::from(1) }];
        check_integrity(&products, batches, &CheckOptions::default())
    }

    fn batch(id: &str, product_id: i64, number: &str) -> Batch {
        Batch {
            id: RecordId::from(id),
            product_id: Some(RecordId::from(product_id)),
            batch_number: Some(number.to_string()),
        }
    }

    #[test]
    fn test_clean_run_exits_zero() {
        let result = Ok(report(&[batch("a", 1, "B1"), batch("b", 1, "B2")]));
        assert_eq!(status(&result), 0);
    }

    #[test]
    fn test_findings_exit_two() {
        let duplicate = Ok(report(&[batch("a", 1, "B1"), batch("b", 1, "B1")]));
        assert_eq!(status(&duplicate), 2);

        let orphan = Ok(report(&[batch("c", 9, "B2")]));
        assert_eq!(status(&orphan), 2);
    }

    #[test]
    fn test_failure_exits_one() {
        let missing = CheckError::Config(ConfigError::Missing {
            keys: vec!["SUPABASE_URL".into()],
        });
        let result: anyhow::Result<IntegrityReport> = Err(missing.into());
        assert_eq!(status(&result), 1);

        let result: anyhow::Result<IntegrityReport> = Err(anyhow::anyhow!("connection refused"));
        assert_eq!(status(&result), 1);
    }
}
