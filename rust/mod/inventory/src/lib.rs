//! Inventory integrity: duplicate batch numbers and orphaned batches.
//!
//! [`Checker`] pages through `products` and `batches`, and
//! [`check_integrity`] turns the rows into an [`IntegrityReport`] whose
//! [`exit_code`](IntegrityReport::exit_code) gates CI jobs.

pub mod check;
pub mod model;
pub mod options;
pub mod report;
pub mod runner;

pub use check::check_integrity;
pub use options::{CheckOptions, NullBatchNumber};
pub use report::{BatchNumberDuplicate, IntegrityReport, ProductBatchDuplicate};
pub use runner::{CheckError, Checker};
