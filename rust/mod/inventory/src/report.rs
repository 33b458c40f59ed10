use std::fmt::Write as _;

use mro_core::exit_code;
use serde::{Deserialize, Serialize};

use crate::model::{Batch, RecordId};

/// Groups listed per section in the text rendering.
const TEXT_LIST_LIMIT: usize = 20;

/// A `batch_number` seen on more than one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchNumberDuplicate {
    pub batch_number: String,
    pub count: usize,
}

/// A `(product_id, batch_number)` pair seen on more than one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBatchDuplicate {
    pub product_id: Option<RecordId>,
    pub batch_number: String,
    pub count: usize,
}

/// Result of one integrity run.
///
/// Duplicate lists are ordered by count, highest first, ties in the order
/// the key was first seen. `orphans` is a capped sample; `orphans_count` is
/// the full total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub products_count: usize,
    pub batches_count: usize,
    pub duplicates_by_batch_number: Vec<BatchNumberDuplicate>,
    pub duplicates_by_product_and_batch: Vec<ProductBatchDuplicate>,
    pub orphans_count: usize,
    pub orphans: Vec<Batch>,
}

impl IntegrityReport {
    /// No duplicates of either kind and no orphans.
    pub fn is_clean(&self) -> bool {
        self.duplicates_by_batch_number.is_empty()
            && self.duplicates_by_product_and_batch.is_empty()
            && self.orphans_count == 0
    }

    /// Process exit status for this report: 0 clean, 2 issues found.
    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            exit_code::OK
        } else {
            exit_code::INTEGRITY_VIOLATION
        }
    }

    /// Human-readable summary.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Products:  {}", self.products_count);
        let _ = writeln!(out, "Batches:   {}", self.batches_count);

        let _ = writeln!(
            out,
            "Duplicate batch numbers: {}",
            self.duplicates_by_batch_number.len()
        );
        for dup in self.duplicates_by_batch_number.iter().take(TEXT_LIST_LIMIT) {
            let _ = writeln!(out, "  {:?} x{}", dup.batch_number, dup.count);
        }
        more(&mut out, self.duplicates_by_batch_number.len());

        let _ = writeln!(
            out,
            "Duplicate (product, batch number) pairs: {}",
            self.duplicates_by_product_and_batch.len()
        );
        for dup in self.duplicates_by_product_and_batch.iter().take(TEXT_LIST_LIMIT) {
            let _ = writeln!(
                out,
                "  product {} / {:?} x{}",
                display_product(&dup.product_id),
                dup.batch_number,
                dup.count
            );
        }
        more(&mut out, self.duplicates_by_product_and_batch.len());

        let _ = writeln!(
            out,
            "Orphan batches: {} (sample of {})",
            self.orphans_count,
            self.orphans.len()
        );
        for orphan in self.orphans.iter().take(TEXT_LIST_LIMIT) {
            let _ = writeln!(
                out,
                "  batch {} -> product {}",
                orphan.id,
                display_product(&orphan.product_id)
            );
        }
        more(&mut out, self.orphans.len());

        let verdict = if self.is_clean() { "OK" } else { "ISSUES FOUND" };
        let _ = writeln!(out, "Result: {}", verdict);
        out
    }
}

fn display_product(id: &Option<RecordId>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => "<none>".to_string(),
    }
}

fn more(out: &mut String, len: usize) {
    if len > TEXT_LIST_LIMIT {
        let _ = writeln!(out, "  ... and {} more", len - TEXT_LIST_LIMIT);
    }
}
