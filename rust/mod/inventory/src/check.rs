use std::collections::HashSet;

use indexmap::IndexMap;

use crate::model::{Batch, Product, RecordId};
use crate::options::{CheckOptions, NullBatchNumber};
use crate::report::{BatchNumberDuplicate, IntegrityReport, ProductBatchDuplicate};

/// Find duplicate batch numbers and orphaned batches.
///
/// Pure and deterministic: the same input always yields the same report.
pub fn check_integrity(
    products: &[Product],
    batches: &[Batch],
    options: &CheckOptions,
) -> IntegrityReport {
    let known: HashSet<&RecordId> = products.iter().map(|p| &p.id).collect();

    // Insertion order doubles as first-encounter order for tie breaking.
    let mut by_number: IndexMap<&str, usize> = IndexMap::new();
    let mut by_pair: IndexMap<(Option<&RecordId>, &str), usize> = IndexMap::new();

    for batch in batches {
        let number = match (&batch.batch_number, options.null_batch_number) {
            (Some(n), _) => n.as_str(),
            (None, NullBatchNumber::AsEmpty) => "",
            (None, NullBatchNumber::Skip) => continue,
        };
        *by_number.entry(number).or_insert(0) += 1;
        *by_pair
            .entry((batch.product_id.as_ref(), number))
            .or_insert(0) += 1;
    }

    let duplicates_by_batch_number = sorted_duplicates(by_number)
        .map(|(batch_number, count)| BatchNumberDuplicate {
            batch_number: batch_number.to_string(),
            count,
        })
        .collect();

    let duplicates_by_product_and_batch = sorted_duplicates(by_pair)
        .map(|((product_id, batch_number), count)| ProductBatchDuplicate {
            product_id: product_id.cloned(),
            batch_number: batch_number.to_string(),
            count,
        })
        .collect();

    let mut orphans_count = 0;
    let mut orphans = Vec::new();
    for batch in batches.iter().filter(|b| is_orphan(b, &known)) {
        orphans_count += 1;
        if orphans.len() < options.orphan_sample_limit {
            orphans.push(batch.clone());
        }
    }

    IntegrityReport {
        products_count: products.len(),
        batches_count: batches.len(),
        duplicates_by_batch_number,
        duplicates_by_product_and_batch,
        orphans_count,
        orphans,
    }
}

/// A batch with no product, or one pointing at a product that does not exist.
pub fn is_orphan(batch: &Batch, known: &HashSet<&RecordId>) -> bool {
    match &batch.product_id {
        None => true,
        Some(id) => !known.contains(id),
    }
}

/// Keys seen more than once, highest count first. The sort is stable, so
/// equal counts keep insertion order.
fn sorted_duplicates<K>(counts: IndexMap<K, usize>) -> impl Iterator<Item = (K, usize)> {
    let mut dups: Vec<(K, usize)> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
    dups.sort_by(|a, b| b.1.cmp(&a.1));
    dups.into_iter()
}
