use serde::{Deserialize, Serialize};

use super::RecordId;

/// Columns fetched from `batches`.
pub const BATCH_COLUMNS: &str = "id,product_id,batch_number";

/// Inventory batch: a received lot of one product.
///
/// `batch_number` should be unique per product and `product_id` should
/// reference an existing product. Neither is enforced by the schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Batch {
    pub id: RecordId,

    /// Owning product (products.id). May be null in legacy rows.
    #[serde(default)]
    pub product_id: Option<RecordId>,

    /// Supplier/lot number (e.g. "LOT-2024-0117").
    #[serde(default)]
    pub batch_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_default_to_none() {
        let batch: Batch = serde_json::from_str(r#"{"id": "a"}"#).unwrap();
        assert_eq!(batch.id, RecordId::from("a"));
        assert!(batch.product_id.is_none());
        assert!(batch.batch_number.is_none());
    }

    #[test]
    fn test_nulls_serialize_as_null() {
        let batch = Batch {
            id: RecordId::from("c"),
            product_id: None,
            batch_number: None,
        };
        assert_eq!(
            serde_json::to_value(&batch).unwrap(),
            serde_json::json!({"id": "c", "product_id": null, "batch_number": null})
        );
    }
}
