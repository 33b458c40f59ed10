use serde::{Deserialize, Serialize};

use super::RecordId;

/// Columns fetched from `products`. Only identity matters for the checks.
pub const PRODUCT_COLUMNS: &str = "id";

/// Inventory product (part number master record).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: RecordId,
}
