mod batch;
mod id;
mod product;

pub use batch::{BATCH_COLUMNS, Batch};
pub use id::RecordId;
pub use product::{PRODUCT_COLUMNS, Product};
