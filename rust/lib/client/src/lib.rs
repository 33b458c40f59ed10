//! Client for the hosted Postgres REST endpoint backing the MRO app.
//!
//! Provides table-level reads and writes ([`RestClient`]), a paging
//! abstraction ([`PageSource`], [`fetch_all`]) so whole tables can be read
//! past the per-request row cap, and the connection settings loaded from
//! the layered environment ([`BackendConfig`]).
//!
//! # Usage
//!
//! ```ignore
//! let env = mro_core::EnvConfig::load(Path::new("."))?;
//! let client = RestClient::from_config(&BackendConfig::from_env(&env)?)?;
//! let products: Vec<Product> = fetch_all(&client, "products", "id", 1000).await?;
//! ```

pub mod config;
pub mod error;
pub mod paging;
pub mod rest;
pub mod token;

pub use config::BackendConfig;
pub use error::ApiError;
pub use paging::{DEFAULT_PAGE_SIZE, Page, PageRequest, PageSource, fetch_all};
pub use rest::RestClient;
pub use token::{KeySource, StaticKey};
