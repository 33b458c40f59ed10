pub mod config;
pub mod error;
pub mod logging;

pub use config::{EnvConfig, Layer};
pub use error::{ConfigError, exit_code};
pub use logging::init_logging;
