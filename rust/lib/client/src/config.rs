use std::time::Duration;

use mro_core::{ConfigError, EnvConfig};
use tracing::debug;

/// Accepted names for the project URL, in lookup order.
pub const URL_KEYS: &[&str] = &["SUPABASE_URL", "VITE_SUPABASE_URL"];

/// Accepted names for the API key, in lookup order. The service-role key
/// comes first since the checker needs to read every row.
pub const KEY_KEYS: &[&str] = &[
    "SUPABASE_SERVICE_ROLE_KEY",
    "SUPABASE_ANON_KEY",
    "VITE_SUPABASE_PUBLISHABLE_KEY",
    "VITE_SUPABASE_ANON_KEY",
];

/// Request timeout in seconds.
pub const TIMEOUT_KEY: &str = "MRO_HTTP_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the hosted backend.
#[derive(Clone)]
pub struct BackendConfig {
    /// Project URL (e.g. "https://abcd.supabase.co").
    pub url: String,
    /// API key.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BackendConfig {
    pub fn from_env(env: &EnvConfig) -> Result<Self, ConfigError> {
        let url = env.require_first(URL_KEYS)?.trim().to_string();
        let api_key = env.require_first(KEY_KEYS)?.trim().to_string();
        for keys in [URL_KEYS, KEY_KEYS] {
            if let Some((key, _)) = env.get_first(keys) {
                if let Some(layer) = env.origin(key) {
                    debug!(key, from = %layer, "backend setting");
                }
            }
        }
        let timeout = env.parse_or(TIMEOUT_KEY, DEFAULT_TIMEOUT_SECS)?;
        Ok(Self {
            url,
            api_key,
            timeout: Duration::from_secs(timeout),
        })
    }

    /// REST root: `{url}/rest/v1`, unless the URL already points there.
    pub fn rest_base(&self) -> String {
        let url = self.url.trim_end_matches('/');
        if url.ends_with("/rest/v1") {
            url.to_string()
        } else {
            format!("{}/rest/v1", url)
        }
    }
}
