use std::path::PathBuf;

use thiserror::Error;

// ── Exit codes ──────────────────────────────────────────────────────
//
// Process exit statuses shared by the MRO binaries. CI jobs gate on
// these numbers, so they never change.

/// Stable process exit codes.
pub mod exit_code {
    /// Check ran and found nothing wrong.
    pub const OK: i32 = 0;
    /// The tool itself failed (configuration, network, auth, decode).
    pub const FAILURE: i32 = 1;
    /// Check ran and found duplicates or orphans.
    pub const INTEGRITY_VIOLATION: i32 = 2;
    /// Access check ran and the user lacks the requested features.
    pub const ACCESS_DENIED: i32 = 3;
}

// ── ConfigError ─────────────────────────────────────────────────────

/// Configuration loading and lookup errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// None of the accepted keys is set.
    #[error("missing configuration: set one of {}", .keys.join(", "))]
    Missing { keys: Vec<String> },

    /// A key is set but its value does not parse.
    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    /// An env file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(exit_code::OK, 0);
        assert_eq!(exit_code::FAILURE, 1);
        assert_eq!(exit_code::INTEGRITY_VIOLATION, 2);
        assert_eq!(exit_code::ACCESS_DENIED, 3);
    }

    #[test]
    fn error_display() {
        let err = ConfigError::Missing {
            keys: vec!["SUPABASE_URL".into(), "VITE_SUPABASE_URL".into()],
        };
        assert_eq!(
            err.to_string(),
            "missing configuration: set one of SUPABASE_URL, VITE_SUPABASE_URL"
        );

        let err = ConfigError::Invalid {
            key: "BATCH_CHECK_PAGE_SIZE".into(),
            message: "invalid digit found in string".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for BATCH_CHECK_PAGE_SIZE: invalid digit found in string"
        );
    }
}
