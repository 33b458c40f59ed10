//! Layered environment configuration.
//!
//! Values are collected from two sources:
//!
//! - the dotenv files `.env`, then `.env.local`, in the working directory.
//!   The first assignment of a key wins, both within a file and across files.
//! - the process environment, which overrides any file value.
//!
//! The process environment itself is never modified.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::ConfigError;

/// File layers, in lookup order.
pub const ENV_FILES: [&str; 2] = [".env", ".env.local"];

/// Where a configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    File(PathBuf),
    Process,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::File(path) => write!(f, "{}", path.display()),
            Layer::Process => f.write_str("process environment"),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    layer: Layer,
}

/// Resolved key/value configuration.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    entries: HashMap<String, Entry>,
}

impl EnvConfig {
    /// Load `.env` files from `dir`, then overlay the process environment.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        Self::load_with(dir, std::env::vars())
    }

    /// Like [`EnvConfig::load`], with an explicit top layer instead of the
    /// process environment.
    pub fn load_with<I, K, V>(dir: &Path, top: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for name in ENV_FILES {
            let path = dir.join(name);
            if !path.is_file() {
                continue;
            }
            let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            let pairs = parse_env_file(&content);
            debug!(file = %path.display(), keys = pairs.len(), "loaded env file");
            config.fill(Layer::File(path), pairs);
        }
        config.merge(Layer::Process, top);
        Ok(config)
    }

    /// Build a configuration from literal pairs, attributed to the process
    /// environment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = Self::default();
        config.merge(Layer::Process, pairs);
        config
    }

    /// Add `pairs` for keys not already set. The first value seen wins.
    pub fn fill<I, K, V>(&mut self, layer: Layer, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.entries.entry(key.into()).or_insert_with(|| Entry {
                value: value.into(),
                layer: layer.clone(),
            });
        }
    }

    /// Overlay `pairs` on top of the current values.
    pub fn merge<I, K, V>(&mut self, layer: Layer, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.entries.insert(
                key.into(),
                Entry {
                    value: value.into(),
                    layer: layer.clone(),
                },
            );
        }
    }

    /// Value for `key`. Empty values count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(|e| e.value.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Layer that supplied `key`, if set.
    pub fn origin(&self, key: &str) -> Option<&Layer> {
        self.entries.get(key).map(|e| &e.layer)
    }

    /// First set key among `keys`, with its value.
    pub fn get_first<'a, 'k>(&'a self, keys: &[&'k str]) -> Option<(&'k str, &'a str)> {
        keys.iter()
            .find_map(|key| self.get(key).map(|value| (*key, value)))
    }

    /// Like [`EnvConfig::get_first`] but missing values are an error naming
    /// every accepted key.
    pub fn require_first(&self, keys: &[&str]) -> Result<&str, ConfigError> {
        self.get_first(keys)
            .map(|(_, value)| value)
            .ok_or_else(|| ConfigError::Missing {
                keys: keys.iter().map(|k| k.to_string()).collect(),
            })
    }

    /// Parse `key` into `T`, falling back to `default` when unset.
    pub fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Parse the contents of a dotenv-style file.
///
/// Pairs are returned in file order, repeats included.
pub fn parse_env_file(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        pairs.push((key.to_string(), unquote(value.trim())));
    }
    pairs
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    match value.find(" #") {
        Some(idx) => value[..idx].trim_end().to_string(),
        None => value.to_string(),
    }
}
