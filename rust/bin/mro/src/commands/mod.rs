pub mod access;
pub mod roles;

use std::path::Path;
use std::sync::Arc;

use ::access::{AccessService, FeatureMap, RestRoleStore};
use anyhow::Result;
use mro_client::{BackendConfig, RestClient};
use mro_core::EnvConfig;

pub type Service = AccessService<RestRoleStore>;

/// Build the access service from the layered environment in `env_dir`.
pub fn connect(env_dir: &Path) -> Result<Service> {
    let env = EnvConfig::load(env_dir)?;
    let config = BackendConfig::from_env(&env)?;
    tracing::debug!(?config, "backend");
    let client = RestClient::from_config(&config)?;
    Ok(AccessService::new(
        RestRoleStore::new(Arc::new(client)),
        FeatureMap::standard(),
    ))
}
