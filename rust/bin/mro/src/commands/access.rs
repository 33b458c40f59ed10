//! `mro access features|check`.

use ::access::RoleState;
use anyhow::{Result, bail};
use mro_core::exit_code;

use super::Service;

pub async fn features(service: &Service, user_id: &str) -> Result<i32> {
    let access = service.access(user_id).await;
    if let RoleState::Failed(message) = access.state() {
        bail!("could not load roles for {}: {}", user_id, message);
    }
    let enabled = access.enabled_features();
    if enabled.is_empty() {
        println!("{} has no feature access.", user_id);
    }
    for name in enabled {
        println!("  {}", name);
    }
    Ok(exit_code::OK)
}

pub async fn check(service: &Service, user_id: &str, features: &[String], all: bool) -> Result<i32> {
    for name in features {
        if service.features().get(name).is_none() {
            tracing::warn!(feature = %name, "unknown feature, treated as denied");
        }
    }

    let access = service.access(user_id).await;
    if let RoleState::Failed(message) = access.state() {
        // Fail closed, but say why.
        eprintln!("could not load roles for {}: {}", user_id, message);
    }

    let names: Vec<&str> = features.iter().map(String::as_str).collect();
    let allowed = if all {
        access.has_all_feature_access(&names)
    } else {
        access.has_any_feature_access(&names)
    };

    if allowed {
        println!("allowed");
        Ok(exit_code::OK)
    } else {
        println!("denied");
        Ok(exit_code::ACCESS_DENIED)
    }
}
