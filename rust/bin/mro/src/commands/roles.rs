//! `mro roles list|assign|remove`.

use access::RoleState;
use anyhow::{Result, bail};
use mro_core::exit_code;

use super::Service;

pub async fn list(service: &Service, user_id: &str) -> Result<i32> {
    let state = service.load_roles(user_id).await;
    print_roles(user_id, &state)?;
    Ok(exit_code::OK)
}

pub async fn assign(service: &Service, user_id: &str, role: &str) -> Result<i32> {
    let role = service.resolve_role(role).await?;
    let state = service.assign_role(user_id, &role).await?;
    println!("Assigned {} to {}.", role, user_id);
    print_roles(user_id, &state)?;
    Ok(exit_code::OK)
}

pub async fn remove(service: &Service, user_id: &str, role: &str) -> Result<i32> {
    let role = service.resolve_role(role).await?;
    match service.remove_role(user_id, &role).await? {
        0 => println!("{} did not have {}.", user_id, role),
        _ => println!("Removed {} from {}.", role, user_id),
    }
    Ok(exit_code::OK)
}

fn print_roles(user_id: &str, state: &RoleState) -> Result<()> {
    let roles = match state {
        RoleState::Ready(roles) => roles,
        RoleState::Failed(message) => bail!("could not load roles for {}: {}", user_id, message),
        RoleState::Loading => bail!("roles for {} are still loading", user_id),
    };

    if roles.is_empty() {
        println!("{} has no roles.", user_id);
        return Ok(());
    }
    for role in roles.system_roles() {
        println!("  {}", role);
    }
    for role in roles.custom_roles() {
        println!("  custom:{}", role);
    }
    Ok(())
}
