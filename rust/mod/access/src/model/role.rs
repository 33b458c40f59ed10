use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Built-in roles recognised by the authorization logic.
///
/// Stored in `user_roles.role` as the snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    Admin,
    SystemOwner,
    Supervisor,
    PartsApprover,
    JobAllocator,
    BatchManager,
}

impl SystemRole {
    /// Every system role, in declaration order.
    pub const ALL: [SystemRole; 6] = [
        SystemRole::Admin,
        SystemRole::SystemOwner,
        SystemRole::Supervisor,
        SystemRole::PartsApprover,
        SystemRole::JobAllocator,
        SystemRole::BatchManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemRole::Admin => "admin",
            SystemRole::SystemOwner => "system_owner",
            SystemRole::Supervisor => "supervisor",
            SystemRole::PartsApprover => "parts_approver",
            SystemRole::JobAllocator => "job_allocator",
            SystemRole::BatchManager => "batch_manager",
        }
    }
}

impl fmt::Display for SystemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown system role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for SystemRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// A required or granted role: either a system role or a custom role.
///
/// Role names are resolved once, when a gate or requirement is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleRef {
    System(SystemRole),
    /// Custom role, by id (or by name when the store supplies it).
    Custom(String),
}

impl RoleRef {
    /// A name matching a system role becomes [`RoleRef::System`]; anything
    /// else is treated as a custom role.
    pub fn resolve(name: &str) -> Self {
        match name.parse::<SystemRole>() {
            Ok(role) => RoleRef::System(role),
            Err(_) => RoleRef::Custom(name.to_string()),
        }
    }

    pub fn custom(id: impl Into<String>) -> Self {
        RoleRef::Custom(id.into())
    }
}

impl From<SystemRole> for RoleRef {
    fn from(role: SystemRole) -> Self {
        RoleRef::System(role)
    }
}

impl fmt::Display for RoleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleRef::System(role) => write!(f, "{}", role),
            RoleRef::Custom(id) => write!(f, "custom:{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        for role in SystemRole::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            assert_eq!(role.as_str().parse::<SystemRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert!("Admin".parse::<SystemRole>().is_err());
        assert!("owner".parse::<SystemRole>().is_err());
    }

    #[test]
    fn test_resolve() {
        assert_eq!(RoleRef::resolve("admin"), RoleRef::System(SystemRole::Admin));
        assert_eq!(
            RoleRef::resolve("batch_manager"),
            RoleRef::System(SystemRole::BatchManager)
        );
        assert_eq!(RoleRef::resolve("stores_clerk"), RoleRef::custom("stores_clerk"));
        assert_eq!(RoleRef::resolve("stores_clerk").to_string(), "custom:stores_clerk");
    }
}
