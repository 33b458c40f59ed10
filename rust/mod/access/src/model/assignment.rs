use serde::{Deserialize, Serialize};

use super::{RoleRef, SystemRole};

/// One row of `user_roles`: a user holding a system role or a custom role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub user_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<SystemRole>,

    /// `custom_roles.id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_role_id: Option<String>,

    /// `custom_roles.name`, when the store joins it in. Not a column of
    /// `user_roles`.
    #[serde(default, skip_serializing)]
    pub custom_role_name: Option<String>,
}

impl RoleAssignment {
    pub fn new(user_id: impl Into<String>, role: &RoleRef) -> Self {
        let (role, custom_role_id) = match role {
            RoleRef::System(r) => (Some(*r), None),
            RoleRef::Custom(id) => (None, Some(id.clone())),
        };
        Self {
            user_id: user_id.into(),
            role,
            custom_role_id,
            custom_role_name: None,
        }
    }

    /// The granted role. A system role wins if both columns are set.
    pub fn role_ref(&self) -> Option<RoleRef> {
        match (&self.role, &self.custom_role_id) {
            (Some(role), _) => Some(RoleRef::System(*role)),
            (None, Some(id)) => Some(RoleRef::Custom(id.clone())),
            (None, None) => None,
        }
    }

    /// Whether this row grants exactly `role` (custom roles match by id).
    pub fn grants(&self, role: &RoleRef) -> bool {
        match role {
            RoleRef::System(r) => self.role == Some(*r),
            RoleRef::Custom(id) => self.custom_role_id.as_deref() == Some(id.as_str()),
        }
    }
}
