use std::collections::{BTreeSet, HashSet};

use crate::model::{RoleAssignment, RoleRef, SystemRole};

/// The roles one user holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet {
    system: HashSet<SystemRole>,
    /// Custom role ids, plus names when the store supplied them.
    custom: HashSet<String>,
}

impl RoleSet {
    pub fn from_assignments<'a>(rows: impl IntoIterator<Item = &'a RoleAssignment>) -> Self {
        let mut set = Self::default();
        for row in rows {
            if let Some(role) = row.role {
                set.system.insert(role);
            }
            if let Some(id) = &row.custom_role_id {
                set.custom.insert(id.clone());
                if let Some(name) = &row.custom_role_name {
                    set.custom.insert(name.clone());
                }
            }
        }
        set
    }

    pub fn has_role(&self, role: SystemRole) -> bool {
        self.system.contains(&role)
    }

    /// True if the user holds the custom role with this id or name.
    pub fn has_custom_role(&self, id_or_name: &str) -> bool {
        self.custom.contains(id_or_name)
    }

    pub fn has(&self, role: &RoleRef) -> bool {
        match role {
            RoleRef::System(r) => self.has_role(*r),
            RoleRef::Custom(id) => self.has_custom_role(id),
        }
    }

    /// Held system roles in declaration order.
    pub fn system_roles(&self) -> Vec<SystemRole> {
        SystemRole::ALL
            .into_iter()
            .filter(|r| self.system.contains(r))
            .collect()
    }

    /// Held custom role ids and names, sorted.
    pub fn custom_roles(&self) -> BTreeSet<&str> {
        self.custom.iter().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.system.is_empty() && self.custom.is_empty()
    }
}

/// Load state of a user's roles.
///
/// Anything but `Ready` denies every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleState {
    Loading,
    Ready(RoleSet),
    Failed(String),
}

impl RoleState {
    /// The role set, once loaded.
    pub fn roles(&self) -> Option<&RoleSet> {
        match self {
            RoleState::Ready(set) => Some(set),
            _ => None,
        }
    }

    pub fn has_role(&self, role: SystemRole) -> bool {
        self.roles().is_some_and(|set| set.has_role(role))
    }

    pub fn has_custom_role(&self, id_or_name: &str) -> bool {
        self.roles().is_some_and(|set| set.has_custom_role(id_or_name))
    }

    pub fn has(&self, role: &RoleRef) -> bool {
        self.roles().is_some_and(|set| set.has(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<RoleAssignment> {
        let mut custom = RoleAssignment::new("u1", &RoleRef::custom("cr-7"));
        custom.custom_role_name = Some("stores_clerk".into());
        vec![
            RoleAssignment::new("u1", &RoleRef::System(SystemRole::BatchManager)),
            RoleAssignment::new("u1", &RoleRef::System(SystemRole::Admin)),
            custom,
        ]
    }

    #[test]
    fn test_from_assignments() {
        let set = RoleSet::from_assignments(&rows());
        assert!(set.has_role(SystemRole::Admin));
        assert!(set.has_role(SystemRole::BatchManager));
        assert!(!set.has_role(SystemRole::Supervisor));
        assert!(set.has_custom_role("cr-7"));
        assert!(set.has_custom_role("stores_clerk"));
        assert!(!set.has_custom_role("admin"));
        assert_eq!(
            set.system_roles(),
            vec![SystemRole::Admin, SystemRole::BatchManager]
        );
        assert_eq!(
            set.custom_roles().into_iter().collect::<Vec<_>>(),
            vec!["cr-7", "stores_clerk"]
        );
    }

    #[test]
    fn test_system_name_does_not_match_custom() {
        let set = RoleSet::from_assignments(&rows());
        assert!(!set.has(&RoleRef::custom("admin")));
        assert!(set.has(&RoleRef::resolve("admin")));
    }

    #[test]
    fn test_non_ready_states_deny() {
        for state in [RoleState::Loading, RoleState::Failed("timeout".into())] {
            assert!(!state.has_role(SystemRole::Admin));
            assert!(!state.has_custom_role("cr-7"));
            assert!(state.roles().is_none());
        }
        let ready = RoleState::Ready(RoleSet::from_assignments(&rows()));
        assert!(ready.has_role(SystemRole::Admin));
        assert!(ready.has(&RoleRef::custom("cr-7")));
    }

    #[test]
    fn test_empty_set() {
        let state = RoleState::Ready(RoleSet::default());
        assert!(state.roles().unwrap().is_empty());
        for role in SystemRole::ALL {
            assert!(!state.has_role(role));
        }
    }
}
