//! Named features derived from role predicates.
//!
//! A feature is a [`Requirement`] over the user's [`RoleSet`]. The built-in
//! map is fixed at compile time; embedders may add entries when building
//! their own [`FeatureMap`].

use indexmap::IndexMap;

use crate::model::{RoleRef, SystemRole};
use crate::roles::{RoleSet, RoleState};

/// Boolean combination of role checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Role(RoleRef),
    /// True if any child is. `Any([])` is false.
    Any(Vec<Requirement>),
    /// True if every child is. `All([])` is true.
    All(Vec<Requirement>),
}

impl Requirement {
    pub fn role(role: impl Into<RoleRef>) -> Self {
        Requirement::Role(role.into())
    }

    pub fn any_of<R: Into<RoleRef>>(roles: impl IntoIterator<Item = R>) -> Self {
        Requirement::Any(roles.into_iter().map(Self::role).collect())
    }

    pub fn all_of<R: Into<RoleRef>>(roles: impl IntoIterator<Item = R>) -> Self {
        Requirement::All(roles.into_iter().map(Self::role).collect())
    }

    pub fn is_satisfied_by(&self, roles: &RoleSet) -> bool {
        match self {
            Requirement::Role(role) => roles.has(role),
            Requirement::Any(children) => children.iter().any(|c| c.is_satisfied_by(roles)),
            Requirement::All(children) => children.iter().all(|c| c.is_satisfied_by(roles)),
        }
    }
}

pub const CAN_MANAGE_SYSTEM: &str = "canManageSystem";
pub const CAN_MANAGE_USERS: &str = "canManageUsers";
pub const INVENTORY: &str = "inventory";
pub const BATCH_MANAGEMENT: &str = "batchManagement";
pub const PARTS_APPROVAL: &str = "partsApproval";
pub const JOB_ALLOCATION: &str = "jobAllocation";
pub const JOB_CARDS: &str = "jobCards";
pub const ROTABLES: &str = "rotables";
pub const TOOL_LOANS: &str = "toolLoans";

/// Feature name -> requirement, in definition order.
#[derive(Debug, Clone, Default)]
pub struct FeatureMap {
    features: IndexMap<String, Requirement>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The application's built-in features.
    pub fn standard() -> Self {
        use SystemRole::*;

        let mut map = Self::new();
        map.insert(CAN_MANAGE_SYSTEM, Requirement::any_of([Admin, SystemOwner]));
        map.insert(CAN_MANAGE_USERS, Requirement::any_of([Admin, SystemOwner]));
        map.insert(
            INVENTORY,
            Requirement::any_of([Admin, SystemOwner, Supervisor, BatchManager, PartsApprover]),
        );
        map.insert(
            BATCH_MANAGEMENT,
            Requirement::any_of([Admin, SystemOwner, BatchManager]),
        );
        map.insert(
            PARTS_APPROVAL,
            Requirement::any_of([Admin, SystemOwner, PartsApprover]),
        );
        map.insert(
            JOB_ALLOCATION,
            Requirement::any_of([Admin, SystemOwner, Supervisor, JobAllocator]),
        );
        map.insert(JOB_CARDS, Requirement::any_of(SystemRole::ALL));
        map.insert(ROTABLES, Requirement::any_of([Admin, SystemOwner, Supervisor]));
        map.insert(
            TOOL_LOANS,
            Requirement::any_of([Admin, SystemOwner, Supervisor, BatchManager]),
        );
        map
    }

    /// Add or replace a feature. Returns the previous requirement.
    pub fn insert(&mut self, name: impl Into<String>, requirement: Requirement) -> Option<Requirement> {
        self.features.insert(name.into(), requirement)
    }

    pub fn get(&self, name: &str) -> Option<&Requirement> {
        self.features.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// Unknown features are never enabled.
    pub fn evaluate(&self, name: &str, roles: &RoleSet) -> bool {
        self.get(name).is_some_and(|req| req.is_satisfied_by(roles))
    }
}

/// One user's view: role state plus the feature map to read it through.
#[derive(Debug, Clone)]
pub struct Access<'a> {
    state: RoleState,
    features: &'a FeatureMap,
}

impl<'a> Access<'a> {
    pub fn new(state: RoleState, features: &'a FeatureMap) -> Self {
        Self { state, features }
    }

    pub fn state(&self) -> &RoleState {
        &self.state
    }

    pub fn has_role(&self, role: SystemRole) -> bool {
        self.state.has_role(role)
    }

    pub fn has_custom_role(&self, id_or_name: &str) -> bool {
        self.state.has_custom_role(id_or_name)
    }

    pub fn has_feature_access(&self, name: &str) -> bool {
        self.state
            .roles()
            .is_some_and(|roles| self.features.evaluate(name, roles))
    }

    /// At least one of `names` is enabled.
    pub fn has_any_feature_access(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.has_feature_access(name))
    }

    /// Every one of `names` is enabled. An empty list passes once roles
    /// have loaded.
    pub fn has_all_feature_access(&self, names: &[&str]) -> bool {
        self.state.roles().is_some() && names.iter().all(|name| self.has_feature_access(name))
    }

    /// Enabled features, in definition order.
    pub fn enabled_features(&self) -> Vec<&'a str> {
        let Some(roles) = self.state.roles() else {
            return Vec::new();
        };
        let features: &'a FeatureMap = self.features;
        features
            .names()
            .filter(|name| features.evaluate(name, roles))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoleAssignment;

    fn ready(roles: &[RoleRef]) -> RoleState {
        let rows: Vec<RoleAssignment> = roles.iter().map(|r| RoleAssignment::new("u1", r)).collect();
        RoleState::Ready(RoleSet::from_assignments(&rows))
    }

    #[test]
    fn test_admin_can_manage_system() {
        let features = FeatureMap::standard();
        let access = Access::new(ready(&[SystemRole::Admin.into()]), &features);
        assert!(access.has_role(SystemRole::Admin));
        assert!(access.has_feature_access(CAN_MANAGE_SYSTEM));
        assert!(access.has_feature_access(INVENTORY));
        assert_eq!(access.enabled_features().len(), features.names().count());
    }

    #[test]
    fn test_system_owner_can_manage_system() {
        let features = FeatureMap::standard();
        let access = Access::new(ready(&[SystemRole::SystemOwner.into()]), &features);
        assert!(!access.has_role(SystemRole::Admin));
        assert!(access.has_feature_access(CAN_MANAGE_SYSTEM));
    }

    #[test]
    fn test_no_roles_denies_everything() {
        let features = FeatureMap::standard();
        let access = Access::new(ready(&[]), &features);
        for role in SystemRole::ALL {
            assert!(!access.has_role(role));
        }
        assert!(!access.has_custom_role("anything"));
        for name in features.names() {
            assert!(!access.has_feature_access(name), "{} should be off", name);
        }
        assert!(access.enabled_features().is_empty());
    }

    #[test]
    fn test_any_and_all() {
        let features = FeatureMap::standard();
        let access = Access::new(ready(&[SystemRole::BatchManager.into()]), &features);
        assert!(access.has_feature_access(BATCH_MANAGEMENT));
        assert!(!access.has_feature_access(PARTS_APPROVAL));

        assert!(access.has_any_feature_access(&[PARTS_APPROVAL, BATCH_MANAGEMENT]));
        assert!(!access.has_all_feature_access(&[PARTS_APPROVAL, BATCH_MANAGEMENT]));
        assert!(access.has_all_feature_access(&[INVENTORY, BATCH_MANAGEMENT, TOOL_LOANS]));

        assert!(!access.has_any_feature_access(&[]));
        assert!(access.has_all_feature_access(&[]));
    }

    #[test]
    fn test_loading_and_failed_fail_closed() {
        let features = FeatureMap::standard();
        for state in [RoleState::Loading, RoleState::Failed("network".into())] {
            let access = Access::new(state, &features);
            assert!(!access.has_feature_access(JOB_CARDS));
            assert!(!access.has_any_feature_access(&[JOB_CARDS, INVENTORY]));
            assert!(!access.has_all_feature_access(&[]));
            assert!(access.enabled_features().is_empty());
        }
    }

    #[test]
    fn test_unknown_feature_is_off() {
        let features = FeatureMap::standard();
        let access = Access::new(ready(&[SystemRole::Admin.into()]), &features);
        assert!(!access.has_feature_access("launchMissiles"));
    }

    #[test]
    fn test_custom_feature() {
        let mut features = FeatureMap::standard();
        features.insert(
            "stores",
            Requirement::Any(vec![
                Requirement::role(SystemRole::Supervisor),
                Requirement::All(vec![
                    Requirement::role(RoleRef::custom("stores_clerk")),
                    Requirement::role(SystemRole::PartsApprover),
                ]),
            ]),
        );

        let clerk_only = Access::new(ready(&[RoleRef::custom("stores_clerk")]), &features);
        assert!(!clerk_only.has_feature_access("stores"));

        let clerk_approver = Access::new(
            ready(&[RoleRef::custom("stores_clerk"), SystemRole::PartsApprover.into()]),
            &features,
        );
        assert!(clerk_approver.has_feature_access("stores"));
        assert!(clerk_approver.has_custom_role("stores_clerk"));
    }

    #[test]
    fn test_empty_combinators() {
        let roles = RoleSet::default();
        assert!(!Requirement::Any(vec![]).is_satisfied_by(&roles));
        assert!(Requirement::All(vec![]).is_satisfied_by(&roles));
    }
}
