//! Role membership storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use mro_client::{ApiError, RestClient};
use serde::Deserialize;
use tracing::warn;

use crate::model::{RoleAssignment, RoleRef, SystemRole};

pub const USER_ROLES_TABLE: &str = "user_roles";
pub const CUSTOM_ROLES_TABLE: &str = "custom_roles";

/// Where role memberships live.
///
/// Inserts are not deduplicated: a second identical assignment fails with
/// [`ApiError::Conflict`] from the store's uniqueness constraint.
#[async_trait::async_trait]
pub trait RoleStore: Send + Sync + 'static {
    async fn fetch_assignments(&self, user_id: &str) -> Result<Vec<RoleAssignment>, ApiError>;

    async fn insert_assignment(&self, assignment: &RoleAssignment) -> Result<(), ApiError>;

    /// Remove the `(user_id, role)` row. Returns the number of rows removed.
    async fn delete_assignment(&self, user_id: &str, role: &RoleRef) -> Result<usize, ApiError>;

    /// Id of the custom role named `name`, if there is one.
    async fn custom_role_id(&self, name: &str) -> Result<Option<String>, ApiError>;
}

// ── REST ────────────────────────────────────────────────────────────

/// `user_roles` over PostgREST, with custom role names joined in from
/// `custom_roles`.
pub struct RestRoleStore {
    client: Arc<RestClient>,
}

/// `user_roles` row as selected with the embedded `custom_roles(name)`.
#[derive(Debug, Deserialize)]
struct UserRoleRow {
    user_id: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    custom_role_id: Option<String>,
    #[serde(default)]
    custom_roles: Option<CustomRoleName>,
}

#[derive(Debug, Deserialize)]
struct CustomRoleName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CustomRoleId {
    id: String,
}

impl UserRoleRow {
    /// Rows naming a system role this build does not know are dropped.
    fn into_assignment(self) -> Option<RoleAssignment> {
        let role = match self.role.as_deref() {
            None => None,
            Some(name) => match name.parse::<SystemRole>() {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!(user_id = %self.user_id, error = %e, "ignoring role row");
                    return None;
                }
            },
        };
        Some(RoleAssignment {
            user_id: self.user_id,
            role,
            custom_role_id: self.custom_role_id,
            custom_role_name: self.custom_roles.map(|c| c.name),
        })
    }
}

impl RestRoleStore {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl RoleStore for RestRoleStore {
    async fn fetch_assignments(&self, user_id: &str) -> Result<Vec<RoleAssignment>, ApiError> {
        let rows: Vec<UserRoleRow> = self
            .client
            .select(
                USER_ROLES_TABLE,
                "user_id,role,custom_role_id,custom_roles(name)",
                &[("user_id", user_id)],
            )
            .await?;
        Ok(rows.into_iter().filter_map(UserRoleRow::into_assignment).collect())
    }

    async fn insert_assignment(&self, assignment: &RoleAssignment) -> Result<(), ApiError> {
        self.client.insert(USER_ROLES_TABLE, assignment).await
    }

    async fn delete_assignment(&self, user_id: &str, role: &RoleRef) -> Result<usize, ApiError> {
        let filters = match role {
            RoleRef::System(r) => [("user_id", user_id), ("role", r.as_str())],
            RoleRef::Custom(id) => [("user_id", user_id), ("custom_role_id", id.as_str())],
        };
        self.client.delete(USER_ROLES_TABLE, &filters).await
    }

    async fn custom_role_id(&self, name: &str) -> Result<Option<String>, ApiError> {
        let rows: Vec<CustomRoleId> = self
            .client
            .select(CUSTOM_ROLES_TABLE, "id", &[("name", name)])
            .await?;
        Ok(rows.into_iter().next().map(|row| row.id))
    }
}

// ── In-memory ───────────────────────────────────────────────────────

/// Process-local store with the same uniqueness rule as `user_roles`.
#[derive(Default)]
pub struct MemoryRoleStore {
    rows: Mutex<Vec<RoleAssignment>>,
    /// custom role id -> name, joined into fetched rows.
    custom_role_names: HashMap<String, String>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom role name, as `custom_roles` would hold it.
    pub fn with_custom_role(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.custom_role_names.insert(id.into(), name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl RoleStore for MemoryRoleStore {
    async fn fetch_assignments(&self, user_id: &str) -> Result<Vec<RoleAssignment>, ApiError> {
        let rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| {
                let mut row = row.clone();
                row.custom_role_name = row
                    .custom_role_id
                    .as_ref()
                    .and_then(|id| self.custom_role_names.get(id).cloned());
                row
            })
            .collect())
    }

    async fn insert_assignment(&self, assignment: &RoleAssignment) -> Result<(), ApiError> {
        let Some(role) = assignment.role_ref() else {
            return Err(ApiError::Server {
                status: 400,
                message: "assignment names no role".into(),
            });
        };
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        if rows
            .iter()
            .any(|row| row.user_id == assignment.user_id && row.grants(&role))
        {
            return Err(ApiError::Conflict(format!(
                "user {} already has role {}",
                assignment.user_id, role
            )));
        }
        rows.push(assignment.clone());
        Ok(())
    }

    async fn delete_assignment(&self, user_id: &str, role: &RoleRef) -> Result<usize, ApiError> {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        let before = rows.len();
        rows.retain(|row| !(row.user_id == user_id && row.grants(role)));
        Ok(before - rows.len())
    }

    async fn custom_role_id(&self, name: &str) -> Result<Option<String>, ApiError> {
        Ok(self
            .custom_role_names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryRoleStore::new().with_custom_role("cr-7", "stores_clerk");
        store
            .insert_assignment(&RoleAssignment::new("u1", &SystemRole::Admin.into()))
            .await
            .unwrap();
        store
            .insert_assignment(&RoleAssignment::new("u1", &RoleRef::custom("cr-7")))
            .await
            .unwrap();
        store
            .insert_assignment(&RoleAssignment::new("u2", &SystemRole::Supervisor.into()))
            .await
            .unwrap();

        let rows = store.fetch_assignments("u1").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].custom_role_name.as_deref(), Some("stores_clerk"));

        let removed = store
            .delete_assignment("u1", &SystemRole::Admin.into())
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 2);

        let removed = store
            .delete_assignment("u1", &SystemRole::Admin.into())
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn test_custom_role_id_by_name() {
        let store = MemoryRoleStore::new().with_custom_role("cr-7", "stores_clerk");
        assert_eq!(
            store.custom_role_id("stores_clerk").await.unwrap().as_deref(),
            Some("cr-7")
        );
        assert_eq!(store.custom_role_id("cr-7").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let store = MemoryRoleStore::new();
        let row = RoleAssignment::new("u1", &SystemRole::BatchManager.into());
        store.insert_assignment(&row).await.unwrap();
        let err = store.insert_assignment(&row).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rest_row_decoding() {
        let rows: Vec<UserRoleRow> = serde_json::from_str(
            r#"[
                {"user_id": "u1", "role": "parts_approver", "custom_role_id": null, "custom_roles": null},
                {"user_id": "u1", "role": null, "custom_role_id": "cr-7", "custom_roles": {"name": "stores_clerk"}},
                {"user_id": "u1", "role": "auditor", "custom_role_id": null, "custom_roles": null}
            ]"#,
        )
        .unwrap();
        let assignments: Vec<RoleAssignment> =
            rows.into_iter().filter_map(UserRoleRow::into_assignment).collect();
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].role, Some(SystemRole::PartsApprover));
        assert_eq!(assignments[1].custom_role_id.as_deref(), Some("cr-7"));
        assert_eq!(assignments[1].custom_role_name.as_deref(), Some("stores_clerk"));
    }
}
