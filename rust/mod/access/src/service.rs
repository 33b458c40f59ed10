use std::time::Duration;

use mro_client::ApiError;
use tracing::{debug, info, warn};

use crate::cache::{QueryCache, QueryStatus};
use crate::feature::{Access, FeatureMap};
use crate::model::{RoleAssignment, RoleRef};
use crate::roles::{RoleSet, RoleState};
use crate::store::RoleStore;

/// How long a loaded role set is served from cache (default: 5 min).
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(300);

/// Loads, caches and mutates role memberships, and answers access
/// questions through a [`FeatureMap`].
pub struct AccessService<S> {
    store: S,
    features: FeatureMap,
    cache: QueryCache<String, RoleSet>,
}

impl<S: RoleStore> AccessService<S> {
    pub fn new(store: S, features: FeatureMap) -> Self {
        Self::with_stale_after(store, features, DEFAULT_STALE_AFTER)
    }

    pub fn with_stale_after(store: S, features: FeatureMap, stale_after: Duration) -> Self {
        Self {
            store,
            features,
            cache: QueryCache::new(stale_after),
        }
    }

    pub fn features(&self) -> &FeatureMap {
        &self.features
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Role state for `user_id`, from cache when fresh.
    ///
    /// A failed read yields [`RoleState::Failed`], which denies every check.
    pub async fn load_roles(&self, user_id: &str) -> RoleState {
        if let Some(roles) = self.cache.fresh(&user_id.to_string()) {
            debug!(user_id, "roles served from cache");
            return RoleState::Ready(roles);
        }

        self.cache.begin_fetch(user_id.to_string());
        match self.store.fetch_assignments(user_id).await {
            Ok(rows) => {
                let roles = RoleSet::from_assignments(&rows);
                debug!(user_id, rows = rows.len(), "roles loaded");
                self.cache.complete(user_id.to_string(), roles.clone());
                RoleState::Ready(roles)
            }
            Err(e) => {
                warn!(user_id, error = %e, "failed to load roles");
                self.cache.fail(user_id.to_string(), e.to_string());
                RoleState::Failed(e.to_string())
            }
        }
    }

    /// What the cache currently says, without fetching.
    pub fn cached_state(&self, user_id: &str) -> RoleState {
        match self.cache.get(&user_id.to_string()) {
            Some(entry) => match (entry.status, entry.data) {
                (QueryStatus::Success, Some(roles)) => RoleState::Ready(roles),
                (QueryStatus::Error(message), _) => RoleState::Failed(message),
                _ => RoleState::Loading,
            },
            None => RoleState::Loading,
        }
    }

    /// Turn a role name from user input into a [`RoleRef`].
    ///
    /// System role names win. Anything else is looked up by name in the
    /// custom role table, and taken as a custom role id when no role has
    /// that name.
    pub async fn resolve_role(&self, name: &str) -> Result<RoleRef, ApiError> {
        match RoleRef::resolve(name) {
            RoleRef::Custom(given) => match self.store.custom_role_id(&given).await? {
                Some(id) => {
                    debug!(name = %given, %id, "custom role resolved by name");
                    Ok(RoleRef::Custom(id))
                }
                None => Ok(RoleRef::Custom(given)),
            },
            system => Ok(system),
        }
    }

    /// Access view for `user_id`, loading roles if needed.
    pub async fn access(&self, user_id: &str) -> Access<'_> {
        Access::new(self.load_roles(user_id).await, &self.features)
    }

    /// Grant `role`. On success the user's cached roles are refetched.
    pub async fn assign_role(&self, user_id: &str, role: &RoleRef) -> Result<RoleState, ApiError> {
        self.store
            .insert_assignment(&RoleAssignment::new(user_id, role))
            .await?;
        info!(user_id, %role, "role assigned");
        Ok(self.refresh(user_id).await)
    }

    /// Revoke `role`. Returns the rows removed (0 if the user did not hold
    /// it) and refetches the user's roles.
    pub async fn remove_role(&self, user_id: &str, role: &RoleRef) -> Result<usize, ApiError> {
        let removed = self.store.delete_assignment(user_id, role).await?;
        info!(user_id, %role, removed, "role removed");
        self.refresh(user_id).await;
        Ok(removed)
    }

    async fn refresh(&self, user_id: &str) -> RoleState {
        self.cache.invalidate(&user_id.to_string());
        self.load_roles(user_id).await
    }
}
