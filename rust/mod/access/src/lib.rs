//! Role-based access for the MRO app.
//!
//! Layers, bottom up:
//!
//! - [`RoleStore`]: `user_roles` rows (system role or custom role per row)
//! - [`RoleSet`] / [`RoleState`]: a user's loaded roles; anything but
//!   `Ready` denies every check
//! - [`FeatureMap`] / [`Access`]: named features as role requirements
//! - [`Gate`]: selects protected content or a fallback
//!
//! [`AccessService`] ties them together with a [`QueryCache`] keyed by user.

pub mod cache;
pub mod feature;
pub mod gate;
pub mod model;
pub mod roles;
pub mod service;
pub mod store;

pub use cache::{CacheEntry, QueryCache, QueryStatus};
pub use feature::{Access, FeatureMap, Requirement};
pub use gate::{Gate, GateSpec};
pub use model::{RoleAssignment, RoleRef, SystemRole, UnknownRole};
pub use roles::{RoleSet, RoleState};
pub use service::AccessService;
pub use store::{MemoryRoleStore, RestRoleStore, RoleStore};
