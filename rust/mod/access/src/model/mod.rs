mod assignment;
mod role;

pub use assignment::RoleAssignment;
pub use role::{RoleRef, SystemRole, UnknownRole};
