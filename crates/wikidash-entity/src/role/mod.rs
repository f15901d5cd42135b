//! Roles, permissions, and role assignments.

pub mod assignment;
pub mod name;
pub mod permission;

pub use assignment::{RoleAssignment, RoleBinding};
pub use name::RoleName;
pub use permission::Permission;
