//! Role assignments, the static permission matrix, and the role manager.

pub mod manager;
pub mod policies;

pub use manager::RoleManager;
pub use policies::RolePolicies;
