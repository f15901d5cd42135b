//! PostgreSQL repository implementations of the store traits.

pub mod revocation;
pub mod role;
pub mod session;
pub mod user;

pub use revocation::PgRevocationRepository;
pub use role::PgRoleRepository;
pub use session::PgSessionRepository;
pub use user::PgUserStore;
