//! # wikidash-auth
//!
//! Authentication, session lifecycle, and role-based authorization for the
//! wikidash chapter dashboard.
//!
//! ## Modules
//!
//! - `token` — signed credential issuance and verification
//! - `session` — session lifecycle and token revocation records
//! - `roles` — role assignments, the static permission matrix, and the
//!   role manager
//! - `provider` — the `AuthenticationProvider` seam with local and remote
//!   implementations
//! - `gate` — the per-request authentication/authorization state machine

pub mod gate;
pub mod password;
pub mod provider;
pub mod roles;
pub mod session;
pub mod token;

pub use gate::{AuthContext, AuthGate, PermissionCheck};
pub use password::PasswordHasher;
pub use provider::{AuthenticationProvider, LocalTokenProvider, RemoteVerifyProvider};
pub use roles::{RoleManager, RolePolicies};
pub use session::SessionStore;
pub use token::{Claims, TokenCodec, TokenError};
