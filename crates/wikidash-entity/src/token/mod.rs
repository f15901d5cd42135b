//! Token revocation entities.

pub mod revocation;

pub use revocation::RevocationRecord;
