//! Session lifecycle and token revocation records.

pub mod store;

pub use store::SessionStore;
