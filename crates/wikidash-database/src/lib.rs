//! # wikidash-database
//!
//! Persistence layer for wikidash. Declares the store traits the auth core
//! consumes, the PostgreSQL repositories implementing them, and in-memory
//! implementations for tests and single-node demo deployments.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod stores;

pub use stores::{RevocationRepository, RoleRepository, SessionRepository, UserStore};
