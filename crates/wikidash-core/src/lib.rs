//! # wikidash-core
//!
//! Core crate for the wikidash chapter dashboard backend. Contains the
//! configuration schemas, the unified error system, and the shared result
//! alias.
//!
//! This crate has **no** internal dependencies on other wikidash crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
