//! # wikidash-api
//!
//! HTTP API layer for wikidash built on Axum.
//!
//! Provides the REST endpoints for authentication, session management, and
//! role administration, plus extractors, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
