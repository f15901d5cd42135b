//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session TTL in days (absolute timeout).
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u64,
    /// Bounded timeout for store lookups on the request path, in
    /// milliseconds. On timeout the gate fails closed.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
    /// TTL for the cached role snapshot, in seconds.
    #[serde(default = "default_role_cache_ttl")]
    pub role_cache_ttl_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_ttl_days(),
            store_timeout_ms: default_store_timeout(),
            role_cache_ttl_seconds: default_role_cache_ttl(),
        }
    }
}

fn default_ttl_days() -> u64 {
    30
}

fn default_store_timeout() -> u64 {
    2000
}

fn default_role_cache_ttl() -> u64 {
    60
}
