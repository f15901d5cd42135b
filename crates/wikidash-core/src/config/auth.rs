//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
///
/// The JWT secret is injected here and handed to the token codec
/// constructor at startup. It is never read from ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Auth token TTL in days. Long-lived dashboard credential.
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: u64,
    /// Which verification path to use: `"local"` or `"remote"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Verify endpoint on the legacy auth domain, used when
    /// `provider = "remote"`.
    #[serde(default)]
    pub remote_verify_url: Option<String>,
    /// Timeout for remote verification calls, in milliseconds.
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_days: default_token_ttl_days(),
            provider: default_provider(),
            remote_verify_url: None,
            remote_timeout_ms: default_remote_timeout(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_token_ttl_days() -> u64 {
    30
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_remote_timeout() -> u64 {
    3000
}
