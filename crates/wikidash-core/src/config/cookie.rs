//! Cookie attributes for the auth token and session id cookies.

use serde::{Deserialize, Serialize};

/// Cookie configuration.
///
/// The auth cookie carries the signed token for browser clients that do not
/// send an `Authorization` header; the session cookie carries the opaque
/// session id for the fast existence gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Name of the auth token cookie.
    #[serde(default = "default_auth_cookie")]
    pub auth_name: String,
    /// Name of the session id cookie.
    #[serde(default = "default_session_cookie")]
    pub session_name: String,
    /// Cookie domain scope, e.g. `.wikidash.example.org`.
    #[serde(default)]
    pub domain: Option<String>,
    /// Whether to set the `Secure` attribute. Disable for local HTTP only.
    #[serde(default = "default_true")]
    pub secure: bool,
    /// Max-Age in days. Matches the token TTL.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            auth_name: default_auth_cookie(),
            session_name: default_session_cookie(),
            domain: None,
            secure: true,
            max_age_days: default_max_age_days(),
        }
    }
}

impl CookieConfig {
    /// Renders a `Set-Cookie` header value with the configured attributes:
    /// httpOnly, SameSite=Lax, Path=/, plus Secure and Domain when set.
    pub fn render(&self, name: &str, value: &str) -> String {
        let mut cookie = format!(
            "{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.max_age_days * 86_400
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        if let Some(domain) = &self.domain {
            cookie.push_str("; Domain=");
            cookie.push_str(domain);
        }
        cookie
    }

    /// Renders a `Set-Cookie` header value that clears the named cookie.
    pub fn render_removal(&self, name: &str) -> String {
        let mut cookie = format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
        if self.secure {
            cookie.push_str("; Secure");
        }
        if let Some(domain) = &self.domain {
            cookie.push_str("; Domain=");
            cookie.push_str(domain);
        }
        cookie
    }
}

fn default_auth_cookie() -> String {
    "wikidash_token".to_string()
}

fn default_session_cookie() -> String {
    "wikidash_session".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_age_days() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_attributes() {
        let config = CookieConfig {
            domain: Some(".wikidash.example.org".to_string()),
            ..CookieConfig::default()
        };
        let cookie = config.render("wikidash_token", "abc");
        assert!(cookie.starts_with("wikidash_token=abc; "));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Domain=.wikidash.example.org"));
    }

    #[test]
    fn test_render_removal_expires_immediately() {
        let config = CookieConfig {
            secure: false,
            ..CookieConfig::default()
        };
        let cookie = config.render_removal("wikidash_token");
        assert!(cookie.contains("Max-Age=0"));
        assert!(!cookie.contains("Secure"));
    }
}
