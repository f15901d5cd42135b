//! Remote authentication provider — delegates credential verification to an
//! external identity service over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use wikidash_core::config::AuthConfig;
use wikidash_core::error::AppError;
use wikidash_core::result::AppResult;
use wikidash_entity::role::RoleBinding;

use super::{AuthenticationProvider, VerifiedIdentity};

/// Request body sent to the verification endpoint.
#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

/// Response body returned by the verification endpoint.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    valid: bool,
    user_id: Option<Uuid>,
    token_id: Option<Uuid>,
    #[serde(default)]
    session_id: Option<Uuid>,
    #[serde(default)]
    roles: Vec<RoleBinding>,
}

/// Verifies tokens by POSTing them to a remote verification service.
///
/// A definitive "not valid" answer from the service maps to
/// `Unauthenticated`. Transport failures and timeouts map to
/// `ExternalService` so the gate can fail closed without conflating an
/// outage with a bad credential in the logs.
#[derive(Debug, Clone)]
pub struct RemoteVerifyProvider {
    client: reqwest::Client,
    verify_url: String,
}

impl RemoteVerifyProvider {
    /// Creates a provider from auth configuration.
    ///
    /// Fails if `remote_verify_url` is unset or the HTTP client cannot be
    /// constructed.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let verify_url = config
            .remote_verify_url
            .clone()
            .ok_or_else(|| {
                AppError::configuration("remote_verify_url is required for the remote provider")
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.remote_timeout_ms))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    wikidash_core::error::ErrorKind::Configuration,
                    "Failed to build HTTP client",
                    e,
                )
            })?;

        Ok(Self { client, verify_url })
    }
}

#[async_trait]
impl AuthenticationProvider for RemoteVerifyProvider {
    async fn verify(&self, token: &str) -> AppResult<VerifiedIdentity> {
        let response = self
            .client
            .post(&self.verify_url)
            .json(&VerifyRequest { token })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Verification service unreachable");
                AppError::external_service("Verification service unreachable")
            })?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Verification service declined token");
            return Err(AppError::unauthenticated("Invalid or expired credential"));
        }

        let body: VerifyResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Verification service returned an unreadable body");
            AppError::external_service("Verification service returned an unreadable body")
        })?;

        if !body.valid {
            return Err(AppError::unauthenticated("Invalid or expired credential"));
        }

        let (user_id, token_id) = match (body.user_id, body.token_id) {
            (Some(user_id), Some(token_id)) => (user_id, token_id),
            _ => {
                warn!("Verification service omitted identity fields on a valid token");
                return Err(AppError::external_service(
                    "Verification service response incomplete",
                ));
            }
        };

        Ok(VerifiedIdentity {
            user_id,
            token_id,
            session_id: body.session_id,
            roles: body.roles,
        })
    }
}
