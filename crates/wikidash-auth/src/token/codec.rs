//! Token codec — issues and verifies signed, time-bounded credentials.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use wikidash_core::config::AuthConfig;
use wikidash_core::error::AppError;
use wikidash_entity::role::RoleBinding;

use super::claims::Claims;

/// Verification failure. Callers outside the auth core only ever see the
/// collapsed `Unauthenticated` form — no partial trust.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The signature does not match the configured secret.
    #[error("token signature invalid")]
    SignatureInvalid,
    /// The embedded expiry has passed.
    #[error("token expired")]
    Expired,
    /// The token structure could not be parsed.
    #[error("token malformed")]
    Malformed,
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        // Deliberately opaque: the same outcome for every failure mode.
        AppError::unauthenticated("Invalid or expired credential")
    }
}

/// Encodes and decodes signed identity tokens.
///
/// Pure over the injected secret and the clock; performs no I/O. The
/// revocation cross-check lives in the authentication provider.
#[derive(Clone)]
pub struct TokenCodec {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Default credential TTL.
    default_ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl TokenCodec {
    /// Creates a new codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            default_ttl: Duration::days(config.token_ttl_days as i64),
        }
    }

    /// The configured default TTL.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issues a signed, time-bounded credential. Expiry is issue time + ttl.
    pub fn issue(
        &self,
        user_id: Uuid,
        token_id: Uuid,
        ttl: Duration,
        roles: Vec<RoleBinding>,
    ) -> Result<String, AppError> {
        self.issue_with_session(user_id, token_id, None, ttl, roles)
    }

    /// Issues a credential carrying the session it was created with.
    pub fn issue_for_session(
        &self,
        user_id: Uuid,
        token_id: Uuid,
        session_id: Uuid,
        roles: Vec<RoleBinding>,
    ) -> Result<String, AppError> {
        self.issue_with_session(user_id, token_id, Some(session_id), self.default_ttl, roles)
    }

    fn issue_with_session(
        &self,
        user_id: Uuid,
        token_id: Uuid,
        session_id: Option<Uuid>,
        ttl: Duration,
        roles: Vec<RoleBinding>,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            jti: token_id,
            sid: session_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            roles,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Verifies a credential: signature, then expiry, then structure.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        TokenError::SignatureInvalid
                    }
                    _ => TokenError::Malformed,
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikidash_entity::role::RoleName;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(&AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        })
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let codec = codec("test-secret");
        let user_id = Uuid::new_v4();
        let token_id = Uuid::new_v4();
        let roles = vec![RoleBinding::new(RoleName::ChapterAdmin, Some(5))];

        let token = codec
            .issue(user_id, token_id, Duration::days(30), roles.clone())
            .unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.token_id(), token_id);
        assert_eq!(claims.roles, roles);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = codec("test-secret");
        // Past the 5-second leeway.
        let token = codec
            .issue(
                Uuid::new_v4(),
                Uuid::new_v4(),
                Duration::seconds(-30),
                vec![],
            )
            .unwrap();

        assert_eq!(codec.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = codec("secret-a");
        let verifier = codec("secret-b");
        let token = issuer
            .issue(Uuid::new_v4(), Uuid::new_v4(), Duration::days(1), vec![])
            .unwrap();

        assert_eq!(
            verifier.verify(&token).unwrap_err(),
            TokenError::SignatureInvalid
        );
    }

    #[test]
    fn test_garbage_rejected_as_malformed() {
        let codec = codec("test-secret");
        assert_eq!(
            codec.verify("not.a.token").unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_failure_is_opaque_to_callers() {
        let err: AppError = TokenError::Expired.into();
        assert!(err.is_unauthenticated());
        let err: AppError = TokenError::SignatureInvalid.into();
        assert!(err.is_unauthenticated());
    }

    #[test]
    fn test_session_token_carries_sid() {
        let codec = codec("test-secret");
        let session_id = Uuid::new_v4();
        let token = codec
            .issue_for_session(Uuid::new_v4(), Uuid::new_v4(), session_id, vec![])
            .unwrap();

        assert_eq!(codec.verify(&token).unwrap().sid, Some(session_id));
    }
}
