//! Request gate — the per-request authentication and authorization pipeline.
//!
//! Every protected request flows through the same sequence: extract the
//! credential, verify it, cross-check revocation, load the user, resolve
//! roles, authorize. The outcome is either a full [`AuthContext`] or a typed
//! failure; there is no partial admission.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};
use uuid::Uuid;

use wikidash_core::config::SessionConfig;
use wikidash_core::error::{AppError, ErrorKind};
use wikidash_core::result::AppResult;
use wikidash_database::UserStore;
use wikidash_entity::role::{Permission, RoleBinding, RoleName};
use wikidash_entity::session::Session;
use wikidash_entity::user::User;

use crate::provider::AuthenticationProvider;
use crate::roles::RoleManager;
use crate::session::SessionStore;

/// The resolved identity handed to route handlers after admission.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user.
    pub user: User,
    /// Current role bindings, resolved from the store at admission time.
    pub roles: Vec<RoleBinding>,
    /// The session the credential belongs to, when the credential carries
    /// one. Credentials verified by the remote service may not.
    pub session: Option<Session>,
    /// The id of the credential that was admitted.
    pub token_id: Uuid,
}

impl AuthContext {
    /// Whether the context holds any of the given roles in the scope.
    pub fn has_any_role(&self, roles: &[RoleName], chapter_id: Option<i64>) -> bool {
        self.roles
            .iter()
            .any(|b| b.applies_to(chapter_id) && roles.contains(&b.role))
    }
}

/// The answer to a permission probe: who asked, and whether they hold it.
#[derive(Debug, Clone)]
pub struct PermissionCheck {
    /// The authenticated user.
    pub user: User,
    /// Whether the permission is held in the requested scope.
    pub has_permission: bool,
}

/// Runs the admission pipeline for each request.
///
/// Store lookups are bounded by a per-request timeout; on timeout or store
/// fault the gate fails closed and the caller sees `Unauthenticated`.
#[derive(Clone)]
pub struct AuthGate {
    provider: Arc<dyn AuthenticationProvider>,
    users: Arc<dyn UserStore>,
    sessions: SessionStore,
    roles: RoleManager,
    store_timeout: Duration,
}

impl AuthGate {
    /// Creates a new gate.
    pub fn new(
        provider: Arc<dyn AuthenticationProvider>,
        users: Arc<dyn UserStore>,
        sessions: SessionStore,
        roles: RoleManager,
        config: &SessionConfig,
    ) -> Self {
        Self {
            provider,
            users,
            sessions,
            roles,
            store_timeout: Duration::from_millis(config.store_timeout_ms),
        }
    }

    /// Runs extraction-to-admission for a bearer credential.
    ///
    /// `token` is the raw credential pulled from the `Authorization` header
    /// or the auth cookie by the transport layer; `None` means no credential
    /// was presented.
    pub async fn authenticate(&self, token: Option<&str>) -> AppResult<AuthContext> {
        self.admit(token).await.map_err(fail_closed)
    }

    /// Admits only if the context holds at least one of `roles` in the scope.
    pub async fn require_any_role(
        &self,
        token: Option<&str>,
        roles: &[RoleName],
        chapter_id: Option<i64>,
    ) -> AppResult<AuthContext> {
        let context = self.authenticate(token).await?;
        if !context.has_any_role(roles, chapter_id) {
            debug!(user_id = %context.user.id, required = ?roles, "Role requirement not met");
            return Err(AppError::forbidden("Insufficient role"));
        }
        Ok(context)
    }

    /// Authenticates and reports whether the permission is held.
    ///
    /// A missing permission is an answer, not a failure; only credential
    /// defects error.
    pub async fn check_permission(
        &self,
        token: Option<&str>,
        permission: Permission,
        chapter_id: Option<i64>,
    ) -> AppResult<PermissionCheck> {
        let context = self.authenticate(token).await?;
        let has_permission = context
            .roles
            .iter()
            .any(|b| {
                b.applies_to(chapter_id)
                    && self.roles.policies().has_permission(b.role, permission)
            });
        Ok(PermissionCheck {
            user: context.user,
            has_permission,
        })
    }

    /// Fast existence gate for a session id cookie: is the session live?
    pub async fn session_exists(&self, session_id: Uuid) -> AppResult<bool> {
        self.bounded(self.sessions.is_valid(session_id))
            .await
            .map_err(fail_closed)
    }

    async fn admit(&self, token: Option<&str>) -> AppResult<AuthContext> {
        let token = token.ok_or_else(|| AppError::unauthenticated("Missing credential"))?;

        // Verify + revocation cross-check live in the provider.
        let identity = self.bounded(self.provider.verify(token)).await?;

        let user = self
            .bounded(self.users.find_by_id(identity.user_id))
            .await?
            .ok_or_else(|| AppError::unauthenticated("Unknown user"))?;
        if !user.can_login() {
            return Err(AppError::unauthenticated("Account is not active"));
        }

        // A credential bound to a session dies with that session.
        let session = match identity.session_id {
            Some(session_id) => {
                let session = self
                    .bounded(self.sessions.get(session_id))
                    .await?
                    .filter(Session::is_live)
                    .ok_or_else(|| AppError::unauthenticated("Session is no longer valid"))?;
                Some(session)
            }
            None => None,
        };

        // Authorization works off the store, not the token snapshot.
        let roles = self.bounded(self.roles.get_user_roles(user.id)).await?;

        if let Some(session) = &session {
            // Best effort; an admitted request never fails on bookkeeping.
            if let Err(e) = self.sessions.touch_activity(session.id).await {
                debug!(session_id = %session.id, error = %e, "Failed to touch session activity");
            }
        }

        Ok(AuthContext {
            user,
            roles,
            session,
            token_id: identity.token_id,
        })
    }

    async fn bounded<T, F>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::store_unavailable("Store lookup timed out")),
        }
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

/// Collapses infrastructure faults into an opaque 401 for protected routes.
///
/// The detailed cause is logged here; the caller only learns that the
/// request is not authenticated.
fn fail_closed(err: AppError) -> AppError {
    match err.kind {
        ErrorKind::Unauthenticated | ErrorKind::Forbidden => err,
        ErrorKind::StoreUnavailable | ErrorKind::Database | ErrorKind::ExternalService => {
            error!(kind = %err.kind, error = %err, "Auth store fault; failing closed");
            AppError::unauthenticated("Authentication is temporarily unavailable")
        }
        _ => {
            error!(kind = %err.kind, error = %err, "Unexpected auth pipeline failure");
            AppError::unauthenticated("Invalid or expired credential")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    use wikidash_core::config::AuthConfig;
    use wikidash_database::memory::{
        MemoryRevocationRepository, MemoryRoleRepository, MemorySessionRepository,
        MemoryUserStore,
    };
    use wikidash_database::RoleRepository;
    use wikidash_entity::role::RoleAssignment;

    use crate::provider::LocalTokenProvider;
    use crate::token::TokenCodec;

    struct Harness {
        gate: AuthGate,
        codec: TokenCodec,
        sessions: SessionStore,
        users: Arc<MemoryUserStore>,
        roles: Arc<MemoryRoleRepository>,
    }

    fn harness() -> Harness {
        let codec = TokenCodec::new(&AuthConfig {
            jwt_secret: "test-secret-at-least-32-bytes-long!".to_string(),
            ..Default::default()
        });
        let users = Arc::new(MemoryUserStore::new());
        let roles = Arc::new(MemoryRoleRepository::new());
        let sessions = SessionStore::new(
            Arc::new(MemorySessionRepository::new()),
            Arc::new(MemoryRevocationRepository::new()),
            SessionConfig::default(),
        );
        let manager = RoleManager::new(
            roles.clone(),
            users.clone(),
            codec.clone(),
            &SessionConfig::default(),
        );
        let provider = Arc::new(LocalTokenProvider::new(codec.clone(), sessions.clone()));
        let gate = AuthGate::new(
            provider,
            users.clone(),
            sessions.clone(),
            manager,
            &SessionConfig::default(),
        );
        Harness {
            gate,
            codec,
            sessions,
            users,
            roles,
        }
    }

    /// User store whose lookups fault (optionally after a delay), standing
    /// in for a database outage.
    struct FaultyUserStore {
        delay: Option<Duration>,
    }

    #[async_trait::async_trait]
    impl UserStore for FaultyUserStore {
        async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<User>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Err(AppError::new(ErrorKind::Database, "connection refused"))
        }

        async fn find_by_username(&self, _username: &str) -> AppResult<Option<User>> {
            Err(AppError::new(ErrorKind::Database, "connection refused"))
        }

        async fn update_last_login(
            &self,
            _id: Uuid,
            _at: chrono::DateTime<Utc>,
        ) -> AppResult<()> {
            Ok(())
        }
    }

    fn gate_over(users: Arc<dyn UserStore>, config: SessionConfig) -> (AuthGate, TokenCodec) {
        let codec = TokenCodec::new(&AuthConfig {
            jwt_secret: "test-secret-at-least-32-bytes-long!".to_string(),
            ..Default::default()
        });
        let sessions = SessionStore::new(
            Arc::new(MemorySessionRepository::new()),
            Arc::new(MemoryRevocationRepository::new()),
            config.clone(),
        );
        let manager = RoleManager::new(
            Arc::new(MemoryRoleRepository::new()),
            users.clone(),
            codec.clone(),
            &config,
        );
        let provider = Arc::new(LocalTokenProvider::new(codec.clone(), sessions.clone()));
        let gate = AuthGate::new(provider, users, sessions, manager, &config);
        (gate, codec)
    }

    fn test_user(active: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: Some("alice@example.org".to_string()),
            password_hash: "hash".to_string(),
            active,
            claimed: true,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    async fn login(h: &Harness, user: &User) -> (String, Session) {
        let session = h
            .sessions
            .create(user.id, Uuid::new_v4(), None, "127.0.0.1".to_string(), None)
            .await
            .unwrap();
        let token = h
            .codec
            .issue_for_session(user.id, session.token_id, session.id, vec![])
            .unwrap();
        (token, session)
    }

    #[tokio::test]
    async fn test_admit_resolves_user_roles_and_session() {
        let h = harness();
        let user = test_user(true);
        h.users.put(user.clone()).await;
        h.roles
            .insert(&RoleAssignment {
                user_id: user.id,
                role: RoleName::ChapterStaff,
                chapter_id: Some(3),
                assigned_by: Uuid::new_v4(),
                assigned_at: Utc::now(),
            })
            .await
            .unwrap();
        let (token, session) = login(&h, &user).await;

        let context = h.gate.authenticate(Some(&token)).await.unwrap();
        assert_eq!(context.user.id, user.id);
        assert_eq!(context.roles.len(), 1);
        assert_eq!(context.session.unwrap().id, session.id);
    }

    #[tokio::test]
    async fn test_missing_credential_is_unauthenticated() {
        let h = harness();
        let err = h.gate.authenticate(None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_blacklisted_token_is_rejected_at_the_gate() {
        let h = harness();
        let user = test_user(true);
        h.users.put(user.clone()).await;
        let (token, session) = login(&h, &user).await;

        h.gate.authenticate(Some(&token)).await.unwrap();
        h.sessions
            .blacklist_token(session.token_id, user.id, "logout")
            .await
            .unwrap();

        let err = h.gate.authenticate(Some(&token)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_revoked_session_kills_its_credential() {
        let h = harness();
        let user = test_user(true);
        h.users.put(user.clone()).await;
        let (token, session) = login(&h, &user).await;

        h.sessions.revoke(session.id).await.unwrap();

        let err = h.gate.authenticate(Some(&token)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_inactive_user_is_rejected() {
        let h = harness();
        let user = test_user(false);
        h.users.put(user.clone()).await;
        let (token, _) = login(&h, &user).await;

        let err = h.gate.authenticate(Some(&token)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_unknown_user_is_rejected() {
        let h = harness();
        let orphan = Uuid::new_v4();
        let token = h
            .codec
            .issue(orphan, Uuid::new_v4(), chrono::Duration::hours(1), vec![])
            .unwrap();

        let err = h.gate.authenticate(Some(&token)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_require_any_role_scoping() {
        let h = harness();
        let user = test_user(true);
        h.users.put(user.clone()).await;
        h.roles
            .insert(&RoleAssignment {
                user_id: user.id,
                role: RoleName::ChapterModerator,
                chapter_id: Some(5),
                assigned_by: Uuid::new_v4(),
                assigned_at: Utc::now(),
            })
            .await
            .unwrap();
        let (token, _) = login(&h, &user).await;

        h.gate
            .require_any_role(
                Some(&token),
                &[RoleName::ChapterModerator, RoleName::ChapterAdmin],
                Some(5),
            )
            .await
            .unwrap();

        let err = h
            .gate
            .require_any_role(Some(&token), &[RoleName::ChapterModerator], Some(6))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_check_permission_reports_instead_of_failing() {
        let h = harness();
        let user = test_user(true);
        h.users.put(user.clone()).await;
        let (token, _) = login(&h, &user).await;

        let check = h
            .gate
            .check_permission(Some(&token), Permission::ManageRoles, Some(5))
            .await
            .unwrap();
        assert_eq!(check.user.id, user.id);
        assert!(!check.has_permission);
    }

    #[tokio::test]
    async fn test_store_fault_surfaces_as_unauthenticated() {
        let users = Arc::new(FaultyUserStore { delay: None });
        let (gate, codec) = gate_over(users, SessionConfig::default());
        let token = codec
            .issue(
                Uuid::new_v4(),
                Uuid::new_v4(),
                chrono::Duration::hours(1),
                vec![],
            )
            .unwrap();

        let err = gate.authenticate(Some(&token)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
        // The underlying fault is logged, not surfaced.
        assert_eq!(err.message, "Authentication is temporarily unavailable");
    }

    #[tokio::test]
    async fn test_store_timeout_fails_closed() {
        let users = Arc::new(FaultyUserStore {
            delay: Some(Duration::from_millis(500)),
        });
        let config = SessionConfig {
            store_timeout_ms: 20,
            ..SessionConfig::default()
        };
        let (gate, codec) = gate_over(users, config);
        let token = codec
            .issue(
                Uuid::new_v4(),
                Uuid::new_v4(),
                chrono::Duration::hours(1),
                vec![],
            )
            .unwrap();

        let err = gate.authenticate(Some(&token)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
        assert_eq!(err.message, "Authentication is temporarily unavailable");
    }

    #[tokio::test]
    async fn test_token_roles_are_a_snapshot_not_the_truth() {
        let h = harness();
        let user = test_user(true);
        h.users.put(user.clone()).await;
        let (token, _) = login(&h, &user).await;

        // Token carries no roles, but the store does: the gate sees them.
        h.roles
            .insert(&RoleAssignment {
                user_id: user.id,
                role: RoleName::ChapterAdmin,
                chapter_id: Some(9),
                assigned_by: Uuid::new_v4(),
                assigned_at: Utc::now(),
            })
            .await
            .unwrap();

        let context = h.gate.authenticate(Some(&token)).await.unwrap();
        assert_eq!(
            context.roles,
            vec![RoleBinding::new(RoleName::ChapterAdmin, Some(9))]
        );
    }
}
