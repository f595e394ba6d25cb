//! App-facing auth session orchestration.
//!
//! The manager owns the flows that touch both the network and the store:
//! hydration at app start, interactive login, and logout. The store itself
//! never initiates navigation; the manager returns the route for the caller
//! to act on.

use crate::{AuthError, AuthResult};
use session_store::{
    ApiError, AuthApi, LoginArtifact, Session, SessionPayload, SessionPhase, SessionStore,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Route consumers navigate to after logout.
pub const LANDING_ROUTE: &str = "/";

/// Orchestrates hydration, login, and logout over the session store.
pub struct SessionManager {
    store: Arc<SessionStore>,
    api: Arc<dyn AuthApi>,
}

impl SessionManager {
    /// Create a manager over a store and an auth API collaborator.
    pub fn new(store: Arc<SessionStore>, api: Arc<dyn AuthApi>) -> Self {
        Self { store, api }
    }

    /// The session store, for consumers that subscribe to session state.
    pub fn store(&self) -> Arc<SessionStore> {
        self.store.clone()
    }

    /// Run the app-start hydration.
    ///
    /// Never fails: any storage or network problem resolves to the
    /// unauthenticated state. When this returns, startup gating (the splash
    /// screen) may end and the returned phase can drive initial navigation.
    pub async fn start(&self) -> SessionPhase {
        if let Err(err) = self
            .store
            .hydrate_from_refresh_token(self.api.as_ref())
            .await
        {
            warn!(error = %err, "Hydration failed, continuing unauthenticated");
        }

        let phase = self.store.phase();
        info!(phase = ?phase, "Startup hydration complete");
        phase
    }

    /// Interactive login through the provider's credentialed entry point.
    ///
    /// The backend performs the provider redirect dance and answers with the
    /// session payload directly.
    pub async fn login_with_provider(&self, provider: &str) -> AuthResult<Session> {
        debug!(provider = %provider, "Interactive provider login");

        let payload = self
            .api
            .provider_login(provider)
            .await
            .map_err(|e| login_error(provider, e))?;

        self.adopt(payload)
    }

    /// Interactive login by forwarding an authorization artifact (ID token or
    /// code + verifier) obtained from the provider's consent flow.
    pub async fn login_with_exchange(
        &self,
        provider: &str,
        artifact: LoginArtifact,
    ) -> AuthResult<Session> {
        debug!(provider = %provider, "Exchanging provider authorization artifact");

        let payload = self
            .api
            .exchange_authorization(provider, &artifact)
            .await
            .map_err(|e| login_error(provider, e))?;

        self.adopt(payload)
    }

    /// End the session.
    ///
    /// Best-effort notifies the backend, then unconditionally clears local
    /// and persisted state. Never fails; the returned route is where
    /// navigation should land.
    pub async fn logout(&self) -> &'static str {
        if let Some(access_token) = self.store.access_token() {
            if let Err(err) = self.api.notify_logout(&access_token).await {
                debug!(error = %err, "Logout notification failed, proceeding with local logout");
            }
        }

        if let Err(err) = self.store.logout() {
            warn!(error = %err, "Failed to clear persisted session during logout");
        }

        LANDING_ROUTE
    }

    /// Both login protocols converge here.
    fn adopt(&self, payload: SessionPayload) -> AuthResult<Session> {
        self.store
            .login(payload.user, payload.access_token, payload.refresh_token)?;
        Ok(self.store.snapshot())
    }
}

/// Map an API failure to the user-presentable login error.
fn login_error(provider: &str, err: ApiError) -> AuthError {
    match err {
        ApiError::Status { message, .. } if !message.is_empty() => AuthError::LoginFailed(message),
        ApiError::Status { status, .. } => {
            AuthError::LoginFailed(format!("{provider} login failed (HTTP {status})"))
        }
        ApiError::Transport(_) => {
            AuthError::LoginFailed("Network error, please try again.".to_string())
        }
        ApiError::Decode(_) => {
            AuthError::LoginFailed("Unexpected response from server, please try again.".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use session_store::{
        ApiResult, KeyValueStorage, MemoryStorage, SessionStorage, UserProfile, SESSION_STORE_KEY,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use token_vault::{MemoryVault, TokenVault};

    /// Scripted auth API for orchestration tests.
    #[derive(Default)]
    struct ScriptedApi {
        refresh: Mutex<Option<ApiResult<SessionPayload>>>,
        login: Mutex<Option<ApiResult<SessionPayload>>>,
        logout_fails: bool,
        refresh_calls: AtomicUsize,
        logout_calls: AtomicUsize,
    }

    impl ScriptedApi {
        fn not_scripted<T>() -> ApiResult<T> {
            Err(ApiError::Status {
                status: 500,
                message: "not scripted".to_string(),
            })
        }
    }

    #[async_trait]
    impl AuthApi for ScriptedApi {
        async fn refresh_session(&self, _refresh_token: &str) -> ApiResult<SessionPayload> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            self.refresh
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(Self::not_scripted)
        }

        async fn notify_logout(&self, _access_token: &str) -> ApiResult<()> {
            self.logout_calls.fetch_add(1, Ordering::SeqCst);
            if self.logout_fails {
                Err(ApiError::Transport("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        async fn provider_login(&self, _provider: &str) -> ApiResult<SessionPayload> {
            self.login
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(Self::not_scripted)
        }

        async fn exchange_authorization(
            &self,
            _provider: &str,
            _artifact: &LoginArtifact,
        ) -> ApiResult<SessionPayload> {
            self.login
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(Self::not_scripted)
        }
    }

    struct Harness {
        plain: Arc<MemoryStorage>,
        vault: Arc<MemoryVault>,
        api: Arc<ScriptedApi>,
        manager: SessionManager,
    }

    fn harness(api: ScriptedApi) -> Harness {
        let plain = Arc::new(MemoryStorage::new());
        let vault = Arc::new(MemoryVault::new());
        let storage = SessionStorage::new(Box::new(plain.clone()), vault.clone());
        let store = Arc::new(SessionStore::new(storage));
        let api = Arc::new(api);
        let manager = SessionManager::new(store, api.clone());
        Harness {
            plain,
            vault,
            api,
            manager,
        }
    }

    fn payload(user_id: &str) -> SessionPayload {
        SessionPayload {
            user: UserProfile::with_id(user_id),
            access_token: "at-1".to_string(),
            refresh_token: Some("rt-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_start_without_credential_settles_unauthenticated() {
        let h = harness(ScriptedApi::default());

        let phase = h.manager.start().await;

        assert_eq!(phase, SessionPhase::Unauthenticated);
        assert!(h.manager.store().has_hydrated());
        assert_eq!(h.api.refresh_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_start_restores_session_from_stored_credential() {
        let api = ScriptedApi {
            refresh: Mutex::new(Some(Ok(payload("u1")))),
            ..Default::default()
        };
        let h = harness(api);
        h.plain
            .set_item(
                SESSION_STORE_KEY,
                r#"{"state":{"isAuthenticated":true},"version":1}"#,
            )
            .unwrap();
        h.vault.save("rt-123").unwrap();

        let phase = h.manager.start().await;

        assert_eq!(phase, SessionPhase::Authenticated);
        assert_eq!(h.manager.store().user().unwrap().id, "u1");
    }

    #[tokio::test]
    async fn test_login_with_provider_establishes_session() {
        let api = ScriptedApi {
            login: Mutex::new(Some(Ok(payload("u1")))),
            ..Default::default()
        };
        let h = harness(api);
        h.manager.start().await;

        let session = h.manager.login_with_provider("google").await.unwrap();

        assert!(session.is_authenticated);
        assert_eq!(session.user.unwrap().id, "u1");
        assert!(h.plain.get_item(SESSION_STORE_KEY).unwrap().is_some());
        assert_eq!(h.vault.get().unwrap(), Some("rt-1".to_string()));
    }

    #[tokio::test]
    async fn test_failed_login_surfaces_message_and_leaves_no_state() {
        let api = ScriptedApi {
            login: Mutex::new(Some(Err(ApiError::Status {
                status: 401,
                message: "Invalid credentials".to_string(),
            }))),
            ..Default::default()
        };
        let h = harness(api);
        h.manager.start().await;

        let err = h.manager.login_with_provider("google").await.unwrap_err();

        match err {
            AuthError::LoginFailed(message) => assert_eq!(message, "Invalid credentials"),
            other => panic!("Expected LoginFailed, got {other:?}"),
        }
        assert!(!h.manager.store().is_authenticated());
        assert!(h.plain.is_empty());
    }

    #[tokio::test]
    async fn test_failed_login_on_transport_error_is_readable() {
        let api = ScriptedApi {
            login: Mutex::new(Some(Err(ApiError::Transport("dns failure".to_string())))),
            ..Default::default()
        };
        let h = harness(api);
        h.manager.start().await;

        let err = h
            .manager
            .login_with_exchange(
                "google",
                LoginArtifact::IdToken("id-token".to_string()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::LoginFailed(_)));
    }

    #[tokio::test]
    async fn test_logout_notifies_backend_and_clears_state() {
        let api = ScriptedApi {
            login: Mutex::new(Some(Ok(payload("u1")))),
            ..Default::default()
        };
        let h = harness(api);
        h.manager.start().await;
        h.manager.login_with_provider("google").await.unwrap();

        let route = h.manager.logout().await;

        assert_eq!(route, LANDING_ROUTE);
        assert_eq!(h.api.logout_calls.load(Ordering::SeqCst), 1);
        assert!(!h.manager.store().is_authenticated());
        assert!(h.plain.is_empty());
        assert_eq!(h.vault.get().unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_swallows_notification_failure() {
        let api = ScriptedApi {
            login: Mutex::new(Some(Ok(payload("u1")))),
            logout_fails: true,
            ..Default::default()
        };
        let h = harness(api);
        h.manager.start().await;
        h.manager.login_with_provider("google").await.unwrap();

        let route = h.manager.logout().await;

        // The server being unreachable never traps the user in a session
        assert_eq!(route, LANDING_ROUTE);
        assert!(!h.manager.store().is_authenticated());
        assert!(h.plain.is_empty());
    }

    #[tokio::test]
    async fn test_logout_without_session_skips_notification() {
        let h = harness(ScriptedApi::default());
        h.manager.start().await;

        let route = h.manager.logout().await;

        assert_eq!(route, LANDING_ROUTE);
        assert_eq!(h.api.logout_calls.load(Ordering::SeqCst), 0);
    }
}
