//! Auth API collaborator contract.
//!
//! The session store and manager never talk HTTP themselves; they call this
//! trait. The production implementation lives in the `auth-session` crate and
//! wraps the backend's `/auth/*` endpoints; tests substitute scripted mocks.

use crate::UserProfile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for auth API calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network or transport-level failure (connection refused, timeout, TLS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// Human-readable message extracted from the response, if any.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Result type for auth API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Session payload returned by every successful authentication exchange.
///
/// The refresh, login, and token-exchange endpoints all resolve to this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    /// Profile of the authenticated user.
    pub user: UserProfile,
    /// Short-lived credential for authorizing API calls.
    pub access_token: String,
    /// Rotated long-lived credential; absent when the server keeps the
    /// existing one (or manages it via cookie on the web).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Authorization artifact produced by a provider consent flow.
///
/// Which kind the backend expects depends on the provider integration.
#[derive(Debug, Clone)]
pub enum LoginArtifact {
    /// An OpenID Connect ID token obtained from the provider.
    IdToken(String),
    /// An authorization code, optionally with its PKCE verifier.
    AuthorizationCode {
        /// The authorization code from the redirect.
        code: String,
        /// The PKCE code verifier, when the flow used one.
        verifier: Option<String>,
    },
}

/// External auth API consumed by the session core.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange a refresh credential for a fresh session.
    ///
    /// Any non-2xx response is a refresh failure; the caller falls back to
    /// the unauthenticated state.
    async fn refresh_session(&self, refresh_token: &str) -> ApiResult<SessionPayload>;

    /// Tell the backend the session is ending. Best-effort; callers swallow
    /// failures.
    async fn notify_logout(&self, access_token: &str) -> ApiResult<()>;

    /// Same-origin credentialed login via the provider entry point
    /// (`GET /auth/<provider>`).
    async fn provider_login(&self, provider: &str) -> ApiResult<SessionPayload>;

    /// Forward a provider authorization artifact to the backend's
    /// token-exchange endpoint.
    async fn exchange_authorization(
        &self,
        provider: &str,
        artifact: &LoginArtifact,
    ) -> ApiResult<SessionPayload>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_payload_decodes_without_rotation() {
        let json = r#"{"user":{"id":"u1"},"accessToken":"at-1"}"#;
        let payload: SessionPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.user.id, "u1");
        assert_eq!(payload.access_token, "at-1");
        assert!(payload.refresh_token.is_none());
    }

    #[test]
    fn test_session_payload_decodes_with_rotation() {
        let json = r#"{"user":{"id":"u1"},"accessToken":"at-1","refreshToken":"rt-456"}"#;
        let payload: SessionPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.refresh_token.as_deref(), Some("rt-456"));
    }
}
