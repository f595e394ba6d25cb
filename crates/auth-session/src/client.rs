//! HTTP client for the backend auth API.
//!
//! Wraps the `/auth/*` endpoints behind the `AuthApi` trait. Every successful
//! exchange resolves to the same `SessionPayload` shape, delivered inside the
//! backend's standard response envelope.

use app_core::AppConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use session_store::{ApiError, ApiResult, AuthApi, LoginArtifact, SessionPayload};
use tracing::{debug, warn};

/// Longest error body excerpt surfaced to callers.
const ERROR_EXCERPT_LEN: usize = 200;

/// Auth API client.
#[derive(Clone)]
pub struct AuthClient {
    http_client: reqwest::Client,
    api_base_url: String,
    oauth_client_id: String,
}

/// Refresh exchange request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// ID-token exchange request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdTokenExchangeRequest<'a> {
    id_token: &'a str,
    client_id: &'a str,
}

/// Authorization-code exchange request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CodeExchangeRequest<'a> {
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_verifier: Option<&'a str>,
    client_id: &'a str,
}

/// Standard backend response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEnvelope<T> {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    data: Option<T>,
    #[allow(dead_code)]
    meta: Option<ResponseMeta>,
    error: Option<ApiErrorBody>,
}

/// Request metadata echoed by the backend.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseMeta {
    #[allow(dead_code)]
    timestamp: Option<String>,
    #[allow(dead_code)]
    request_id: Option<String>,
}

/// Error details carried by failure envelopes.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    #[allow(dead_code)]
    details: Option<serde_json::Value>,
}

impl AuthClient {
    /// Create a new auth client.
    ///
    /// # Arguments
    /// * `api_base_url` - Base URL of the backend API (e.g. `https://api.triplog.app`)
    /// * `oauth_client_id` - OAuth client identifier sent with token exchanges
    pub fn new(api_base_url: impl Into<String>, oauth_client_id: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client: reqwest::Client::new(),
            api_base_url,
            oauth_client_id: oauth_client_id.into(),
        }
    }

    /// Create a client from the application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.api_base_url, &config.oauth_client_id)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    /// Send a request whose success body is a session payload envelope.
    async fn send_session_request(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ApiResult<SessionPayload> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = %status, "Auth request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: readable_error(status, &body),
            });
        }

        let envelope: ApiEnvelope<SessionPayload> =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;

        match envelope.data {
            Some(payload) if envelope.success => Ok(payload),
            _ => Err(ApiError::Status {
                status: status.as_u16(),
                message: envelope
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Malformed authentication response".to_string()),
            }),
        }
    }
}

#[async_trait]
impl AuthApi for AuthClient {
    async fn refresh_session(&self, refresh_token: &str) -> ApiResult<SessionPayload> {
        let url = self.endpoint("/auth/refresh");
        debug!(url = %url, "Exchanging refresh credential");

        let request = self
            .http_client
            .post(&url)
            .json(&RefreshRequest { refresh_token });

        self.send_session_request(request).await
    }

    async fn notify_logout(&self, access_token: &str) -> ApiResult<()> {
        let url = self.endpoint("/auth/logout");
        debug!(url = %url, "Notifying backend of logout");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: readable_error(status, &body),
            });
        }

        Ok(())
    }

    async fn provider_login(&self, provider: &str) -> ApiResult<SessionPayload> {
        let url = self.endpoint(&format!("/auth/{provider}"));
        debug!(url = %url, "Starting provider login");

        let request = self.http_client.get(&url);
        self.send_session_request(request).await
    }

    async fn exchange_authorization(
        &self,
        provider: &str,
        artifact: &LoginArtifact,
    ) -> ApiResult<SessionPayload> {
        let request = match artifact {
            LoginArtifact::IdToken(id_token) => {
                let url = self.endpoint(&format!("/auth/{provider}/token"));
                debug!(url = %url, "Exchanging provider ID token");
                self.http_client.post(&url).json(&IdTokenExchangeRequest {
                    id_token,
                    client_id: &self.oauth_client_id,
                })
            }
            LoginArtifact::AuthorizationCode { code, verifier } => {
                let url = self.endpoint(&format!("/auth/{provider}/exchange"));
                debug!(url = %url, "Exchanging provider authorization code");
                self.http_client.post(&url).json(&CodeExchangeRequest {
                    code,
                    code_verifier: verifier.as_deref(),
                    client_id: &self.oauth_client_id,
                })
            }
        };

        self.send_session_request(request).await
    }
}

/// Build a user-presentable message from a failure response.
///
/// Prefers the envelope's message, then its error code, then a trimmed body
/// excerpt, then the HTTP reason phrase.
fn readable_error(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body) {
        if let Some(message) = envelope.message.filter(|m| !m.is_empty()) {
            return message;
        }
        if let Some(code) = envelope.error.and_then(|e| e.code) {
            return code;
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.chars().take(ERROR_EXCERPT_LEN).collect();
    }

    status
        .canonical_reason()
        .unwrap_or("Login failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = AuthClient::new("https://api.triplog.test/", "client-1");
        assert_eq!(
            client.endpoint("/auth/refresh"),
            "https://api.triplog.test/auth/refresh"
        );
    }

    #[test]
    fn test_envelope_decodes_success_payload() {
        let body = r#"{
            "success": true,
            "message": "ok",
            "data": {
                "user": {"id": "u1", "name": "Alex"},
                "accessToken": "at-1",
                "refreshToken": "rt-1"
            },
            "meta": {"timestamp": "2025-05-01T12:00:00Z", "requestId": "req-1"}
        }"#;

        let envelope: ApiEnvelope<SessionPayload> = serde_json::from_str(body).unwrap();
        assert!(envelope.success);
        let payload = envelope.data.unwrap();
        assert_eq!(payload.user.id, "u1");
        assert_eq!(payload.access_token, "at-1");
        assert_eq!(payload.refresh_token.as_deref(), Some("rt-1"));
    }

    #[test]
    fn test_envelope_decodes_failure_branch() {
        let body = r#"{
            "success": false,
            "message": "Invalid credentials",
            "data": null,
            "error": {"code": "AUTH_INVALID", "details": []}
        }"#;

        let envelope: ApiEnvelope<SessionPayload> = serde_json::from_str(body).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Invalid credentials"));
        assert_eq!(envelope.error.unwrap().code.as_deref(), Some("AUTH_INVALID"));
    }

    #[test]
    fn test_readable_error_prefers_envelope_message() {
        let status = reqwest::StatusCode::UNAUTHORIZED;
        let body = r#"{"success":false,"message":"Session expired"}"#;
        assert_eq!(readable_error(status, body), "Session expired");
    }

    #[test]
    fn test_readable_error_falls_back_to_error_code() {
        let status = reqwest::StatusCode::UNAUTHORIZED;
        let body = r#"{"success":false,"error":{"code":"AUTH_EXPIRED"}}"#;
        assert_eq!(readable_error(status, body), "AUTH_EXPIRED");
    }

    #[test]
    fn test_readable_error_falls_back_to_body_then_reason() {
        let status = reqwest::StatusCode::BAD_GATEWAY;
        assert_eq!(readable_error(status, "upstream down"), "upstream down");
        assert_eq!(readable_error(status, "   "), "Bad Gateway");
    }
}
