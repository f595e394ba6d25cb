//! Error types for auth orchestration.

use session_store::{ApiError, StoreError};
use thiserror::Error;

/// Error type for auth session operations.
///
/// Only [`AuthError::LoginFailed`] is meant for the user's eyes; it carries a
/// readable message for the login screen. Everything else stays at the
/// orchestration boundary and resolves to the unauthenticated state.
#[derive(Error, Debug)]
pub enum AuthError {
    /// An interactive login attempt failed. The message is user-presentable.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Auth API call failed
    #[error("Auth API error: {0}")]
    Api(#[from] ApiError),

    /// Session store or persistence failure
    #[error("Session store error: {0}")]
    Store(#[from] StoreError),

    /// Secure vault failure
    #[error("Vault error: {0}")]
    Vault(#[from] token_vault::VaultError),

    /// Configuration or path resolution failure
    #[error("Configuration error: {0}")]
    Core(#[from] app_core::CoreError),
}

/// Result type for auth session operations.
pub type AuthResult<T> = Result<T, AuthError>;
