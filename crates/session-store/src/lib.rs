//! Process-wide session state for the Triplog client.
//!
//! This crate owns everything between the UI and the auth backend's wire
//! contract:
//! - The [`Session`] data model and its persisted envelope
//! - A generic [`KeyValueStorage`] seam with file and in-memory backends
//! - The [`SessionStorage`] adapter that routes the refresh credential to the
//!   secure vault instead of plain storage
//! - The [`SessionStore`] state container with an explicit FSM over
//!   {Hydrating, Authenticated, Unauthenticated}
//! - The [`AuthApi`] collaborator trait implemented by the HTTP auth client

mod adapter;
mod api;
mod fsm;
mod storage;
mod store;
mod user;

pub use adapter::SessionStorage;
pub use api::{ApiError, ApiResult, AuthApi, LoginArtifact, SessionPayload};
pub use fsm::{SessionMachine, SessionMachineInput, SessionMachineState, SessionPhase};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{
    PersistedState, Session, SessionChangedCallback, SessionEnvelope, SessionStore,
    ENVELOPE_VERSION, SESSION_STORE_KEY,
};
pub use user::UserProfile;

use thiserror::Error;

/// Error type for session store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// IO error from the key-value storage backend
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Secure vault error
    #[error("Vault error: {0}")]
    Vault(#[from] token_vault::VaultError),

    /// Attempted session transition not permitted by the state machine
    #[error("Invalid session transition: {0}")]
    Transition(String),
}

/// Result type for session store operations.
pub type StoreResult<T> = Result<T, StoreError>;
