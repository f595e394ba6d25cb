//! Auth session orchestration for the Triplog client.
//!
//! This crate layers the app-facing flows over the session store:
//! - App-start hydration with splash gating
//! - Interactive login (credentialed provider entry point, or forwarding an
//!   authorization artifact to the backend's token exchange)
//! - Logout with best-effort backend notification
//!
//! It also provides [`AuthClient`], the reqwest implementation of the
//! `AuthApi` collaborator, and the composition root wiring config, storage,
//! vault, store, and manager together.

mod bootstrap;
mod client;
mod error;
mod manager;

pub use bootstrap::build_session_stack;
pub use client::AuthClient;
pub use error::{AuthError, AuthResult};
pub use manager::{SessionManager, LANDING_ROUTE};
