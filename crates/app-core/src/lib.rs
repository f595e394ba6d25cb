//! Shared foundation for the Triplog client core.
//!
//! This crate provides:
//! - Application configuration (API base URL, OAuth client identifier)
//! - File system paths for client data
//! - Core error types
//! - Logging initialization

mod config;
mod error;
mod logging;
mod paths;

pub use config::{AppConfig, DEFAULT_API_BASE_URL, DEFAULT_LOG_LEVEL};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use paths::Paths;
