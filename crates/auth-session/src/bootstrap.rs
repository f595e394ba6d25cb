//! Composition root for the session stack.

use crate::{AuthClient, AuthResult, SessionManager};
use app_core::{init_logging, AppConfig, Paths};
use session_store::{FileStorage, SessionStorage, SessionStore};
use std::sync::Arc;
use token_vault::create_vault;
use tracing::debug;

/// Wire up storage, vault, store, client, and manager from the app config.
///
/// Called once at process start, before first render. The returned manager's
/// [`SessionManager::start`](crate::SessionManager::start) drives hydration.
pub fn build_session_stack(config: &AppConfig) -> AuthResult<SessionManager> {
    init_logging(&config.log_level);

    let paths = Paths::new()?;
    paths.ensure_dirs()?;
    debug!(base_dir = %paths.base_dir().display(), "Session stack storage root");

    let storage = FileStorage::new(paths.storage_dir())?;
    let vault = create_vault()?;
    let session_storage = SessionStorage::new(Box::new(storage), Arc::from(vault));
    let store = Arc::new(SessionStore::new(session_storage));

    let client = AuthClient::from_config(config);
    Ok(SessionManager::new(store, Arc::new(client)))
}
