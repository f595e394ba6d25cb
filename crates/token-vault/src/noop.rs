//! No-op vault for the web platform.

use crate::{TokenVault, VaultResult};
use tracing::debug;

/// Vault variant for platforms where the refresh credential is managed
/// server-side.
///
/// On the web the backend sets the refresh credential as an HTTP-only cookie
/// and the browser attaches it to refresh requests automatically, so the
/// credential must never pass through application storage. All operations
/// succeed; `get` always reports absence.
#[derive(Debug, Default, Clone)]
pub struct NoopVault;

impl NoopVault {
    /// Create a new no-op vault.
    pub fn new() -> Self {
        Self
    }
}

impl TokenVault for NoopVault {
    fn save(&self, _token: &str) -> VaultResult<()> {
        debug!("Refresh credential is cookie-managed on this platform, not storing");
        Ok(())
    }

    fn get(&self) -> VaultResult<Option<String>> {
        Ok(None)
    }

    fn clear(&self) -> VaultResult<()> {
        Ok(())
    }
}
