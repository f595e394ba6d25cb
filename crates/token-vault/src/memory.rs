//! In-memory vault for tests and platforms without a secret store.

use crate::{TokenVault, VaultResult};
use std::sync::Mutex;

/// Process-local vault backed by a mutex-guarded slot.
///
/// Nothing is encrypted and nothing survives the process; intended for tests.
#[derive(Debug, Default)]
pub struct MemoryVault {
    token: Mutex<Option<String>>,
}

impl MemoryVault {
    /// Create an empty in-memory vault.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenVault for MemoryVault {
    fn save(&self, token: &str) -> VaultResult<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn get(&self) -> VaultResult<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn clear(&self) -> VaultResult<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}
