//! Vault trait definition.

use crate::VaultResult;

/// Capability interface for storing the single refresh credential.
///
/// Implementations hold at most one token, keyed internally by a fixed
/// identifier. Absence of a token is a normal state and is reported as
/// `Ok(None)`, never as an error.
pub trait TokenVault: Send + Sync {
    /// Persist the refresh credential, replacing any previous value.
    fn save(&self, token: &str) -> VaultResult<()>;

    /// Retrieve the refresh credential, if one is stored.
    fn get(&self) -> VaultResult<Option<String>>;

    /// Delete the refresh credential. Clearing an empty vault succeeds.
    fn clear(&self) -> VaultResult<()>;
}
