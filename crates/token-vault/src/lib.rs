//! Secure storage for the refresh credential.
//!
//! General key-value persistence on the client is not guaranteed to be
//! encrypted at rest, so the long-lived refresh credential is routed here
//! instead. This crate provides platform-specific vault implementations:
//! - **macOS**: Keychain Access via `security-framework`
//! - **Linux**: Secret Service (GNOME Keyring / KWallet) via `secret-service`
//! - **Windows**: Credential Vault via the `windows` crate
//! - **Web (wasm32)**: a no-op vault — the server keeps the refresh
//!   credential in an HTTP-only cookie, so application code never sees it
//!
//! A missing token is a normal state, never an error.

mod memory;
mod noop;
mod traits;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "windows")]
mod windows;

pub use memory::MemoryVault;
pub use noop::NoopVault;
pub use traits::TokenVault;

use thiserror::Error;

/// Service name used for all vault operations.
pub const SERVICE_NAME: &str = "com.triplog.app";

/// Account/attribute key under which the refresh credential is stored.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Error type for vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Platform-specific storage error
    #[error("Platform vault error: {0}")]
    Platform(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Create the default platform-specific vault implementation.
pub fn create_vault() -> VaultResult<Box<dyn TokenVault>> {
    #[cfg(target_os = "macos")]
    {
        let vault = macos::KeychainVault::new(SERVICE_NAME)?;
        Ok(Box::new(vault))
    }

    #[cfg(target_os = "linux")]
    {
        let vault = linux::SecretServiceVault::new(SERVICE_NAME)?;
        Ok(Box::new(vault))
    }

    #[cfg(target_os = "windows")]
    {
        let vault = windows::CredentialVault::new(SERVICE_NAME)?;
        Ok(Box::new(vault))
    }

    // On the web the refresh credential lives in an HTTP-only cookie managed
    // by the server; the vault has nothing to hold.
    #[cfg(target_arch = "wasm32")]
    {
        Ok(Box::new(NoopVault::new()))
    }

    #[cfg(not(any(
        target_os = "macos",
        target_os = "linux",
        target_os = "windows",
        target_arch = "wasm32"
    )))]
    {
        Err(VaultError::Platform(
            "No secure vault implementation available for this platform".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_vault_roundtrip() {
        let vault = MemoryVault::new();

        assert_eq!(vault.get().unwrap(), None);

        vault.save("rt-abc").unwrap();
        assert_eq!(vault.get().unwrap(), Some("rt-abc".to_string()));

        // Overwrite
        vault.save("rt-def").unwrap();
        assert_eq!(vault.get().unwrap(), Some("rt-def".to_string()));

        vault.clear().unwrap();
        assert_eq!(vault.get().unwrap(), None);
    }

    #[test]
    fn test_memory_vault_clear_when_empty() {
        let vault = MemoryVault::new();
        vault.clear().unwrap();
        assert_eq!(vault.get().unwrap(), None);
    }

    #[test]
    fn test_noop_vault_never_holds_a_token() {
        let vault = NoopVault::new();

        vault.save("rt-abc").unwrap();
        assert_eq!(vault.get().unwrap(), None);

        vault.clear().unwrap();
        assert_eq!(vault.get().unwrap(), None);
    }
}
