//! Windows Credential Vault implementation.

use crate::{TokenVault, VaultError, VaultResult, REFRESH_TOKEN_KEY};
use tracing::debug;
use windows::{
    core::HSTRING,
    Security::Credentials::{PasswordCredential, PasswordVault},
};

/// HRESULT for ERROR_NOT_FOUND.
const ERROR_NOT_FOUND: u32 = 0x80070490;

/// Credential Vault based vault for Windows.
pub struct CredentialVault {
    resource_name: String,
}

impl CredentialVault {
    /// Create a new Credential Vault instance.
    pub fn new(service_name: &str) -> VaultResult<Self> {
        // Verify we can access the vault
        PasswordVault::new().map_err(|e| {
            VaultError::Platform(format!("Failed to access Credential Vault: {}", e))
        })?;

        Ok(Self {
            resource_name: service_name.to_string(),
        })
    }

    fn get_vault(&self) -> VaultResult<PasswordVault> {
        PasswordVault::new()
            .map_err(|e| VaultError::Platform(format!("Failed to access Credential Vault: {}", e)))
    }
}

impl TokenVault for CredentialVault {
    fn save(&self, token: &str) -> VaultResult<()> {
        debug!(resource = %self.resource_name, "Storing refresh credential in Credential Vault");

        let vault = self.get_vault()?;

        // Delete existing credential first (ignore errors if it doesn't exist)
        let _ = self.clear();

        let resource = HSTRING::from(&self.resource_name);
        let user_name = HSTRING::from(REFRESH_TOKEN_KEY);
        let password = HSTRING::from(token);

        let credential = PasswordCredential::CreatePasswordCredential(
            &resource, &user_name, &password,
        )
        .map_err(|e| VaultError::Platform(format!("Failed to create credential: {}", e)))?;

        vault
            .Add(&credential)
            .map_err(|e| VaultError::Platform(format!("Failed to add credential: {}", e)))?;

        Ok(())
    }

    fn get(&self) -> VaultResult<Option<String>> {
        debug!(resource = %self.resource_name, "Reading refresh credential from Credential Vault");

        let vault = self.get_vault()?;
        let resource = HSTRING::from(&self.resource_name);
        let user_name = HSTRING::from(REFRESH_TOKEN_KEY);

        match vault.Retrieve(&resource, &user_name) {
            Ok(credential) => {
                // RetrievePassword populates the Password field
                credential.RetrievePassword().map_err(|e| {
                    VaultError::Platform(format!("Failed to retrieve password: {}", e))
                })?;

                let password = credential
                    .Password()
                    .map_err(|e| VaultError::Platform(format!("Failed to get password: {}", e)))?;

                Ok(Some(password.to_string()))
            }
            Err(e) => {
                if e.code().0 as u32 == ERROR_NOT_FOUND {
                    Ok(None)
                } else {
                    Err(VaultError::Platform(format!(
                        "Failed to retrieve credential: {}",
                        e
                    )))
                }
            }
        }
    }

    fn clear(&self) -> VaultResult<()> {
        debug!(resource = %self.resource_name, "Deleting refresh credential from Credential Vault");

        let vault = self.get_vault()?;
        let resource = HSTRING::from(&self.resource_name);
        let user_name = HSTRING::from(REFRESH_TOKEN_KEY);

        match vault.Retrieve(&resource, &user_name) {
            Ok(credential) => {
                vault
                    .Remove(&credential)
                    .map_err(|e| VaultError::Platform(format!("Failed to remove credential: {}", e)))?;
                Ok(())
            }
            Err(e) => {
                if e.code().0 as u32 == ERROR_NOT_FOUND {
                    Ok(())
                } else {
                    Err(VaultError::Platform(format!(
                        "Failed to find credential for deletion: {}",
                        e
                    )))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_RESOURCE: &str = "com.triplog.app.test";

    #[test]
    #[ignore] // Requires Windows Credential Vault access
    fn test_credential_operations() {
        let vault = CredentialVault::new(TEST_RESOURCE).unwrap();

        // Clean up from previous test runs
        let _ = vault.clear();

        vault.save("test-token").unwrap();
        assert_eq!(vault.get().unwrap(), Some("test-token".to_string()));

        vault.save("rotated-token").unwrap();
        assert_eq!(vault.get().unwrap(), Some("rotated-token".to_string()));

        vault.clear().unwrap();
        assert_eq!(vault.get().unwrap(), None);
    }
}
