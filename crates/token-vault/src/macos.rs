//! macOS Keychain implementation.

use crate::{TokenVault, VaultError, VaultResult, REFRESH_TOKEN_KEY};
use security_framework::item::{ItemClass, ItemSearchOptions, Limit, SearchResult};
use security_framework::passwords::{delete_generic_password, set_generic_password};
use tracing::debug;

/// Keychain-based vault for macOS.
///
/// The refresh credential is stored as a generic password under a fixed
/// service/account pair.
pub struct KeychainVault {
    service_name: String,
}

impl KeychainVault {
    /// Create a new Keychain vault instance.
    pub fn new(service_name: &str) -> VaultResult<Self> {
        Ok(Self {
            service_name: service_name.to_string(),
        })
    }

    fn search_keychain(&self) -> VaultResult<Option<String>> {
        let mut search = ItemSearchOptions::new();
        search
            .class(ItemClass::generic_password())
            .service(&self.service_name)
            .account(REFRESH_TOKEN_KEY)
            .limit(Limit::Max(1))
            .load_data(true);

        match search.search() {
            Ok(results) => {
                if let Some(SearchResult::Data(data)) = results.into_iter().next() {
                    let value = String::from_utf8(data)
                        .map_err(|e| VaultError::Encoding(e.to_string()))?;
                    return Ok(Some(value));
                }

                Ok(None)
            }
            Err(e) => {
                let error_str = e.to_string().to_lowercase();
                // "item not found" comes back in several forms
                if error_str.contains("not found")
                    || error_str.contains("could not be found")
                    || error_str.contains("-25300")
                {
                    Ok(None)
                } else {
                    Err(VaultError::Platform(format!(
                        "Failed to get keychain item: {}",
                        e
                    )))
                }
            }
        }
    }
}

impl TokenVault for KeychainVault {
    fn save(&self, token: &str) -> VaultResult<()> {
        debug!(service = %self.service_name, "Storing refresh credential in keychain");

        // Delete existing item first (ignore errors if it doesn't exist)
        let _ = delete_generic_password(&self.service_name, REFRESH_TOKEN_KEY);

        set_generic_password(&self.service_name, REFRESH_TOKEN_KEY, token.as_bytes())
            .map_err(|e| VaultError::Platform(format!("Failed to set keychain item: {}", e)))?;

        Ok(())
    }

    fn get(&self) -> VaultResult<Option<String>> {
        debug!(service = %self.service_name, "Reading refresh credential from keychain");
        self.search_keychain()
    }

    fn clear(&self) -> VaultResult<()> {
        debug!(service = %self.service_name, "Deleting refresh credential from keychain");

        match delete_generic_password(&self.service_name, REFRESH_TOKEN_KEY) {
            Ok(()) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("not found") || error_str.contains("-25300") {
                    Ok(())
                } else {
                    Err(VaultError::Platform(format!(
                        "Failed to delete keychain item: {}",
                        e
                    )))
                }
            }
        }
    }
}
