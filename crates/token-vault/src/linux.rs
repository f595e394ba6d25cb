//! Linux Secret Service implementation.

use crate::{TokenVault, VaultError, VaultResult, REFRESH_TOKEN_KEY};
use secret_service::{blocking::SecretService, EncryptionType};
use std::collections::HashMap;
use tracing::debug;

/// Secret Service based vault for Linux.
pub struct SecretServiceVault {
    service_name: String,
}

impl SecretServiceVault {
    /// Create a new Secret Service vault instance.
    pub fn new(service_name: &str) -> VaultResult<Self> {
        // Verify we can connect to Secret Service
        SecretService::connect(EncryptionType::Dh).map_err(|e| {
            VaultError::Platform(format!("Failed to connect to Secret Service: {}", e))
        })?;

        Ok(Self {
            service_name: service_name.to_string(),
        })
    }

    fn with_collection<F, T>(&self, f: F) -> VaultResult<T>
    where
        F: FnOnce(&secret_service::blocking::Collection) -> VaultResult<T>,
    {
        let ss = SecretService::connect(EncryptionType::Dh)
            .map_err(|e| VaultError::Platform(e.to_string()))?;

        let collection = ss
            .get_default_collection()
            .map_err(|e| VaultError::Platform(e.to_string()))?;

        // Unlock the collection if needed
        if collection.is_locked().unwrap_or(false) {
            collection
                .unlock()
                .map_err(|e| VaultError::Platform(format!("Failed to unlock collection: {}", e)))?;
        }

        f(&collection)
    }

    fn build_attributes(&self) -> HashMap<&str, &str> {
        let mut attrs = HashMap::new();
        attrs.insert("service", self.service_name.as_str());
        attrs.insert("key", REFRESH_TOKEN_KEY);
        attrs
    }
}

impl TokenVault for SecretServiceVault {
    fn save(&self, token: &str) -> VaultResult<()> {
        debug!(service = %self.service_name, "Storing refresh credential in Secret Service");

        // Delete existing item first
        let _ = self.clear();

        self.with_collection(|collection| {
            let attrs = self.build_attributes();
            let label = format!("{}/{}", self.service_name, REFRESH_TOKEN_KEY);

            collection
                .create_item(
                    &label,
                    attrs,
                    token.as_bytes(),
                    true, // replace
                    "text/plain",
                )
                .map_err(|e| VaultError::Platform(e.to_string()))?;

            Ok(())
        })
    }

    fn get(&self) -> VaultResult<Option<String>> {
        debug!(service = %self.service_name, "Reading refresh credential from Secret Service");

        self.with_collection(|collection| {
            let attrs = self.build_attributes();

            let items = collection
                .search_items(attrs)
                .map_err(|e| VaultError::Platform(e.to_string()))?;

            if items.is_empty() {
                return Ok(None);
            }

            let secret = items[0]
                .get_secret()
                .map_err(|e| VaultError::Platform(e.to_string()))?;

            let value =
                String::from_utf8(secret).map_err(|e| VaultError::Encoding(e.to_string()))?;

            Ok(Some(value))
        })
    }

    fn clear(&self) -> VaultResult<()> {
        debug!(service = %self.service_name, "Deleting refresh credential from Secret Service");

        self.with_collection(|collection| {
            let attrs = self.build_attributes();

            let items = collection
                .search_items(attrs)
                .map_err(|e| VaultError::Platform(e.to_string()))?;

            if items.is_empty() {
                return Ok(());
            }

            items[0]
                .delete()
                .map_err(|e| VaultError::Platform(e.to_string()))?;

            Ok(())
        })
    }
}
