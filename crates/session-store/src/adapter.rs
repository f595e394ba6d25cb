//! Storage adapter that keeps the refresh credential out of plain storage.
//!
//! [`SessionStorage`] presents the same [`KeyValueStorage`] interface as the
//! layer it wraps, but intercepts the persisted session envelope:
//! - on write, the refresh credential is moved into the secure vault and
//!   stripped from what lands in plain storage
//! - on read, the vault's credential is re-injected into the envelope before
//!   it is handed back
//!
//! General persistence on mobile is not guaranteed encrypted at rest, while
//! the vault is. On the web the vault is the no-op backend, so the credential
//! is simply never persisted client-side (HTTP-only cookie model).

use crate::{KeyValueStorage, StoreResult};
use serde_json::Value;
use std::sync::Arc;
use token_vault::TokenVault;
use tracing::{debug, warn};

/// JSON pointer parts of the envelope: `{"state": {"refreshToken": ...}}`.
const STATE_FIELD: &str = "state";
const REFRESH_TOKEN_FIELD: &str = "refreshToken";

/// Decorator routing the sensitive part of the session envelope to the vault.
pub struct SessionStorage {
    inner: Box<dyn KeyValueStorage>,
    vault: Arc<dyn TokenVault>,
}

impl SessionStorage {
    /// Compose the adapter over a plain storage backend and a vault.
    pub fn new(inner: Box<dyn KeyValueStorage>, vault: Arc<dyn TokenVault>) -> Self {
        Self { inner, vault }
    }
}

impl KeyValueStorage for SessionStorage {
    /// Read the envelope, re-injecting the vaulted refresh credential if the
    /// stored state lacks one.
    ///
    /// A stored value that is not valid JSON is treated as absent.
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let Some(raw) = self.inner.get_item(key)? else {
            return Ok(None);
        };

        let mut envelope: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %key, error = %err, "Malformed storage entry, treating as absent");
                return Ok(None);
            }
        };

        let Some(state) = envelope
            .get_mut(STATE_FIELD)
            .and_then(Value::as_object_mut)
        else {
            return Ok(Some(raw));
        };

        let has_token = state
            .get(REFRESH_TOKEN_FIELD)
            .is_some_and(|v| !v.is_null());

        if !has_token {
            if let Some(token) = self.vault.get()? {
                debug!(key = %key, "Re-injecting refresh credential from vault");
                state.insert(REFRESH_TOKEN_FIELD.to_string(), Value::String(token));
            }
        }

        Ok(Some(envelope.to_string()))
    }

    /// Write the envelope, first moving any refresh credential to the vault.
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut envelope: Value = serde_json::from_str(value)?;

        if let Some(state) = envelope
            .get_mut(STATE_FIELD)
            .and_then(Value::as_object_mut)
        {
            if let Some(token) = state
                .get(REFRESH_TOKEN_FIELD)
                .and_then(Value::as_str)
                .map(str::to_owned)
            {
                self.vault.save(&token)?;
                state.remove(REFRESH_TOKEN_FIELD);
            }
        }

        self.inner.set_item(key, &envelope.to_string())
    }

    /// Delete both the vault entry and the plain-storage entry.
    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.vault.clear()?;
        self.inner.remove_item(key)
    }
}
