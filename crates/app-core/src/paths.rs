//! File system paths for client data.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Directory name for client data under the user's home directory.
const BASE_DIR_NAME: &str = ".triplog";
/// Subdirectory holding the general key-value storage files.
const STORAGE_DIR_NAME: &str = "storage";

/// Manages file system paths for the client.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for client files (~/.triplog)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.triplog`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.triplog).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.triplog/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the key-value storage directory (~/.triplog/storage).
    pub fn storage_dir(&self) -> PathBuf {
        self.base_dir.join(STORAGE_DIR_NAME)
    }

    /// Create the directories this client writes into, if missing.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.storage_dir())?;
        Ok(())
    }
}
