//! Notion credential storage.
//!
//! The sync engine and gateway read credentials through the
//! `CredentialStore` trait and never write them; the settings surface
//! owns writes via `FileCredentialStore::save`. Field names match the
//! settings form keys: `token` and `databaseId`.

use std::io;
use std::path::PathBuf;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// The two secrets required for any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotionCredentials {
    pub token: String,
    pub database_id: String,
}

impl NotionCredentials {
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            database_id: database_id.into(),
        }
    }

    /// Both fields present and non-blank. Whitespace-only values count
    /// as unset, matching the settings form which trims on save.
    pub fn is_complete(&self) -> bool {
        !self.token.trim().is_empty() && !self.database_id.trim().is_empty()
    }
}

/// Read-only credential provider injected into the gateway and the
/// sync engine. Absence of credentials is an expected state, not an
/// error, so `load` returns an `Option`.
pub trait CredentialStore: Send + Sync {
    /// Returns credentials only when both fields are configured.
    fn load(&self) -> Option<NotionCredentials>;
}

/// File-backed store at `<data dir>/credentials.json`.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store at the default location (`~/.focusdash/credentials.json`).
    pub fn new() -> Self {
        Self {
            path: crate::util::data_dir().join("credentials.json"),
        }
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persist credentials, trimming both fields first. Called by the
    /// settings surface only.
    pub fn save(&self, credentials: &NotionCredentials) -> io::Result<()> {
        let trimmed = NotionCredentials::new(
            credentials.token.trim(),
            credentials.database_id.trim(),
        );

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
                }
            }
        }

        let content = serde_json::to_string_pretty(&trimmed)?;
        crate::util::atomic_write_str(&self.path, &content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Remove stored credentials, if any.
    pub fn delete(&self) -> io::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for FileCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<NotionCredentials> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let credentials: NotionCredentials = serde_json::from_str(&content).ok()?;
        credentials.is_complete().then_some(credentials)
    }
}

/// In-memory store for tests and embedding contexts that manage
/// credentials themselves.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<NotionCredentials>>,
}

impl MemoryCredentialStore {
    pub fn configured(token: &str, database_id: &str) -> Self {
        Self {
            slot: Mutex::new(Some(NotionCredentials::new(token, database_id))),
        }
    }

    pub fn set(&self, credentials: Option<NotionCredentials>) {
        *self.slot.lock() = credentials;
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<NotionCredentials> {
        self.slot.lock().clone().filter(|c| c.is_complete())
    }
}
