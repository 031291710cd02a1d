//! Credential persistence behind a key-value trait
//!
//! The persisted layout is exactly three fixed keys: the access token, the
//! refresh token, and the serialized principal. The trait is synchronous on
//! purpose: `restore()` must complete without suspending so the guard never
//! sees a half-restored session.

use crate::error::{SessionError, SessionResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Key under which the access token is persisted.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Key under which the refresh token is persisted.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Key under which the serialized principal is persisted.
pub const USER_KEY: &str = "user";

/// Synchronous key-value store for session state.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> SessionResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> SessionResult<()>;

    fn remove(&self, key: &str) -> SessionResult<()>;

    /// Remove every key. Must succeed even when nothing is stored.
    fn clear(&self) -> SessionResult<()>;
}

/// Volatile store for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        entries.clear();
        Ok(())
    }
}

/// Durable store backed by a single JSON file.
///
/// Every mutation rewrites the whole file; the map is three small strings,
/// so partial-write durability tricks are not worth their complexity here.
#[derive(Debug)]
pub struct JsonFileCredentialStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileCredentialStore {
    /// Open (or create) the store at `path`, loading any existing content.
    pub fn open(path: impl Into<PathBuf>) -> SessionResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Default on-disk location: `<config dir>/sgee-portal/session.json`.
    pub fn default_path() -> SessionResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SessionError::Storage("cannot find config directory".into()))?;
        Ok(config_dir.join("sgee-portal").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl CredentialStore for JsonFileCredentialStore {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        entries.remove(key);
        self.persist(&entries)
    }

    fn clear(&self) -> SessionResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        entries.clear();
        self.persist(&entries)
    }
}
