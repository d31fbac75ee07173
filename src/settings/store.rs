//! Durable key-value storage for client settings

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error, warn};

/// Key under which the API base URL is persisted
pub const API_BASE_URL_KEY: &str = "apiBaseUrl";

/// Endpoint used when nothing usable is stored.
///
/// A build-time `RAGDESK_API_BASE_URL` replaces it.
pub const DEFAULT_API_BASE_URL: &str = match option_env!("RAGDESK_API_BASE_URL") {
    Some(url) => url,
    None => "http://127.0.0.1:1000",
};

/// A string key-value surface that may be unavailable
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Key-value pairs persisted as a flat TOML table
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_table()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut table = self.read_table()?;
        table.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(&table)?)?;
        debug!("Wrote {} to {:?}", key, self.path);
        Ok(())
    }
}

/// In-process store; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the API base URL.
///
/// `try_get`/`try_set` report storage failures; `get`/`set` apply the
/// fallback policy (default endpoint on read, log-and-continue on write).
pub struct SettingsStore {
    backend: Box<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Stored endpoint, `None` when absent or empty
    pub fn try_get(&self) -> Result<Option<String>> {
        Ok(self
            .backend
            .get(API_BASE_URL_KEY)?
            .filter(|value| !value.is_empty()))
    }

    pub fn try_set(&self, url: &str) -> Result<()> {
        self.backend.set(API_BASE_URL_KEY, url)
    }

    /// Stored endpoint or [`DEFAULT_API_BASE_URL`]. Never fails.
    pub fn get(&self) -> String {
        match self.try_get() {
            Ok(Some(url)) => url,
            Ok(None) => DEFAULT_API_BASE_URL.to_string(),
            Err(e) => {
                warn!("Failed to read settings: {}", e);
                DEFAULT_API_BASE_URL.to_string()
            }
        }
    }

    /// Persist the endpoint. Failures are logged, not returned.
    pub fn set(&self, url: &str) {
        if let Err(e) = self.try_set(url) {
            error!("Failed to save settings: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Store whose every access fails, like disabled browser storage
    pub(crate) struct UnavailableStore;

    impl KeyValueStore for UnavailableStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Storage("storage not available".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_default_when_empty() {
        let store = SettingsStore::new(MemoryStore::new());
        assert_eq!(store.get(), DEFAULT_API_BASE_URL);
        assert_eq!(store.try_get().unwrap(), None);
    }

    #[test]
    fn test_default_value() {
        if option_env!("RAGDESK_API_BASE_URL").is_none() {
            assert_eq!(DEFAULT_API_BASE_URL, "http://127.0.0.1:1000");
        }
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let store = SettingsStore::new(MemoryStore::new());
        store.set("http://custom-api.com:8080");
        assert_eq!(store.get(), "http://custom-api.com:8080");

        store.set("http://new-url.com");
        assert_eq!(store.get(), "http://new-url.com");
    }

    #[test]
    fn test_empty_stored_value_falls_back() {
        let backend = MemoryStore::new();
        backend.set(API_BASE_URL_KEY, "").unwrap();
        let store = SettingsStore::new(backend);
        assert_eq!(store.get(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_read_failure_falls_back_to_default() {
        let store = SettingsStore::new(UnavailableStore);
        assert!(store.try_get().is_err());
        assert_eq!(store.get(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let store = SettingsStore::new(UnavailableStore);
        assert!(store.try_set("http://test.com").is_err());
        // Must not panic or propagate
        store.set("http://test.com");
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("settings.toml");

        SettingsStore::new(FileStore::new(&path)).set("https://api.example.com/v1");
        assert!(path.exists());

        let reopened = SettingsStore::new(FileStore::new(&path));
        assert_eq!(reopened.get(), "https://api.example.com/v1");
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("settings.toml"));
        store.set("theme", "dark").unwrap();
        store.set(API_BASE_URL_KEY, "http://localhost:8000").unwrap();

        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(
            store.get(API_BASE_URL_KEY).unwrap().as_deref(),
            Some("http://localhost:8000")
        );
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let store = SettingsStore::new(FileStore::new(&path));
        assert_eq!(store.get(), DEFAULT_API_BASE_URL);
    }
}
