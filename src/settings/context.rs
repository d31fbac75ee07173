//! Shared, in-memory view of the client settings

use super::store::SettingsStore;
use std::sync::{Arc, RwLock};
use tracing::info;

struct Inner {
    api_base_url: RwLock<String>,
    store: SettingsStore,
}

/// Current API endpoint, shared by everything that talks to the service.
///
/// Created once at startup from a [`SettingsStore`] and handed to consumers
/// explicitly. Clones share state, so an update made through one handle is
/// seen by every API client built from another.
#[derive(Clone)]
pub struct SettingsContext {
    inner: Arc<Inner>,
}

impl SettingsContext {
    /// Load the persisted endpoint (or the default) and take ownership of the store.
    pub fn init(store: SettingsStore) -> Self {
        let api_base_url = store.get();
        Self {
            inner: Arc::new(Inner {
                api_base_url: RwLock::new(api_base_url),
                store,
            }),
        }
    }

    pub fn api_base_url(&self) -> String {
        self.inner
            .api_base_url
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Update the endpoint in memory, then persist it best-effort.
    pub fn set_api_base_url(&self, url: impl Into<String>) {
        let url = url.into();
        {
            let mut current = self
                .inner
                .api_base_url
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            current.clone_from(&url);
        }
        self.inner.store.set(&url);
        info!("API base URL set to {}", url);
    }

    /// Use `url` for this process only; the store is left untouched.
    pub fn override_api_base_url(&self, url: impl Into<String>) {
        let mut current = self
            .inner
            .api_base_url
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = url.into();
    }
}

impl std::fmt::Debug for SettingsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsContext")
            .field("api_base_url", &self.api_base_url())
            .finish()
    }
}
