//! Client settings: the persisted API endpoint and its in-memory holder

mod context;
mod store;

pub use context::SettingsContext;
pub use store::{
    FileStore, KeyValueStore, MemoryStore, SettingsStore, API_BASE_URL_KEY, DEFAULT_API_BASE_URL,
};
