//! Key/value persistence for best score, rankings and settings
//!
//! Features:
//! - `Store` trait over a string key/value medium (LocalStorage on web)
//! - JSON encoding for structured records
//! - Malformed records read back as defaults, never as errors

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
pub mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Storage key for the best score
pub const BEST_SCORE_KEY: &str = "hop_charge_best_score";
/// Storage key for the ranking table
pub const RANKINGS_KEY: &str = "hop_charge_rankings";
/// Storage key for user settings
pub const SETTINGS_KEY: &str = "hop_charge_settings";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage rejected write to {key}: {reason}")]
    WriteRejected { key: String, reason: String },
    #[error("could not encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A string key/value medium
pub trait Store {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read a raw item, logging and swallowing storage failures
fn read_item(store: &dyn Store, key: &str) -> Option<String> {
    match store.get_item(key) {
        Ok(item) => item,
        Err(e) => {
            log::warn!("failed to read {}: {}", key, e);
            None
        }
    }
}

/// Load the best score; missing or non-numeric data reads as 0
pub fn load_best_score(store: &dyn Store) -> u32 {
    let Some(raw) = read_item(store, BEST_SCORE_KEY) else {
        return 0;
    };
    match raw.trim().parse::<u32>() {
        Ok(score) => score,
        Err(_) => {
            log::warn!("ignoring malformed best score {:?}", raw);
            0
        }
    }
}

pub fn save_best_score(store: &mut dyn Store, score: u32) -> Result<(), StoreError> {
    store.set_item(BEST_SCORE_KEY, &score.to_string())
}

/// Decode a JSON record; missing or malformed data reads as `None`
pub fn load_json<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Option<T> {
    let raw = read_item(store, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("ignoring malformed {}: {}", key, e);
            None
        }
    }
}

pub fn save_json<T: Serialize>(store: &mut dyn Store, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set_item(key, &json)
}
