//! Player preferences
//!
//! Persisted separately from scores through the same `Store`.

use serde::{Deserialize, Serialize};

use crate::persistence::{SETTINGS_KEY, Store, StoreError, load_json, save_json};
use crate::sim::LandingMode;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off
    pub sound_enabled: bool,
    /// Background music on/off
    pub music_enabled: bool,

    // === Gameplay ===
    /// Landing rule; `Forgiving` is the explicit easy mode
    pub landing_mode: LandingMode,
    /// Draw the predicted arc while charging
    pub show_trajectory: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
            landing_mode: LandingMode::Standard,
            show_trajectory: false,
        }
    }
}

impl Settings {
    /// Load settings; missing or malformed data yields defaults
    pub fn load(store: &dyn Store) -> Self {
        match load_json(store, SETTINGS_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn Store) -> Result<(), StoreError> {
        save_json(store, SETTINGS_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
