//! Player progress and preferences
//!
//! Persisted as a single JSON value under one storage key. Corrupt or
//! missing data falls back to defaults rather than failing the game.

use serde::{Deserialize, Serialize};

use crate::platform::Storage;

/// Persisted progress/preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Current campaign level, 1-based
    pub level: u32,
    /// Music muted
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: 1,
            muted: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "murkpond_settings";

    /// Load settings, falling back to defaults on missing or corrupt data.
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    settings
                }
                Err(err) => {
                    log::warn!("Stored settings are corrupt, using defaults: {err}");
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match serde_json::to_string(self) {
            Ok(json) => {
                storage.set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(err) => log::warn!("Settings not saved: {err}"),
        }
    }
}
