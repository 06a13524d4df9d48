//! Game settings and preferences
//!
//! Persisted separately from match history.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::platform::storage::{KeyValueStore, load_json, save_json};
use crate::sim::GameMode;
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Physics and match rules
    pub tuning: Tuning,

    // === Match ===
    pub mode: GameMode,
    pub player1_name: String,
    pub player2_name: String,
    /// Name used for the computer opponent in single player
    pub cpu_name: String,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === HUD ===
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),

            mode: GameMode::SinglePlayer,
            player1_name: "Player 1".to_string(),
            player2_name: "Player 2".to_string(),
            cpu_name: "Computer".to_string(),

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            show_fps: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "canvas_pong_settings";

    /// Names for the left and right player in the configured mode
    pub fn player_names(&self) -> (String, String) {
        let right = match self.mode {
            GameMode::SinglePlayer => &self.cpu_name,
            GameMode::TwoPlayers => &self.player2_name,
        };
        (self.player1_name.clone(), right.clone())
    }

    /// Effective sound effect volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Load settings. Missing, corrupt or invalid data falls back to defaults.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut settings = match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        };

        if let Err(e) = settings.tuning.validate() {
            log::warn!("Stored tuning rejected, using defaults: {}", e);
            settings.tuning = Tuning::default();
        }
        settings
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_missing_settings_use_defaults() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.mode = GameMode::TwoPlayers;
        settings.player2_name = "Bob".into();
        settings.tuning.win_score = 7;
        settings.save(&mut store).unwrap();

        let loaded = Settings::load(&store);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.player_names(), ("Player 1".to_string(), "Bob".to_string()));
    }

    #[test]
    fn test_invalid_tuning_is_replaced() {
        let mut store = MemoryStore::new();
        store
            .set(
                Settings::STORAGE_KEY,
                r#"{"tuning": {"restitution": 3.0}, "muted": true}"#,
            )
            .unwrap();
        let loaded = Settings::load(&store);
        assert!(loaded.muted);
        assert_eq!(loaded.tuning, Tuning::default());
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
