//! Game settings and preferences
//!
//! Persisted separately from player profiles.

use serde::{Deserialize, Serialize};

pub const MIN_SENSITIVITY: f32 = 0.5;
pub const MAX_SENSITIVITY: f32 = 2.0;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Drag multiplier for the frame (0.5 - 2.0)
    pub sensitivity: f32,
    pub sound_enabled: bool,
    /// Profile to select on startup
    pub last_player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            sound_enabled: true,
            last_player_name: String::new(),
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "fragile_gate_settings";

    pub fn set_sensitivity(&mut self, value: f32) {
        self.sensitivity = if value.is_finite() {
            value.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
        } else {
            1.0
        };
    }

    /// Load settings from storage, repairing out-of-range values
    pub fn load() -> Self {
        match crate::persistence::load_json::<Settings>(Self::STORAGE_KEY) {
            Some(mut settings) => {
                let sensitivity = settings.sensitivity;
                settings.set_sensitivity(sensitivity);
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if crate::persistence::save_json(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitivity_clamped() {
        let mut settings = Settings::default();
        settings.set_sensitivity(5.0);
        assert_eq!(settings.sensitivity, MAX_SENSITIVITY);
        settings.set_sensitivity(0.1);
        assert_eq!(settings.sensitivity, MIN_SENSITIVITY);
        settings.set_sensitivity(f32::NAN);
        assert_eq!(settings.sensitivity, 1.0);
        settings.set_sensitivity(1.3);
        assert_eq!(settings.sensitivity, 1.3);
    }

    #[test]
    fn test_load_repairs_stored_values() {
        crate::persistence::write(Settings::STORAGE_KEY, r#"{"sensitivity": 9.0}"#);
        let settings = Settings::load();
        assert_eq!(settings.sensitivity, MAX_SENSITIVITY);
        assert!(settings.sound_enabled);
    }

    #[test]
    fn test_save_round_trip() {
        let settings = Settings {
            sensitivity: 1.5,
            sound_enabled: false,
            last_player_name: "ada".to_string(),
        };
        settings.save();
        assert_eq!(Settings::load(), settings);
    }
}
