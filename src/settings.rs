//! Input preferences
//!
//! Persisted separately from tunables in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::ALT_FIRE_PULSE_MS;

/// Player-facing input preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Left half of the screen acts as a virtual movement stick on touch devices
    pub touch_joystick: bool,
    /// Stick displacement (screen px) below which movement is zero
    pub joystick_dead_zone: f32,
    /// How long a secondary press holds alt-fire (ms)
    pub alt_fire_pulse_ms: f64,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            touch_joystick: true,
            joystick_dead_zone: 12.0,
            alt_fire_pulse_ms: ALT_FIRE_PULSE_MS,
        }
    }
}

impl InputSettings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "nebula_drift_input";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded input settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default input settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Input settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_roundtrip_through_json() {
        let json = r#"{ "touch_joystick": false }"#;
        let s: InputSettings = serde_json::from_str(json).unwrap();
        assert!(!s.touch_joystick);
        assert_eq!(s.alt_fire_pulse_ms, 150.0);
        assert_eq!(s.joystick_dead_zone, InputSettings::default().joystick_dead_zone);
    }
}
