//! Game settings and preferences
//!
//! Persisted as JSON next to the executable. A missing or corrupt file
//! falls back to defaults with a warning; saving is best-effort.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SAMPLE_COUNT, SUPPORTED_SAMPLE_COUNTS};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Anti-aliasing sample count (1, 2, 4 or 8)
    pub sample_count: u32,
    /// Start in fullscreen
    pub fullscreen: bool,
    /// Cap presentation to the monitor refresh rate
    pub vsync: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            fullscreen: false,
            vsync: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    /// Settings file name
    pub const FILE_NAME: &'static str = "teapong-settings.json";

    /// Load settings from the default location
    pub fn load() -> Self {
        Self::load_from(Path::new(Self::FILE_NAME))
    }

    /// Load settings from a specific path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => settings.sanitized(),
                Err(err) => {
                    log::warn!("Ignoring unreadable settings file {path:?}: {err}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the default location
    pub fn save(&self) {
        self.save_to(Path::new(Self::FILE_NAME));
    }

    /// Save settings to a specific path (best-effort)
    pub fn save_to(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = std::fs::write(path, json) {
                    log::warn!("Failed to save settings to {path:?}: {err}");
                }
            }
            Err(err) => log::warn!("Failed to serialize settings: {err}"),
        }
    }

    /// Clamp out-of-range values loaded from disk
    pub fn sanitized(mut self) -> Self {
        if !SUPPORTED_SAMPLE_COUNTS.contains(&self.sample_count) {
            log::warn!(
                "Unsupported sample count {} in settings, using {}",
                self.sample_count,
                DEFAULT_SAMPLE_COUNT
            );
            self.sample_count = DEFAULT_SAMPLE_COUNT;
        }
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let dir = std::env::temp_dir().join("teapong-settings-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");

        let mut settings = Settings::default();
        settings.sample_count = 8;
        settings.fullscreen = true;
        settings.save_to(&path);

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded, settings);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("teapong-settings-corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("teapong-settings-missing.json");
        let _ = std::fs::remove_file(&path);
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_sanitize_rejects_bad_sample_count() {
        let settings = Settings {
            sample_count: 3,
            master_volume: 7.0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.sample_count, DEFAULT_SAMPLE_COUNT);
        assert_eq!(settings.master_volume, 1.0);
    }
}
