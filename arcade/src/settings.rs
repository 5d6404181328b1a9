use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const MIN_WINDOW_SCALE: u32 = 1;
const MAX_WINDOW_SCALE: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_window_scale")]
    pub window_scale: u32,
    #[serde(default = "default_vsync")]
    pub vsync: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            window_scale: default_window_scale(),
            vsync: default_vsync(),
        }
    }
}

impl Settings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.window_scale = self.window_scale.clamp(MIN_WINDOW_SCALE, MAX_WINDOW_SCALE);
        self
    }
}

fn default_version() -> u32 {
    1
}

fn default_window_scale() -> u32 {
    2
}

fn default_vsync() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// `RETROCADE_SETTINGS_PATH` wins, then the XDG config dir, then
    /// `~/.config`, then the working directory.
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("RETROCADE_SETTINGS_PATH") {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("retrocade");
        path.push("settings.json");
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Settings {
        let Ok(bytes) = fs::read(&self.path) else {
            return Settings::default();
        };
        serde_json::from_slice::<Settings>(&bytes)
            .map(Settings::sanitized)
            .unwrap_or_default()
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_settings_path() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("retrocade_settings_test_{nanos}.json"))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = SettingsStore::at(unique_settings_path());
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let path = unique_settings_path();
        fs::write(&path, "definitely not json").unwrap();
        let store = SettingsStore::at(&path);
        assert_eq!(store.load(), Settings::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn sanitized_clamps_the_window_scale() {
        let wild = Settings {
            version: 99,
            window_scale: 40,
            vsync: false,
        }
        .sanitized();
        assert_eq!(wild.version, 1);
        assert_eq!(wild.window_scale, MAX_WINDOW_SCALE);
        assert!(!wild.vsync);
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = unique_settings_path();
        let store = SettingsStore::at(&path);
        let settings = Settings {
            version: 1,
            window_scale: 3,
            vsync: false,
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: Settings = serde_json::from_str(r#"{"version":1}"#).unwrap();
        assert_eq!(parsed.window_scale, default_window_scale());
        assert!(parsed.vsync);
    }
}
