//! Configuration vault – reads/writes `~/.lumo/config.toml`.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use lumo_runtime::DemoConfig;
use serde::{Deserialize, Serialize};

/// Persisted user configuration stored in `~/.lumo/config.toml`.
///
/// Only the knobs a demo operator plausibly tweaks are persisted; the
/// flash cosmetics and the fixed 1 s pause stay at their
/// [`DemoConfig`] defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Forward drive distance, millimetres.
    #[serde(default = "default_drive_distance_mm")]
    pub drive_distance_mm: f32,

    /// Forward drive speed, millimetres per second.
    #[serde(default = "default_drive_speed_mmps")]
    pub drive_speed_mmps: f32,

    /// Phrase spoken at the end of the demo.
    #[serde(default = "default_phrase")]
    pub phrase: String,

    /// Charger search deadline, seconds.
    #[serde(default = "default_charger_timeout_secs")]
    pub charger_timeout_secs: u64,

    /// Cube search deadline, seconds.
    #[serde(default = "default_cube_timeout_secs")]
    pub cube_timeout_secs: u64,
}

fn default_drive_distance_mm() -> f32 {
    100.0
}
fn default_drive_speed_mmps() -> f32 {
    75.0
}
fn default_phrase() -> String {
    "hai".to_string()
}
fn default_charger_timeout_secs() -> u64 {
    30
}
fn default_cube_timeout_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drive_distance_mm: default_drive_distance_mm(),
            drive_speed_mmps: default_drive_speed_mmps(),
            phrase: default_phrase(),
            charger_timeout_secs: default_charger_timeout_secs(),
            cube_timeout_secs: default_cube_timeout_secs(),
        }
    }
}

impl From<&Config> for DemoConfig {
    fn from(cfg: &Config) -> Self {
        DemoConfig {
            drive_distance_mm: cfg.drive_distance_mm,
            drive_speed_mmps: cfg.drive_speed_mmps,
            phrase: cfg.phrase.clone(),
            charger_timeout: Duration::from_secs(cfg.charger_timeout_secs),
            cube_timeout: Duration::from_secs(cfg.cube_timeout_secs),
            ..DemoConfig::default()
        }
    }
}

/// Return the path to `~/.lumo/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".lumo").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    Ok(Some(cfg))
}

/// Save the config to disk, creating `~/.lumo/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = config_path_for_home(dir.path().to_str().unwrap());

        let cfg = Config {
            drive_distance_mm: 200.0,
            phrase: "hello".to_string(),
            ..Config::default()
        };
        save_to(&cfg, &path).unwrap();

        let loaded = load_from(&path).unwrap().expect("config should exist");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let path = config_path_for_home(dir.path().to_str().unwrap());
        assert_eq!(load_from(&path).unwrap(), None);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = config_path_for_home(dir.path().to_str().unwrap());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "phrase = \"beep\"\n").unwrap();

        let loaded = load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.phrase, "beep");
        assert_eq!(loaded.drive_distance_mm, 100.0);
        assert_eq!(loaded.charger_timeout_secs, 30);
    }

    #[test]
    fn converts_into_demo_config() {
        let cfg = Config {
            cube_timeout_secs: 90,
            ..Config::default()
        };
        let demo: DemoConfig = (&cfg).into();
        assert_eq!(demo.cube_timeout, Duration::from_secs(90));
        assert_eq!(demo.phrase, "hai");
        // Non-persisted knobs keep their defaults.
        assert_eq!(demo.flash_cycles, 10);
    }

    #[test]
    fn config_path_layout() {
        let path = config_path_for_home("/home/robot");
        assert_eq!(path, PathBuf::from("/home/robot/.lumo/config.toml"));
    }
}
