use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_source_path")]
    pub source_path: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

fn default_source_path() -> String {
    "bluecoins.fydb".to_string()
}

fn default_output_path() -> String {
    "all_transactions.csv".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            output_path: default_output_path(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("bluecoins-export")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Missing file means defaults; an unreadable or malformed one is reported
/// and otherwise ignored.
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()));
    match parsed {
        Ok(settings) => settings,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.source_path, "bluecoins.fydb");
        assert_eq!(s.output_path, "all_transactions.csv");
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("settings.json"));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"source_path": "/data/backup.fydb"}"#).unwrap();
        let s = load_settings_from(&path);
        assert_eq!(s.source_path, "/data/backup.fydb");
        assert_eq!(s.output_path, "all_transactions.csv");
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_settings_from(&path), Settings::default());
    }
}
