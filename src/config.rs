use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::app::DrillSettings;
use crate::engine::session::{DEFAULT_GAP_MS, DEFAULT_LAG, DEFAULT_STEP_MS, DEFAULT_TRIALS};
use crate::language::WordMode;

/// Drill preferences remembered between runs. Scores are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub lag: usize,
    pub trials: usize,
    pub step_ms: u64,
    pub gap_ms: u64,
    pub language: WordMode,
    pub min_len: usize,
    pub max_len: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lag: DEFAULT_LAG,
            trials: DEFAULT_TRIALS,
            step_ms: DEFAULT_STEP_MS,
            gap_ms: DEFAULT_GAP_MS,
            language: WordMode::Chinese,
            min_len: 1,
            max_len: None,
        }
    }
}

impl From<&DrillSettings> for Config {
    fn from(s: &DrillSettings) -> Self {
        Self {
            lag: s.lag,
            trials: s.trials,
            step_ms: s.step_ms,
            gap_ms: s.gap_ms,
            language: s.language,
            min_len: s.min_len,
            max_len: s.max_len,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "dualback") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("dualback_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files fall back to defaults.
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(io::Error::other)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            lag: 3,
            trials: 30,
            step_ms: 1500,
            gap_ms: 250,
            language: WordMode::Mixed,
            min_len: 2,
            max_len: Some(6),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "lag": 4, "language": "english" }"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.lag, 4);
        assert_eq!(cfg.language, WordMode::English);
        assert_eq!(cfg.trials, DEFAULT_TRIALS);
    }

    #[test]
    fn from_drill_settings_drops_session_only_fields() {
        let settings = DrillSettings {
            lag: 4,
            custom_words: vec!["X".into()],
            seed: Some(5),
            ..DrillSettings::default()
        };
        let cfg = Config::from(&settings);
        assert_eq!(cfg.lag, 4);
        assert_eq!(DrillSettings::from_config(&cfg).custom_words, Vec::<String>::new());
    }
}
