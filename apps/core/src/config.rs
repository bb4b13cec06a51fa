use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "quickswitch";
const CONFIG_FILE_NAME: &str = "config.toml";
const SNAPSHOT_FILE_NAME: &str = "snapshot.sqlite3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub history_window_days: u32,
    pub history_max_results: usize,
    pub hover_debounce_ms: u64,
    pub reconnect_max_attempts: u32,
    pub reconnect_base_delay_ms: u64,
    pub heartbeat_interval_secs: u64,
    pub snapshot_db_path: PathBuf,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = stable_app_data_dir();
        Self {
            history_window_days: 30,
            history_max_results: 30,
            hover_debounce_ms: 50,
            reconnect_max_attempts: 5,
            reconnect_base_delay_ms: 1000,
            heartbeat_interval_secs: 25,
            snapshot_db_path: base.join(SNAPSHOT_FILE_NAME),
            config_path: base.join(CONFIG_FILE_NAME),
        }
    }
}

/// Per-user data directory, falling back to the temp dir when the platform has none.
pub fn stable_app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if !(1..=365).contains(&cfg.history_window_days) {
        return Err("history_window_days out of range".into());
    }

    if !(1..=1000).contains(&cfg.history_max_results) {
        return Err("history_max_results out of range".into());
    }

    if !(1..=20).contains(&cfg.reconnect_max_attempts) {
        return Err("reconnect_max_attempts out of range".into());
    }

    if cfg.heartbeat_interval_secs == 0 {
        return Err("heartbeat_interval_secs must be positive".into());
    }

    if cfg.snapshot_db_path.as_os_str().is_empty() {
        return Err("snapshot_db_path is required".into());
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err("config_path is required".into());
    }

    Ok(())
}

/// Loads the config file at `path` (or the default location). A missing file
/// yields defaults pointing at that path.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::default().config_path);

    let mut cfg = match std::fs::read_to_string(&config_path) {
        Ok(raw) => toml::from_str::<Config>(&raw)?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path,
                source,
            })
        }
    };
    cfg.config_path = config_path;

    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg).map_err(ConfigError::Invalid)?;
    let encoded = toml::to_string_pretty(cfg)?;

    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Write {
        path: cfg.config_path.clone(),
        source,
    })
}
