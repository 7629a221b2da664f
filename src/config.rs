//! Configuration file and resolved settings.
//!
//! The config file is optional JSON at `~/.config/fitlock/config.json`
//! (or `--config`). Every field may be omitted; command-line flags win over
//! file values, which win over built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::capture::{CameraPolicy, DEFAULT_CAMERA_DEVICE};
use crate::cli::Args;
use crate::error::ConfigError;

const CONFIG_DIR: &str = "fitlock";
const CONFIG_FILE: &str = "config.json";
const DB_FILE: &str = "fitlock.db";
const DEFAULT_FEEDBACK_MS: u64 = 2000;
const DEFAULT_REPLAY_FPS: u32 = 15;

/// Contents of the config file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub camera: Option<CameraPolicy>,
    pub camera_device: Option<PathBuf>,
    pub feedback_ms: Option<u64>,
    pub data_dir: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub pose_replay: Option<PathBuf>,
    pub replay_fps: Option<u32>,
    pub bell: Option<bool>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given (must exist), else the default location if present
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// `~/.config/fitlock/config.json` (platform config dir)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Platform local data dir, e.g. `~/.local/share/fitlock`
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .map(|dir| dir.join(CONFIG_DIR))
        .ok_or(ConfigError::NoHomeDir)
}

/// Fully resolved runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub camera: CameraPolicy,
    pub camera_device: PathBuf,
    pub feedback_ttl: Duration,
    pub data_dir: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub pose_replay: Option<PathBuf>,
    pub replay_fps: u32,
    pub bell: bool,
    pub verbose: bool,
}

impl Settings {
    pub fn resolve(args: &Args, file: AppConfig) -> Result<Self, ConfigError> {
        let data_dir = match args.data_dir.clone().or(file.data_dir) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let settings = Self {
            camera: args.camera.or(file.camera).unwrap_or_default(),
            camera_device: args
                .camera_device
                .clone()
                .or(file.camera_device)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CAMERA_DEVICE)),
            feedback_ttl: Duration::from_millis(
                args.feedback_ms.or(file.feedback_ms).unwrap_or(DEFAULT_FEEDBACK_MS),
            ),
            data_dir,
            catalog_path: args.catalog.clone().or(file.catalog),
            pose_replay: args.pose_replay.clone().or(file.pose_replay),
            replay_fps: args
                .replay_fps
                .or(file.replay_fps)
                .unwrap_or(DEFAULT_REPLAY_FPS)
                .max(1),
            bell: !args.no_bell && file.bell.unwrap_or(true),
            verbose: args.verbose,
        };
        debug!(?settings, "settings resolved");
        Ok(settings)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}
