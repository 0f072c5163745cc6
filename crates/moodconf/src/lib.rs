//! Minimal configuration loading for Moodring.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/moodring/config.toml` (system)
//! 2. `~/.config/moodring/config.toml` (user)
//! 3. `./moodring.toml` (local override)
//! 4. Environment variables (`MOODRING_*`)
//!
//! # Example Config
//!
//! ```toml
//! [bind]
//! http_port = 8000
//!
//! [telemetry]
//! log_level = "info"
//!
//! [detection]
//! model_type = "mock"
//! confidence_threshold = 0.6
//! interval_ms = 30
//!
//! [music]
//! songs_path = "~/.config/moodring/songs.json"
//!
//! [storage]
//! save_frames = false
//! frames_dir = "~/.local/share/moodring/frames"
//! ```

pub mod loader;

pub use loader::{discover_config_files_with_override, expand_path, ConfigSources};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// HTTP bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    pub http_port: u16,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self { http_port: 8000 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Default tracing filter, overridable with `RUST_LOG`.
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Detector selection and throttling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Which detector implementation to use: `mock` or `remote`.
    pub model_type: String,
    /// Base URL of the remote inference service. Required for `remote`.
    pub endpoint: Option<String>,
    /// Confidence threshold a detection must reach for `meets_threshold`.
    pub confidence_threshold: f32,
    /// Minimum elapsed time between two inference dispatches per session.
    pub interval_ms: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            model_type: "mock".to_string(),
            endpoint: None,
            confidence_threshold: 0.6,
            interval_ms: 30,
        }
    }
}

/// Music recommendation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// Path to a songs database JSON file. Built-in library when unset.
    pub songs_path: Option<PathBuf>,
}

/// Optional frame persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Write each decoded frame to disk as JPEG.
    pub save_frames: bool,
    /// Directory for saved frames.
    pub frames_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_frames: false,
            frames_dir: default_frames_dir(),
        }
    }
}

fn default_frames_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".local/share/moodring/frames"))
        .unwrap_or_else(|| PathBuf::from(".moodring/frames"))
}

/// Complete Moodring configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    pub bind: BindConfig,
    pub telemetry: TelemetryConfig,
    pub detection: DetectionConfig,
    pub music: MusicConfig,
    pub storage: StorageConfig,
}

impl MoodConfig {
    /// Load configuration from all sources.
    ///
    /// Load order (later wins):
    /// 1. Compiled defaults
    /// 2. `/etc/moodring/config.toml`
    /// 3. `~/.config/moodring/config.toml`
    /// 4. `./moodring.toml`
    /// 5. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply env overrides.
    ///
    /// If `config_path` is provided, it takes precedence over the local
    /// `./moodring.toml` override. System and user configs still load first.
    pub fn load_from(config_path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration and return information about sources.
    pub fn load_with_sources() -> Result<(Self, ConfigSources), ConfigError> {
        Self::load_with_sources_from(None)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&std::path::Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = MoodConfig::default();

        // Load config files in order
        for path in loader::discover_config_files_with_override(config_path) {
            config = loader::load_from_file(&path)?;
            sources.files.push(path);
        }

        // Apply environment variable overrides
        loader::apply_env_overrides(&mut config, &mut sources);
        loader::expand_config_paths(&mut config);

        Ok((config, sources))
    }
}
