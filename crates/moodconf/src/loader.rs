//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, MoodConfig};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
/// Returns paths in load order (system, user, local/cli).
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    // System config
    let system = PathBuf::from("/etc/moodring/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("moodring/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    // CLI override takes precedence over local
    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    // Local override (current directory)
    let local = PathBuf::from("moodring.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Load config from a TOML file.
pub fn load_from_file(path: &Path) -> Result<MoodConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut MoodConfig, sources: &mut ConfigSources) {
    if let Ok(v) = env::var("MOODRING_HTTP_PORT") {
        if let Ok(port) = v.parse() {
            config.bind.http_port = port;
            sources.env_overrides.push("MOODRING_HTTP_PORT".to_string());
        }
    }

    if let Ok(v) = env::var("MOODRING_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("MOODRING_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Ok(v) = env::var("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }

    if let Ok(v) = env::var("MOODRING_MODEL_TYPE") {
        config.detection.model_type = v;
        sources.env_overrides.push("MOODRING_MODEL_TYPE".to_string());
    }
    if let Ok(v) = env::var("MOODRING_DETECTOR_ENDPOINT") {
        config.detection.endpoint = Some(v);
        sources
            .env_overrides
            .push("MOODRING_DETECTOR_ENDPOINT".to_string());
    }
    if let Ok(v) = env::var("MOODRING_CONFIDENCE_THRESHOLD") {
        if let Ok(threshold) = v.parse() {
            config.detection.confidence_threshold = threshold;
            sources
                .env_overrides
                .push("MOODRING_CONFIDENCE_THRESHOLD".to_string());
        }
    }
    if let Ok(v) = env::var("MOODRING_DETECTION_INTERVAL") {
        if let Ok(interval) = v.parse() {
            config.detection.interval_ms = interval;
            sources
                .env_overrides
                .push("MOODRING_DETECTION_INTERVAL".to_string());
        }
    }

    if let Ok(v) = env::var("MOODRING_SONGS_PATH") {
        config.music.songs_path = Some(expand_path(&v));
        sources.env_overrides.push("MOODRING_SONGS_PATH".to_string());
    }

    if let Ok(v) = env::var("MOODRING_SAVE_FRAMES") {
        config.storage.save_frames = v.eq_ignore_ascii_case("true") || v == "1";
        sources.env_overrides.push("MOODRING_SAVE_FRAMES".to_string());
    }
    if let Ok(v) = env::var("MOODRING_FRAMES_DIR") {
        config.storage.frames_dir = expand_path(&v);
        sources.env_overrides.push("MOODRING_FRAMES_DIR".to_string());
    }
}

/// Expand `~` prefixes in every configured path.
pub fn expand_config_paths(config: &mut MoodConfig) {
    if let Some(path) = &config.music.songs_path {
        config.music.songs_path = Some(expand_path(&path.to_string_lossy()));
    }
    config.storage.frames_dir = expand_path(&config.storage.frames_dir.to_string_lossy());
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            home.join(stripped)
        } else {
            PathBuf::from(path)
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // Handle $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            if let Ok(var_value) = env::var(var_name) {
                PathBuf::from(var_value).join(&stripped[slash_pos + 1..])
            } else {
                PathBuf::from(path)
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}
