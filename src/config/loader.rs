//! Configuration loading from the file system

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use super::defaults::CONFIG_PATH;
use super::types::Config;
use crate::error::StatusError;

pub fn default_config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(CONFIG_PATH).as_ref())
}

/// Load configuration from `path`, or the default location.
///
/// Returns `Config::default()` if the file is missing or malformed.
#[instrument(name = "load_config", skip_all)]
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    match load_config_from(&config_path) {
        Ok(config) => {
            info!(path = %config_path.display(), "Successfully loaded config");
            config
        }
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    }
}

/// Read and parse a config file, surfacing every failure.
pub fn load_config_from(path: &Path) -> Result<Config, StatusError> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| StatusError::ConfigRead {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| StatusError::ConfigParse {
        path: display,
        source,
    })
}
