pub mod batch;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use belex_core::BelexConfig;
use tracing::debug;

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("belex")
        .join("config.json")
}

/// Resolve the configuration file: an explicit `--config` path, else the
/// user file when present.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration for a command.
///
/// An explicit path must exist; the user file falls back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BelexConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(BelexConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(BelexConfig::from_file(&path)?)
    } else {
        Ok(BelexConfig::default())
    }
}
