//! Subcommands and the helpers they share.

pub mod batch;
pub mod cards;
pub mod config;
pub mod extract;

use std::path::PathBuf;

use rekvizity_core::RekvizityConfig;
use tracing::debug;

/// Explicit `--config` path, or `<config dir>/rekvizity/config.json`.
pub fn config_file_path(config_path: Option<&str>) -> PathBuf {
    match config_path {
        Some(path) => PathBuf::from(path),
        None => dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rekvizity")
            .join("config.json"),
    }
}

/// Load the configuration file, falling back to defaults when none exists.
///
/// An explicitly given path must exist.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RekvizityConfig> {
    let path = config_file_path(config_path);
    if config_path.is_some() || path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(RekvizityConfig::from_file(&path)?)
    } else {
        Ok(RekvizityConfig::default())
    }
}
