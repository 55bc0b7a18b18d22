//! Configuration file resolution.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use tally_core::TallyConfig;

/// `<config dir>/tally/config.json`, e.g. `~/.config/tally/config.json` on Linux.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tally")
        .join("config.json")
}

/// Load the explicit config file if given, else the user config if present,
/// else defaults.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<TallyConfig> {
    if let Some(path) = explicit {
        return TallyConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using config file {}", path.display());
        TallyConfig::from_file(&path).with_context(|| format!("loading config {}", path.display()))
    } else {
        Ok(TallyConfig::default())
    }
}
