//! JSON configuration files.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Loads a configuration file.
///
/// # Returns
///
/// * `Ok(T)` containing the deserialized configuration.
/// * `Err` if the file cannot be opened or does not match `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open config file {}", path.display()))?;
    let reader = std::io::BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Like `load_config`, but a missing file yields `T::default()`.
///
/// A file that exists but cannot be parsed is still an error.
pub fn load_config_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        warn!(
            "No config file at {}, falling back to defaults",
            path.display()
        );
        return Ok(T::default());
    }
    load_config(path)
}
