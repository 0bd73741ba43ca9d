//! JSON configuration files.
//!
//! Every field of [`SimulationConfig`] has a default, so a file only needs to list
//! the values it changes. Files are validated on load.

use crate::sim::config::SimulationConfig;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Writes a configuration to a JSON file.
///
/// # Example
/// ```no_run
/// use aura_mf::SimulationConfig;
/// use aura_mf::io::save_config;
/// use std::path::Path;
///
/// save_config(Path::new("aura.json"), &SimulationConfig::new()).unwrap();
/// ```
pub fn save_config(path: &Path, config: &SimulationConfig) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, config)
        .with_context(|| format!("Failed to serialize config to: {}", path.display()))?;

    Ok(())
}

/// Reads and validates a configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<SimulationConfig> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let config: SimulationConfig = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize config from: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Parses and validates a configuration from a JSON string.
pub fn config_from_str(json: &str) -> Result<SimulationConfig> {
    let config: SimulationConfig =
        serde_json::from_str(json).context("Failed to deserialize config from string")?;
    config.validate().context("Invalid config")?;
    Ok(config)
}
