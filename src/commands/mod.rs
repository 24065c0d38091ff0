mod build;
mod check;

pub use build::*;
pub use check::*;

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load amalgam.toml (or an explicit config file) and apply an output override
pub fn load_config(root: &Path, config: Option<&Path>, output: Option<&PathBuf>) -> Result<Config> {
    let mut loaded = match config {
        Some(path) if !path.exists() => {
            anyhow::bail!("Config file not found: {}", path.display())
        }
        Some(path) => Config::load_from(path),
        None => Config::load(root),
    }
    .context("Failed to load configuration")?;

    if let Some(output) = output {
        loaded.output = Some(output.clone());
    }
    Ok(loaded)
}
