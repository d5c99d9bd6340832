//! Container configuration (TOML).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Configuration consulted while stamping the retrieved job graph.
///
/// Intended to be mounted into the container and edited by humans; missing
/// fields default so an absent file is a valid (empty) configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    /// Parallelism stamped onto the descriptor when set.
    pub default_parallelism: Option<u32>,
}

impl Configuration {
    pub fn validate(&self) -> Result<()> {
        if self.default_parallelism == Some(0) {
            return Err(anyhow!("default_parallelism must be > 0"));
        }
        Ok(())
    }
}

/// Load configuration from a TOML file.
///
/// If the file is missing, returns `Configuration::default()`.
pub fn load_config(path: &Path) -> Result<Configuration> {
    if !path.exists() {
        return Ok(Configuration::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config: Configuration =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
