//! Configuration for the Formflow binary.
//!
//! Simple path resolution with sensible defaults. Everything lives under
//! the Formflow home (`~/.formflow`, overridable via `FORMFLOW_HOME`),
//! with an optional `config.toml` on top.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

pub use formflow_logging::formflow_home;

/// Settings read from `<home>/config.toml`. A missing file is not an
/// error; defaults apply.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path of the SQLite database file.
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: formflow_home().join("formflow.sqlite3"),
        }
    }
}

impl Config {
    /// Load the configuration from the Formflow home directory.
    pub fn load() -> Result<Self> {
        Self::load_from(formflow_home().join("config.toml"))
    }

    fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }
}
