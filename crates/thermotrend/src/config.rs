use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thermotrend_core::SolverOptions;

const DEFAULT_CONFIG_FILE: &str = "thermotrend.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Temperature log to analyze.
    pub input: Option<PathBuf>,
    pub start: Option<String>,
    pub end: Option<String>,
    /// Parquet file receiving the per-sample trend table.
    pub output: Option<PathBuf>,
    pub trendline: bool,
    pub solver: SolverOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: None,
            start: None,
            end: None,
            output: None,
            trendline: true,
            solver: SolverOptions::default(),
        }
    }
}

impl AppConfig {
    /// Reads the config file named by `explicit`, then `THERMOTREND_CONFIG`,
    /// then `./thermotrend.toml`. Only the last one may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os("THERMOTREND_CONFIG").map(PathBuf::from));

        match named {
            Some(path) => Self::from_file(&path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
