//! Configuration module

use anyhow::{Context, Result};
use maskmap_engine::PatternRule;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "maskmap.toml";

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct CliConfig {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Detector configuration
    #[serde(default)]
    pub detector: DetectorConfig,
}

/// Where jobs are written
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of uploads, artifacts and the mapping file
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default report format
    pub format: String,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            pretty_json: true,
        }
    }
}

/// Regex rules used when no detections file is given
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct DetectorConfig {
    /// Rules in evaluation order
    #[serde(default)]
    pub patterns: Vec<PatternRule>,
}

impl CliConfig {
    /// Loads `path`, or `./maskmap.toml` when present, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
