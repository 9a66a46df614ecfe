//! Configuration module

use crate::error::CliError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tokflow_api::{Config, GenerateOptions};
use tokflow_core::HoldbackPolicy;

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// When decoded text is held back
    #[serde(default)]
    pub holdback: HoldbackPolicy,

    /// Options handed to the model
    #[serde(default)]
    pub generation: GenerateOptions,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct OutputConfig {
    /// Format used when `--format` is not given
    pub default_format: String,

    /// Pretty print JSON output
    pub pretty_json: bool,

    /// Print a header before each file in text output
    pub file_headers: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            pretty_json: true,
            file_headers: true,
        }
    }
}

impl CliConfig {
    /// Load and validate a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.pipeline_config()?;
        Ok(())
    }

    /// Holdback policy and generation options as a pipeline configuration
    pub fn pipeline_config(&self) -> Result<Config> {
        Config::builder()
            .policy(self.holdback.clone())
            .options(self.generation.clone())
            .build()
            .map_err(|e| CliError::ConfigError(e.to_string()).into())
    }
}
