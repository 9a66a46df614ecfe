//! Validate command implementation

use crate::config::CliConfig;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate
    #[arg(short = 'c', long, value_name = "FILE", required = true)]
    pub config: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config.display());

        match CliConfig::load(&self.config) {
            Ok(config) => {
                let marks: String = config.holdback.soft_punctuation.iter().collect();
                println!("✓ Configuration is valid!");
                println!("  Soft punctuation: {marks}");
                match config.holdback.max_pending_tokens {
                    Some(limit) => println!("  Max pending tokens: {limit}"),
                    None => println!("  Max pending tokens: unbounded"),
                }
                println!("  Max length: {}", config.generation.max_length);
                println!("  Default format: {}", config.output.default_format);
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(anyhow::anyhow!("Validation failed: {:#}", e))
            }
        }
    }
}
