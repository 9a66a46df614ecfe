//! Prompt command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tokflow_api::{build_prompt, Turn};

/// Arguments for the prompt command
#[derive(Debug, Args)]
pub struct PromptArgs {
    /// Question for the next round
    #[arg(short, long, value_name = "TEXT", required = true)]
    pub query: String,

    /// JSON file with earlier turns: [{"question": "...", "answer": "..."}]
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,
}

impl PromptArgs {
    /// Execute the prompt command
    pub fn execute(&self) -> Result<()> {
        println!("{}", self.render()?);
        Ok(())
    }

    /// Build the prompt text
    pub fn render(&self) -> Result<String> {
        let history = match &self.history {
            Some(path) => load_history(path)?,
            None => Vec::new(),
        };
        log::debug!("building prompt after {} turns", history.len());
        Ok(build_prompt(&self.query, &history))
    }
}

fn load_history(path: &Path) -> Result<Vec<Turn>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse history file: {}", path.display()))
}
