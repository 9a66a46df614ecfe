//! Token trace files
//!
//! A trace holds one batch per line as whitespace-separated token ids, in the
//! order a model reported them. The first batch is the prompt echo. Text after
//! `#` is a comment and blank lines are ignored.

use crate::error::CliError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tokflow_core::TokenId;

/// Read and parse a trace file
pub fn read_trace(path: &Path) -> Result<Vec<Vec<TokenId>>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let batches =
        parse_trace(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    if batches.is_empty() {
        log::warn!("{} contains no batches", path.display());
    }
    Ok(batches)
}

/// Parse trace text into batches
pub fn parse_trace(content: &str) -> Result<Vec<Vec<TokenId>>, CliError> {
    let mut batches = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.split_once('#').map_or(raw, |(data, _)| data).trim();
        if line.is_empty() {
            continue;
        }

        let batch = line
            .split_whitespace()
            .map(|token| {
                token.parse::<TokenId>().map_err(|_| CliError::InvalidTrace {
                    line: index + 1,
                    message: format!("'{token}' is not a token id"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        batches.push(batch);
    }

    Ok(batches)
}
