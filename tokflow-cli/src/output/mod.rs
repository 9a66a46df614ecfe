//! Output formatting module

use anyhow::Result;
use std::path::Path;
use tokflow_core::StreamStats;

/// Trait for output formatters
///
/// A replay calls `begin_file`, then `delta` for every notification of the
/// decode buffer (the last one with `is_final = true`), then `end_file`.
pub trait OutputFormatter: Send {
    /// Start the output for one trace file
    fn begin_file(&mut self, path: &Path) -> Result<()>;

    /// Receive one text delta
    fn delta(&mut self, text: &str, is_final: bool) -> Result<()>;

    /// Close the output for the current file
    fn end_file(&mut self, stats: &StreamStats) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;
