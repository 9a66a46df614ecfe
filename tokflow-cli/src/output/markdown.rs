//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tokflow_core::StreamStats;

/// Markdown formatter - one section per file with the decoded text quoted
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    file: Option<String>,
    text: String,
    files: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            file: None,
            text: String::new(),
            files: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> OutputFormatter for MarkdownFormatter<W> {
    fn begin_file(&mut self, path: &Path) -> Result<()> {
        self.file = Some(path.display().to_string());
        self.text.clear();
        Ok(())
    }

    fn delta(&mut self, text: &str, _is_final: bool) -> Result<()> {
        self.text.push_str(text);
        Ok(())
    }

    fn end_file(&mut self, stats: &StreamStats) -> Result<()> {
        let file = self.file.take().unwrap_or_default();
        writeln!(self.writer, "## {file}")?;
        writeln!(self.writer)?;
        for line in self.text.lines() {
            writeln!(self.writer, "> {line}")?;
        }
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "*Tokens: {}, notifications: {}, holds: {}*",
            stats.tokens, stats.notifications, stats.holds
        )?;
        writeln!(self.writer)?;
        self.files += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total files: {}*", self.files)?;
        self.writer.flush()?;
        Ok(())
    }
}
