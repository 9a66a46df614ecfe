//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tokflow_core::StreamStats;

/// Plain text formatter - writes each delta as soon as it arrives
pub struct TextFormatter<W: Write> {
    writer: W,
    headers: bool,
    at_line_start: bool,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W, headers: bool) -> Self {
        Self {
            writer,
            headers,
            at_line_start: true,
        }
    }

    /// Consume the formatter, returning its writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> OutputFormatter for TextFormatter<W> {
    fn begin_file(&mut self, path: &Path) -> Result<()> {
        if self.headers {
            writeln!(self.writer, "==> {} <==", path.display())?;
        }
        self.at_line_start = true;
        Ok(())
    }

    fn delta(&mut self, text: &str, _is_final: bool) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        self.at_line_start = text.ends_with('\n');
        Ok(())
    }

    fn end_file(&mut self, _stats: &StreamStats) -> Result<()> {
        if !self.at_line_start {
            writeln!(self.writer)?;
            self.at_line_start = true;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
