//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tokflow_core::{Chunk, StreamStats};

/// JSON formatter - outputs one report per file as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    reports: Vec<FileReport>,
    current: Option<FileReport>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// Trace file the text was decoded from
    pub file: String,
    /// Concatenation of all deltas
    pub text: String,
    /// Notifications in delivery order
    pub chunks: Vec<Chunk>,
    pub stats: StreamStats,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            reports: Vec::new(),
            current: None,
        }
    }

    /// Consume the formatter, returning its writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> OutputFormatter for JsonFormatter<W> {
    fn begin_file(&mut self, path: &Path) -> Result<()> {
        self.current = Some(FileReport {
            file: path.display().to_string(),
            text: String::new(),
            chunks: Vec::new(),
            stats: StreamStats::default(),
        });
        Ok(())
    }

    fn delta(&mut self, text: &str, is_final: bool) -> Result<()> {
        let report = self
            .current
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("delta received outside of a file"))?;
        report.text.push_str(text);
        report.chunks.push(Chunk {
            text: text.to_string(),
            is_final,
        });
        Ok(())
    }

    fn end_file(&mut self, stats: &StreamStats) -> Result<()> {
        if let Some(mut report) = self.current.take() {
            report.stats = *stats;
            self.reports.push(report);
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.reports)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.reports)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_per_file() {
        let mut formatter = JsonFormatter::new(Vec::new(), false);
        for name in ["a.trace", "b.trace"] {
            formatter.begin_file(Path::new(name)).unwrap();
            formatter.delta("Hi", false).unwrap();
            formatter.delta("!", true).unwrap();
            let stats = StreamStats {
                tokens: 2,
                ..StreamStats::default()
            };
            formatter.end_file(&stats).unwrap();
        }
        formatter.finish().unwrap();

        let output = String::from_utf8(formatter.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let reports = value.as_array().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1]["file"], "b.trace");
        assert_eq!(reports[0]["text"], "Hi!");
        assert_eq!(reports[0]["chunks"][1]["is_final"], true);
        assert_eq!(reports[0]["stats"]["tokens"], 2);
    }

    #[test]
    fn test_delta_without_file_fails() {
        let mut formatter = JsonFormatter::new(Vec::new(), true);
        assert!(formatter.delta("x", false).is_err());
    }
}
