//! Ready-made text sinks

use crate::error::BoxError;
use crate::traits::TextSink;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single notification received by a sink
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chunk {
    /// Delta text (may be empty on the final chunk)
    pub text: String,
    /// Whether this was the end-of-stream notification
    pub is_final: bool,
}

/// Adapter turning an infallible closure into a [`TextSink`]
pub struct FnSink<F> {
    callback: F,
}

impl<F> FnSink<F>
where
    F: FnMut(&str, bool),
{
    /// Wrap a closure
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> TextSink for FnSink<F>
where
    F: FnMut(&str, bool),
{
    fn notify(&mut self, delta: &str, is_final: bool) -> Result<(), BoxError> {
        (self.callback)(delta, is_final);
        Ok(())
    }
}

/// Shorthand for [`FnSink::new`]
pub fn sink_fn<F>(callback: F) -> FnSink<F>
where
    F: FnMut(&str, bool),
{
    FnSink::new(callback)
}

/// Sink that records every notification in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    chunks: Vec<Chunk>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded notifications
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Concatenation of all recorded deltas
    pub fn text(&self) -> String {
        self.chunks.iter().map(|chunk| chunk.text.as_str()).collect()
    }

    /// Whether the final notification has been recorded
    pub fn is_finished(&self) -> bool {
        self.chunks.last().is_some_and(|chunk| chunk.is_final)
    }

    /// Take the recorded notifications
    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }
}

impl TextSink for Transcript {
    fn notify(&mut self, delta: &str, is_final: bool) -> Result<(), BoxError> {
        self.chunks.push(Chunk {
            text: delta.to_string(),
            is_final,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_records_in_order() {
        let mut transcript = Transcript::new();
        transcript.notify("Hello", false).unwrap();
        transcript.notify(", world", false).unwrap();
        assert!(!transcript.is_finished());

        transcript.notify("", true).unwrap();
        assert!(transcript.is_finished());
        assert_eq!(transcript.text(), "Hello, world");
        assert_eq!(transcript.chunks().len(), 3);
    }

    #[test]
    fn test_fn_sink_forwards_arguments() {
        let mut seen = Vec::new();
        {
            let mut sink = sink_fn(|delta: &str, is_final| seen.push((delta.to_string(), is_final)));
            sink.notify("abc", false).unwrap();
            sink.notify("", true).unwrap();
        }
        assert_eq!(seen, vec![("abc".to_string(), false), (String::new(), true)]);
    }

    #[test]
    fn test_sink_through_mutable_reference() {
        let mut transcript = Transcript::new();
        {
            let mut by_ref: &mut Transcript = &mut transcript;
            TextSink::notify(&mut by_ref, "x", true).unwrap();
        }
        assert_eq!(transcript.text(), "x");
    }
}
