//! Seams between the decode buffer and its collaborators

use crate::error::{BoxError, Result};
use std::sync::Arc;

/// Token identifier produced by a generative model
pub type TokenId = u32;

/// Detokenization capability supplied by the model's tokenizer.
///
/// Implementations must be deterministic: the same ids always decode to the
/// same text. Decoding is not assumed to be associative across splits.
pub trait Decode {
    /// Decode a full token sequence into text
    fn decode(&self, token_ids: &[TokenId]) -> std::result::Result<String, BoxError>;
}

impl<T: Decode + ?Sized> Decode for &T {
    fn decode(&self, token_ids: &[TokenId]) -> std::result::Result<String, BoxError> {
        (**self).decode(token_ids)
    }
}

impl<T: Decode + ?Sized> Decode for Box<T> {
    fn decode(&self, token_ids: &[TokenId]) -> std::result::Result<String, BoxError> {
        (**self).decode(token_ids)
    }
}

impl<T: Decode + ?Sized> Decode for Arc<T> {
    fn decode(&self, token_ids: &[TokenId]) -> std::result::Result<String, BoxError> {
        (**self).decode(token_ids)
    }
}

/// One-way receiver of decoded text deltas.
///
/// Called with `is_final = false` zero or more times, then exactly once with
/// `is_final = true`. Concatenating every `delta` in call order yields the
/// displayed text.
pub trait TextSink {
    /// Deliver a delta
    fn notify(&mut self, delta: &str, is_final: bool) -> std::result::Result<(), BoxError>;
}

impl<S: TextSink + ?Sized> TextSink for &mut S {
    fn notify(&mut self, delta: &str, is_final: bool) -> std::result::Result<(), BoxError> {
        (**self).notify(delta, is_final)
    }
}

impl<S: TextSink + ?Sized> TextSink for Box<S> {
    fn notify(&mut self, delta: &str, is_final: bool) -> std::result::Result<(), BoxError> {
        (**self).notify(delta, is_final)
    }
}

/// Interface a generation loop drives while producing tokens
pub trait TokenStreamer {
    /// Hand over the next batch of token ids (the first batch is the prompt)
    fn put(&mut self, token_ids: &[TokenId]) -> Result<()>;

    /// Signal that no more tokens will be produced
    fn end(&mut self) -> Result<()>;
}
