//! The model seam and a replaying implementation

use crate::error::Result;
use crate::options::GenerateOptions;
use log::debug;
use tokflow_core::{Decode, TokenId, TokenStreamer};

/// A text generator that reports tokens as it produces them
///
/// `generate` must `put` the prompt tokens first, then each batch of output
/// tokens, then call `end` once. The [`Pipeline`](crate::Pipeline) finishes
/// the stream itself if a model returns without calling `end`.
pub trait Model: Send + Sync {
    /// Decoder that turns this model's token ids into text
    type Tokenizer: Decode + Send;

    fn tokenizer(&self) -> Self::Tokenizer;

    fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
        streamer: &mut dyn TokenStreamer,
    ) -> Result<()>;
}

/// Replays recorded token batches instead of running inference
///
/// The first batch is reported as the prompt echo. Output stops once the
/// total number of reported tokens reaches `max_length`.
#[derive(Debug, Clone)]
pub struct ScriptedModel<T> {
    tokenizer: T,
    batches: Vec<Vec<TokenId>>,
}

impl<T> ScriptedModel<T> {
    pub fn new(tokenizer: T, batches: Vec<Vec<TokenId>>) -> Self {
        Self { tokenizer, batches }
    }

    pub fn batches(&self) -> &[Vec<TokenId>] {
        &self.batches
    }
}

impl<T> Model for ScriptedModel<T>
where
    T: Decode + Clone + Send + Sync,
{
    type Tokenizer = T;

    fn tokenizer(&self) -> T {
        self.tokenizer.clone()
    }

    fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
        streamer: &mut dyn TokenStreamer,
    ) -> Result<()> {
        debug!(
            "replaying {} batches for a {}-byte prompt",
            self.batches.len(),
            prompt.len()
        );

        let mut remaining = options.max_length;
        for batch in &self.batches {
            if remaining == 0 {
                debug!("max_length {} reached", options.max_length);
                break;
            }
            let take = batch.len().min(remaining);
            streamer.put(&batch[..take])?;
            remaining -= take;
        }
        streamer.end()?;
        Ok(())
    }
}
