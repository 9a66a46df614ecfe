//! Generation pipeline tying a model to a streaming decode buffer

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::model::Model;
use crate::options::GenerateOptions;
use crate::prompt::{build_prompt, Turn};
use crate::sink::ChannelSink;
use log::{debug, warn};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokflow_core::{
    Decode, HoldbackPolicy, StreamError, StreamStats, StreamingDecodeBuffer, TextSink, TokenId,
    TokenStreamer, Transcript,
};

/// Runs a [`Model`] and turns its tokens into text
pub struct Pipeline<M> {
    model: Arc<M>,
    config: Config,
}

impl<M: Model> Pipeline<M> {
    /// Create a pipeline with the default configuration
    pub fn new(model: M) -> Self {
        Self::with_config(model, Config::default())
    }

    /// Create a pipeline with an explicit configuration
    pub fn with_config(model: M, config: Config) -> Self {
        Self {
            model: Arc::new(model),
            config,
        }
    }

    /// The wrapped model
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Holdback policy and default options in effect
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate a completion and return the whole text
    pub fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        let (transcript, _) = self.generate_into(prompt, options, Transcript::new())?;
        Ok(transcript.text())
    }

    /// Generate with the pipeline's configured options
    pub fn generate_default(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, self.config.options())
    }

    /// Answer `query` as the next round after `history`
    pub fn chat(&self, query: &str, history: &[Turn], options: &GenerateOptions) -> Result<String> {
        self.generate(&build_prompt(query, history), options)
    }

    /// Generate into a caller-supplied sink, returning it with the counters
    pub fn generate_into<S: TextSink>(
        &self,
        prompt: &str,
        options: &GenerateOptions,
        sink: S,
    ) -> Result<(S, StreamStats)> {
        run_generation(&*self.model, prompt, options, self.config.policy(), sink)
    }
}

impl<M: Model + 'static> Pipeline<M> {
    /// Generate on a worker thread, yielding deltas as they become stable
    pub fn stream_generate(
        &self,
        prompt: impl Into<String>,
        options: GenerateOptions,
    ) -> Result<TextStream> {
        options.validate()?;

        let (sender, receiver) = mpsc::channel();
        let model = Arc::clone(&self.model);
        let policy = self.config.policy().clone();
        let prompt = prompt.into();

        let worker = thread::Builder::new()
            .name("tokflow-generate".to_string())
            .spawn(move || {
                run_generation(&*model, &prompt, &options, &policy, ChannelSink::new(sender))
                    .map(|(_, stats)| stats)
            })?;

        Ok(TextStream {
            receiver,
            worker: Some(worker),
        })
    }
}

/// Deltas produced by [`Pipeline::stream_generate`]
///
/// Iteration ends when the stream is finished or the worker stops early.
/// Call [`wait`](TextStream::wait) afterwards to learn which.
pub struct TextStream {
    receiver: Receiver<String>,
    worker: Option<JoinHandle<Result<StreamStats>>>,
}

impl TextStream {
    /// Join the worker and return its outcome
    pub fn wait(mut self) -> Result<StreamStats> {
        let worker = match self.worker.take() {
            Some(worker) => worker,
            None => return Err(ApiError::WorkerPanicked),
        };
        worker.join().map_err(|_| ApiError::WorkerPanicked)?
    }

    /// Drain every delta into one string, then join the worker
    pub fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        for delta in self.by_ref() {
            text.push_str(&delta);
        }
        self.wait()?;
        Ok(text)
    }
}

impl Iterator for TextStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.receiver.recv().ok()
    }
}

/// Tracks whether the model closed the stream itself.
///
/// The sink sees one final notification per generation: a repeated `end` is
/// ignored and `put` after `end` is rejected.
struct EndTracker<D, S> {
    buffer: StreamingDecodeBuffer<D, S>,
    ended: bool,
}

impl<D: Decode, S: TextSink> TokenStreamer for EndTracker<D, S> {
    fn put(&mut self, token_ids: &[TokenId]) -> tokflow_core::Result<()> {
        if self.ended {
            return Err(StreamError::Ended);
        }
        self.buffer.put(token_ids)
    }

    fn end(&mut self) -> tokflow_core::Result<()> {
        if self.ended {
            warn!("model ended the stream twice; ignoring");
            return Ok(());
        }
        self.ended = true;
        self.buffer.end()
    }
}

fn run_generation<M, S>(
    model: &M,
    prompt: &str,
    options: &GenerateOptions,
    policy: &HoldbackPolicy,
    sink: S,
) -> Result<(S, StreamStats)>
where
    M: Model + ?Sized,
    S: TextSink,
{
    options.validate()?;
    let buffer = StreamingDecodeBuffer::with_policy(model.tokenizer(), sink, policy.clone())?;
    let mut tracker = EndTracker {
        buffer,
        ended: false,
    };

    model.generate(prompt, options, &mut tracker)?;
    if !tracker.ended {
        warn!("model returned without ending the stream; finishing it");
        tracker.buffer.finish()?;
    }

    let stats = *tracker.buffer.stats();
    debug!(
        "generation done: {} tokens, {} notifications",
        stats.tokens, stats.notifications
    );
    Ok((tracker.buffer.into_sink(), stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScriptedModel;
    use crate::vocab::VocabDecoder;

    fn vocab() -> VocabDecoder {
        VocabDecoder::from_pieces([
            (0, "<prompt>"),
            (1, "Hello"),
            (2, ","),
            (3, "▁world"),
            (4, "."),
            (5, "<0x0A>"),
        ])
    }

    fn hello_model() -> ScriptedModel<VocabDecoder> {
        ScriptedModel::new(vocab(), vec![vec![0, 0], vec![1, 2], vec![3], vec![4, 5]])
    }

    #[test]
    fn test_generate_collects_text() {
        let pipeline = Pipeline::new(hello_model());
        let text = pipeline
            .generate("Hi", &GenerateOptions::default())
            .unwrap();
        assert_eq!(text, "Hello, world.\n");
    }

    #[test]
    fn test_generate_into_reports_stats() {
        let pipeline = Pipeline::new(hello_model());
        let (transcript, stats) = pipeline
            .generate_into("Hi", &GenerateOptions::default(), Transcript::new())
            .unwrap();

        assert!(transcript.is_finished());
        assert_eq!(stats.prompt_tokens, 2);
        assert_eq!(stats.tokens, 5);
        assert_eq!(stats.holds, 1);
        assert_eq!(stats.line_flushes, 1);
    }

    #[test]
    fn test_stream_generate_yields_deltas() {
        let pipeline = Pipeline::new(hello_model());
        let mut stream = pipeline
            .stream_generate("Hi", GenerateOptions::default())
            .unwrap();

        let deltas: Vec<String> = stream.by_ref().collect();
        assert_eq!(deltas, vec!["Hello, world", ".\n"]);
        let stats = stream.wait().unwrap();
        assert_eq!(stats.notifications, 3);
    }

    #[test]
    fn test_unfinished_model_is_finished_by_pipeline() {
        struct Forgetful;
        impl Model for Forgetful {
            type Tokenizer = VocabDecoder;
            fn tokenizer(&self) -> VocabDecoder {
                vocab()
            }
            fn generate(
                &self,
                _prompt: &str,
                _options: &GenerateOptions,
                streamer: &mut dyn TokenStreamer,
            ) -> Result<()> {
                streamer.put(&[0])?;
                streamer.put(&[1, 2])?;
                Ok(())
            }
        }

        let pipeline = Pipeline::new(Forgetful);
        let (transcript, _) = pipeline
            .generate_into("Hi", &GenerateOptions::default(), Transcript::new())
            .unwrap();
        assert_eq!(transcript.text(), "Hello,");
        assert_eq!(transcript.chunks().iter().filter(|c| c.is_final).count(), 1);
    }

    /// Scripted model that misbehaves after its first `end`
    struct Replaying {
        put_after_end: bool,
    }

    impl Model for Replaying {
        type Tokenizer = VocabDecoder;
        fn tokenizer(&self) -> VocabDecoder {
            vocab()
        }
        fn generate(
            &self,
            _prompt: &str,
            _options: &GenerateOptions,
            streamer: &mut dyn TokenStreamer,
        ) -> Result<()> {
            streamer.put(&[0])?;
            streamer.put(&[1])?;
            streamer.end()?;
            if self.put_after_end {
                streamer.put(&[0])?;
            }
            streamer.end()?;
            Ok(())
        }
    }

    #[test]
    fn test_repeated_end_notifies_final_once() {
        let pipeline = Pipeline::new(Replaying {
            put_after_end: false,
        });
        let (transcript, stats) = pipeline
            .generate_into("Hi", &GenerateOptions::default(), Transcript::new())
            .unwrap();

        assert_eq!(transcript.text(), "Hello");
        assert_eq!(transcript.chunks().iter().filter(|c| c.is_final).count(), 1);
        assert_eq!(stats.notifications, 2);
    }

    #[test]
    fn test_put_after_end_is_rejected() {
        let pipeline = Pipeline::new(Replaying {
            put_after_end: true,
        });
        let err = pipeline
            .generate_into("Hi", &GenerateOptions::default(), Transcript::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::Stream(StreamError::Ended)));
    }

    #[test]
    fn test_generate_default_uses_configured_options() {
        let config = Config::builder().max_length(4).build().unwrap();
        let pipeline = Pipeline::with_config(hello_model(), config);
        assert_eq!(pipeline.config().options().max_length, 4);
        assert_eq!(pipeline.generate_default("Hi").unwrap(), "Hello,");
    }

    #[test]
    fn test_invalid_options_fail_before_generation() {
        let pipeline = Pipeline::new(hello_model());
        let options = GenerateOptions {
            max_length: 0,
            ..GenerateOptions::default()
        };
        assert!(matches!(
            pipeline.generate("Hi", &options),
            Err(ApiError::Config(_))
        ));
        assert!(pipeline.stream_generate("Hi", options).is_err());
    }
}
