//! Incremental decode buffer
//!
//! Token ids arrive in batches from a generation loop. After each batch the
//! whole pending sequence is decoded again, because detokenization is not
//! associative: `decode([a, b, c])` need not equal `decode([a, b]) +
//! decode([c])`, most visibly when a multi-byte character straddles tokens.
//! The `emitted_len` cursor remembers how much of the current decode the sink
//! has already seen, so only the new suffix is delivered.
//!
//! Text is held back while it ends in soft punctuation or in the decoder's
//! incomplete-character marker. A line break is a hard flush point: the line
//! is delivered and the token cache is emptied, which bounds memory (and the
//! cost of re-decoding) to one line of output.

use crate::{
    error::{Result, StreamError},
    policy::{HoldbackPolicy, Tail},
    stats::StreamStats,
    traits::{Decode, TextSink, TokenId, TokenStreamer},
};
use log::{debug, trace, warn};
use smallvec::SmallVec;

/// Tokens kept inline before the line buffer spills to the heap
const INLINE_TOKENS: usize = 64;

/// Streaming detokenizer for a single generation request
pub struct StreamingDecodeBuffer<D, S> {
    decoder: D,
    sink: S,
    policy: HoldbackPolicy,
    /// True until the prompt echo has been discarded
    is_first_batch: bool,
    /// Tokens since the last flush-to-empty
    pending_tokens: SmallVec<[TokenId; INLINE_TOKENS]>,
    /// Bytes of the current decode already delivered
    emitted_len: usize,
    poisoned: bool,
    stats: StreamStats,
}

impl<D, S> StreamingDecodeBuffer<D, S>
where
    D: Decode,
    S: TextSink,
{
    /// Create a buffer with the default holdback policy
    pub fn new(decoder: D, sink: S) -> Self {
        Self::from_parts(decoder, sink, HoldbackPolicy::default())
    }

    /// Create a buffer with a custom holdback policy
    pub fn with_policy(decoder: D, sink: S, policy: HoldbackPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self::from_parts(decoder, sink, policy))
    }

    fn from_parts(decoder: D, sink: S, policy: HoldbackPolicy) -> Self {
        Self {
            decoder,
            sink,
            policy,
            is_first_batch: true,
            pending_tokens: SmallVec::new(),
            emitted_len: 0,
            poisoned: false,
            stats: StreamStats::default(),
        }
    }

    /// Feed the next batch of token ids.
    ///
    /// The first non-empty batch is the prompt echo and is discarded. Every
    /// later batch triggers at most one notification with `is_final = false`.
    pub fn push(&mut self, token_ids: &[TokenId]) -> Result<()> {
        self.ensure_usable()?;

        if token_ids.is_empty() {
            return Ok(());
        }

        if self.is_first_batch {
            trace!("discarding {} prompt tokens", token_ids.len());
            self.is_first_batch = false;
            self.stats.prompt_tokens += token_ids.len();
            return Ok(());
        }

        self.pending_tokens.extend_from_slice(token_ids);
        self.stats.batches += 1;
        self.stats.tokens += token_ids.len();

        let text = self.decode_pending()?;
        let tail = self.policy.classify(&text);
        let over_cap = self.policy.exceeds_cap(self.pending_tokens.len());

        match tail {
            Tail::Empty => Ok(()),
            Tail::LineBreak => {
                self.stats.line_flushes += 1;
                self.flush_to_empty(&text)
            }
            Tail::SoftPunctuation(_) | Tail::Settled if over_cap => {
                debug!(
                    "forcing flush of {} pending tokens (cap {:?})",
                    self.pending_tokens.len(),
                    self.policy.max_pending_tokens
                );
                self.stats.forced_flushes += 1;
                self.flush_to_empty(&text)
            }
            Tail::SoftPunctuation(mark) => {
                trace!("holding {} bytes behind {:?}", text.len(), mark);
                self.stats.holds += 1;
                Ok(())
            }
            Tail::Incomplete => {
                trace!("holding {} bytes behind incomplete character", text.len());
                self.stats.holds += 1;
                Ok(())
            }
            Tail::Settled => {
                let delta = unsent(&text, self.emitted_len);
                // a shrunken re-decode never moves the cursor back
                self.emitted_len = self.emitted_len.max(text.len());
                self.emit(delta, false)
            }
        }
    }

    /// Flush everything still pending and signal end of stream.
    ///
    /// Always notifies exactly once with `is_final = true`, even with an empty
    /// delta, then returns the buffer to its initial state.
    pub fn finish(&mut self) -> Result<()> {
        self.ensure_usable()?;

        let text = if self.pending_tokens.is_empty() {
            String::new()
        } else {
            self.decode_pending()?
        };
        let delta = unsent(&text, self.emitted_len);

        debug!(
            "finishing stream: {} pending tokens, {} trailing bytes",
            self.pending_tokens.len(),
            delta.len()
        );

        self.reset_state();
        self.emit(delta, true)
    }

    /// Return to the awaiting-prompt state without notifying the sink.
    ///
    /// This is the only way to recover a buffer poisoned by a decode failure.
    pub fn reset(&mut self) {
        self.reset_state();
        self.poisoned = false;
    }

    /// Tokens buffered since the last flush-to-empty
    pub fn pending_tokens(&self) -> &[TokenId] {
        &self.pending_tokens
    }

    /// Bytes of the current decode already delivered
    pub fn emitted_len(&self) -> usize {
        self.emitted_len
    }

    /// Whether the next non-empty batch will be treated as the prompt echo
    pub fn is_awaiting_prompt(&self) -> bool {
        self.is_first_batch
    }

    /// Whether a decode failure has made the buffer unusable
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Holdback policy in effect
    pub fn policy(&self) -> &HoldbackPolicy {
        &self.policy
    }

    /// Counters accumulated since construction
    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Return the counters and start counting from zero
    pub fn take_stats(&mut self) -> StreamStats {
        std::mem::take(&mut self.stats)
    }

    /// Borrow the sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the buffer, returning its sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn ensure_usable(&self) -> Result<()> {
        if self.poisoned {
            Err(StreamError::Poisoned)
        } else {
            Ok(())
        }
    }

    fn decode_pending(&mut self) -> Result<String> {
        match self.decoder.decode(&self.pending_tokens) {
            Ok(text) => Ok(text),
            Err(source) => {
                self.poisoned = true;
                Err(StreamError::Decode {
                    token_count: self.pending_tokens.len(),
                    source,
                })
            }
        }
    }

    /// Deliver the rest of `text` and empty the token cache
    fn flush_to_empty(&mut self, text: &str) -> Result<()> {
        let delta = unsent(text, self.emitted_len);
        self.pending_tokens.clear();
        self.emitted_len = 0;
        self.emit(delta, false)
    }

    fn emit(&mut self, delta: &str, is_final: bool) -> Result<()> {
        if delta.is_empty() && !is_final {
            return Ok(());
        }

        self.stats.notifications += 1;
        self.stats.emitted_bytes += delta.len();
        self.sink.notify(delta, is_final).map_err(StreamError::Sink)
    }

    fn reset_state(&mut self) {
        self.is_first_batch = true;
        self.pending_tokens.clear();
        self.emitted_len = 0;
    }
}

impl<D, S> TokenStreamer for StreamingDecodeBuffer<D, S>
where
    D: Decode,
    S: TextSink,
{
    fn put(&mut self, token_ids: &[TokenId]) -> Result<()> {
        self.push(token_ids)
    }

    fn end(&mut self) -> Result<()> {
        self.finish()
    }
}

/// Suffix of `text` past the cursor.
///
/// A well-behaved decoder only ever extends its earlier output. If the
/// re-decode shrank below the cursor nothing is unsent; if the cursor splits
/// a character it is moved forward to the next character boundary.
fn unsent(text: &str, emitted_len: usize) -> &str {
    if emitted_len > text.len() {
        warn!(
            "decode shrank below emitted cursor ({} < {}); nothing new to emit",
            text.len(),
            emitted_len
        );
        return "";
    }

    let mut start = emitted_len;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    if start != emitted_len {
        warn!("emitted cursor {emitted_len} split a character; advanced to {start}");
    }

    &text[start..]
}
