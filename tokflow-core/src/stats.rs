//! Counters describing what a decode buffer did

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifetime counters of a [`StreamingDecodeBuffer`](crate::StreamingDecodeBuffer)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StreamStats {
    /// Tokens discarded as prompt echo
    pub prompt_tokens: usize,
    /// Non-prompt batches pushed
    pub batches: usize,
    /// Non-prompt tokens pushed
    pub tokens: usize,
    /// Notifications delivered to the sink (including final ones)
    pub notifications: usize,
    /// Batches whose text was held back
    pub holds: usize,
    /// Flushes triggered by a line break
    pub line_flushes: usize,
    /// Flushes triggered by the pending-token cap
    pub forced_flushes: usize,
    /// Bytes of text delivered to the sink
    pub emitted_bytes: usize,
}
