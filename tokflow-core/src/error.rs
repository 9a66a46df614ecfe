//! Error types for the streaming decoder

use thiserror::Error;

/// Boxed error returned by external collaborators (decoders and sinks)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while streaming decoded text
#[derive(Error, Debug)]
pub enum StreamError {
    /// The decode capability rejected the buffered token sequence
    #[error("decode failed over {token_count} buffered tokens: {source}")]
    Decode {
        /// Number of tokens that were handed to the decoder
        token_count: usize,
        /// Error reported by the decoder
        #[source]
        source: BoxError,
    },

    /// The text sink failed to accept a delta
    #[error("text sink rejected delta: {0}")]
    Sink(#[source] BoxError),

    /// The buffer was used again after a decode failure
    #[error("decode buffer is poisoned by an earlier decode failure; call reset() first")]
    Poisoned,

    /// Tokens arrived after the generation loop ended the stream
    #[error("token stream already ended")]
    Ended,

    /// The holdback policy is unusable
    #[error("invalid holdback policy: {0}")]
    InvalidPolicy(String),
}

/// Result type for streaming operations
pub type Result<T> = std::result::Result<T, StreamError>;
