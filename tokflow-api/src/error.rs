//! API error types

use thiserror::Error;
use tokflow_core::{StreamError, TokenId};

/// API-level errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Streaming decoder error
    #[error("streaming error: {0}")]
    Stream(#[from] StreamError),

    /// The model failed while generating
    #[error("model error: {0}")]
    Model(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Token id missing from the vocabulary
    #[error("unknown token id {0}")]
    UnknownToken(TokenId),

    /// Vocabulary could not be loaded
    #[error("invalid vocabulary: {0}")]
    Vocab(String),

    /// A delta arrived after the text stream was closed
    #[error("text stream already closed")]
    ChannelClosed,

    /// The consumer of a text stream went away
    #[error("text stream receiver dropped")]
    ReceiverDropped,

    /// The generation worker thread panicked
    #[error("generation worker panicked")]
    WorkerPanicked,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ApiError::UnknownToken(42).to_string(),
            "unknown token id 42"
        );
        assert_eq!(
            ApiError::Config("max_length must be positive".into()).to_string(),
            "configuration error: max_length must be positive"
        );
        let err = ApiError::from(StreamError::Poisoned);
        assert!(err.to_string().starts_with("streaming error: "));
    }

    #[test]
    fn test_error_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<ApiError>();
    }
}
