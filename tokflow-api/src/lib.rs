//! Generation front-end for tokflow
//!
//! This crate wraps the streaming decode buffer from `tokflow-core` with the
//! pieces needed to drive it from a model: generation options, the chat
//! prompt template, a [`Model`] seam, and a [`Pipeline`] that either collects
//! the whole completion or streams deltas from a worker thread.
//!
//! ```
//! use tokflow_api::{GenerateOptions, Pipeline, ScriptedModel, VocabDecoder};
//!
//! let vocab = VocabDecoder::from_pieces([(0, "<s>"), (1, "Hello"), (2, ","), (3, "▁world")]);
//! let model = ScriptedModel::new(vocab, vec![vec![0], vec![1, 2], vec![3]]);
//! let pipeline = Pipeline::new(model);
//!
//! let deltas: Vec<String> = pipeline
//!     .stream_generate("Hi", GenerateOptions::default())?
//!     .collect();
//! assert_eq!(deltas, vec!["Hello, world"]);
//! # Ok::<(), tokflow_api::ApiError>(())
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod prompt;
pub mod sink;
pub mod vocab;

// Re-export key types
pub use config::{Config, ConfigBuilder};
pub use error::{ApiError, Result};
pub use model::{Model, ScriptedModel};
pub use options::{GenerateOptions, GenerateOptionsBuilder};
pub use pipeline::{Pipeline, TextStream};
pub use prompt::{build_prompt, Turn};
pub use sink::ChannelSink;
pub use vocab::VocabDecoder;

pub use tokflow_core::{HoldbackPolicy, StreamStats, TokenId};
