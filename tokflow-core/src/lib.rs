//! Incremental token-to-text streaming decoder
//!
//! A generative model produces token ids one (or a few) at a time. This crate
//! turns that stream into text that is safe to show a reader as soon as it is
//! stable, holding back anything that might still change:
//!
//! - a trailing incomplete multi-byte character (the decoder's `U+FFFD`),
//! - a clause ending in soft punctuation (`, ! : ; ?`),
//!
//! and never retracting text that was already delivered.
//!
//! # Architecture
//!
//! - [`StreamingDecodeBuffer`] owns the pending tokens and the emitted cursor
//! - [`Decode`] is the external detokenizer it calls
//! - [`TextSink`] receives text deltas
//! - [`HoldbackPolicy`] configures what counts as unstable
//!
//! # Example
//!
//! ```rust
//! use tokflow_core::{BoxError, Decode, StreamingDecodeBuffer, TokenId, Transcript};
//!
//! struct Words;
//!
//! impl Decode for Words {
//!     fn decode(&self, ids: &[TokenId]) -> Result<String, BoxError> {
//!         Ok(ids
//!             .iter()
//!             .map(|&id| match id {
//!                 1 => "Hello",
//!                 2 => ",",
//!                 3 => " world",
//!                 _ => "\n",
//!             })
//!             .collect())
//!     }
//! }
//!
//! let mut buffer = StreamingDecodeBuffer::new(Words, Transcript::new());
//! buffer.push(&[7, 7, 7]).unwrap(); // prompt echo, discarded
//! buffer.push(&[1, 2]).unwrap(); // "Hello," is held
//! buffer.push(&[3]).unwrap(); // "Hello, world" is emitted
//! buffer.finish().unwrap();
//!
//! assert_eq!(buffer.sink().text(), "Hello, world");
//! assert!(buffer.sink().is_finished());
//! ```

pub mod buffer;
pub mod error;
pub mod policy;
pub mod sink;
pub mod stats;
pub mod traits;

pub use buffer::StreamingDecodeBuffer;
pub use error::{BoxError, Result, StreamError};
pub use policy::{HoldbackPolicy, Tail};
pub use sink::{sink_fn, Chunk, FnSink, Transcript};
pub use stats::StreamStats;
pub use traits::{Decode, TextSink, TokenId, TokenStreamer};
