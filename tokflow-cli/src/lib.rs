//! tokflow CLI library
//!
//! This library provides the command-line interface for replaying token
//! traces through the tokflow streaming decoder.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
