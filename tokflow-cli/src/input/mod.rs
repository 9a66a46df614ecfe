//! Input handling module

pub mod glob_resolver;
pub mod trace_reader;

pub use glob_resolver::resolve_patterns;
pub use trace_reader::{parse_trace, read_trace};
