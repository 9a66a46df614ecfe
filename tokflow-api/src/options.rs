//! Generation options

use crate::error::{ApiError, Result};

/// Sampling and length settings handed to a [`Model`](crate::Model)
///
/// The pipeline only interprets `max_length` (through the models it drives);
/// the remaining fields are passed through to the model untouched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct GenerateOptions {
    /// Cap on prompt plus generated tokens
    pub max_length: usize,
    /// Prompt tokens kept when the prompt is longer than this
    pub max_context_length: usize,
    /// Sample instead of greedy decoding
    pub do_sample: bool,
    /// Top-k cutoff, 0 disables it
    pub top_k: usize,
    /// Nucleus sampling mass
    pub top_p: f32,
    pub temperature: f32,
    pub repetition_penalty: f32,
    /// Worker threads for the model, 0 picks automatically
    pub num_threads: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_length: 2048,
            max_context_length: 512,
            do_sample: true,
            top_k: 0,
            top_p: 0.7,
            temperature: 0.95,
            repetition_penalty: 1.0,
            num_threads: 0,
        }
    }
}

impl GenerateOptions {
    /// Create a builder starting from the defaults
    pub fn builder() -> GenerateOptionsBuilder {
        GenerateOptionsBuilder::default()
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(ApiError::Config("max_length must be positive".into()));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(ApiError::Config(format!(
                "top_p must be in (0, 1], got {}",
                self.top_p
            )));
        }
        if !(self.temperature >= 0.0) {
            return Err(ApiError::Config(format!(
                "temperature must not be negative, got {}",
                self.temperature
            )));
        }
        if !(self.repetition_penalty > 0.0) {
            return Err(ApiError::Config(format!(
                "repetition_penalty must be positive, got {}",
                self.repetition_penalty
            )));
        }
        Ok(())
    }
}

/// Builder for [`GenerateOptions`]
#[derive(Debug, Default)]
pub struct GenerateOptionsBuilder {
    options: GenerateOptions,
}

impl GenerateOptionsBuilder {
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.options.max_length = max_length;
        self
    }

    pub fn max_context_length(mut self, max_context_length: usize) -> Self {
        self.options.max_context_length = max_context_length;
        self
    }

    pub fn do_sample(mut self, do_sample: bool) -> Self {
        self.options.do_sample = do_sample;
        self
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.options.top_k = top_k;
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.options.top_p = top_p;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = temperature;
        self
    }

    pub fn repetition_penalty(mut self, repetition_penalty: f32) -> Self {
        self.options.repetition_penalty = repetition_penalty;
        self
    }

    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.options.num_threads = num_threads;
        self
    }

    /// Validate and return the options
    pub fn build(self) -> Result<GenerateOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}
