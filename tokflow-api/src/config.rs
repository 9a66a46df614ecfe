//! High-level configuration API

use crate::error::{ApiError, Result};
use crate::options::GenerateOptions;
use tokflow_core::HoldbackPolicy;

/// Holdback policy and default generation options for a [`Pipeline`](crate::Pipeline)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    policy: HoldbackPolicy,
    options: GenerateOptions,
}

impl Config {
    /// Create a builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn policy(&self) -> &HoldbackPolicy {
        &self.policy
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.policy
            .validate()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        self.options.validate()
    }
}

/// Configuration builder
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Replace the whole holdback policy
    pub fn policy(mut self, policy: HoldbackPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Replace the whole set of generation options
    pub fn options(mut self, options: GenerateOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Set the characters that hold back emission
    pub fn soft_punctuation(mut self, marks: impl IntoIterator<Item = char>) -> Self {
        self.config.policy = self.config.policy.with_soft_punctuation(marks);
        self
    }

    /// Set the incomplete-character marker
    pub fn incomplete_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.policy = self.config.policy.with_incomplete_marker(marker);
        self
    }

    /// Bound the number of buffered tokens
    pub fn max_pending_tokens(mut self, limit: Option<usize>) -> Self {
        self.config.policy = self.config.policy.with_max_pending_tokens(limit);
        self
    }

    /// Set the total token cap of a generation
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.config.options.max_length = max_length;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.policy(), &HoldbackPolicy::default());
        assert_eq!(config.options(), &GenerateOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .soft_punctuation(['，', '。'])
            .max_pending_tokens(Some(32))
            .max_length(128)
            .build()
            .unwrap();
        assert_eq!(config.policy().soft_punctuation, vec!['，', '。']);
        assert_eq!(config.policy().max_pending_tokens, Some(32));
        assert_eq!(config.options().max_length, 128);
    }

    #[test]
    fn test_invalid_policy_is_a_config_error() {
        let result = Config::builder().incomplete_marker("").build();
        assert!(matches!(result, Err(ApiError::Config(_))));

        let result = Config::builder().max_pending_tokens(Some(0)).build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_invalid_options_rejected() {
        assert!(Config::builder().max_length(0).build().is_err());
    }
}
