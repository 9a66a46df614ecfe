//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// Invalid file pattern
    InvalidPattern(String),
    /// Configuration error
    ConfigError(String),
    /// Malformed line in a token trace
    InvalidTrace { line: usize, message: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::InvalidPattern(pattern) => write!(f, "Invalid file pattern: {pattern}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::InvalidTrace { line, message } => {
                write!(f, "Invalid trace at line {line}: {message}")
            }
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error_display() {
        let error = CliError::FileNotFound("vocab.json".to_string());
        assert_eq!(error.to_string(), "File not found: vocab.json");
    }

    #[test]
    fn test_invalid_pattern_error_display() {
        let error = CliError::InvalidPattern("[invalid".to_string());
        assert_eq!(error.to_string(), "Invalid file pattern: [invalid");
    }

    #[test]
    fn test_config_error_display() {
        let error = CliError::ConfigError("unknown format 'xml'".to_string());
        assert_eq!(error.to_string(), "Configuration error: unknown format 'xml'");
    }

    #[test]
    fn test_invalid_trace_error_display() {
        let error = CliError::InvalidTrace {
            line: 3,
            message: "'abc' is not a token id".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid trace at line 3: 'abc' is not a token id"
        );
    }

    #[test]
    fn test_error_converts_into_anyhow() {
        let result: CliResult<()> = Err(CliError::FileNotFound("trace.txt".to_string()).into());
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
        assert!(err.to_string().contains("trace.txt"));
    }

    #[test]
    fn test_error_with_special_characters() {
        let error = CliError::FileNotFound("トレース/对话 1.txt".to_string());
        assert_eq!(error.to_string(), "File not found: トレース/对话 1.txt");
    }
}
