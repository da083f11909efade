//! Error types for the profiling pass.

use thiserror::Error;

/// Errors that can abort a profiling run.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A non-blank line failed to parse as a JSON document
    #[error("line {line}: failed to parse JSON: {source}")]
    JsonParse {
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    /// A line could not be decoded with the configured encoding
    #[error("line {line}: input is not valid {encoding}")]
    Decode { line: u64, encoding: &'static str },

    /// Invalid profiling configuration
    #[error(transparent)]
    Config(#[from] indigo_config::ConfigError),

    /// I/O failure while reading input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for profiling operations.
pub type ProfileResult<T> = Result<T, ProfileError>;
