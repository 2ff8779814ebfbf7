//! Error types for requirement loading and validation.

/// Errors that can occur when loading or validating a requirement file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the requirement file.
    #[error("failed to read requirement: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse requirement: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A requirement value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
