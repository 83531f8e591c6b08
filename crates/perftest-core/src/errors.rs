//! Error types for test definition construction
//!
//! Generation is pure and deterministic, so every failure is surfaced to the
//! caller immediately and no partial document is ever returned.

use thiserror::Error;

/// Core error type for building, replicating and loading test definitions
#[derive(Debug, Error)]
pub enum PerftestError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Construction error: {0}")]
    Construction(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML rendering error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid test '{test}': {reason}")]
    Validation { test: String, reason: String },
}

pub type Result<T> = core::result::Result<T, PerftestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PerftestError::InvalidArgument("count must not be negative".to_string());
        assert_eq!(err.to_string(), "Invalid argument: count must not be negative");

        let err = PerftestError::Validation {
            test: "Topic persistence".to_string(),
            reason: "duplicate client name 'a'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid test 'Topic persistence': duplicate client name 'a'"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PerftestError = parse_err.into();
        assert!(matches!(err, PerftestError::Serialization(_)));
    }
}
