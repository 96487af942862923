//! Error types for the ragplay workspace.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! corpus loading, parameter validation, generation, embedding, retrieval
//! and prompt errors.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for ragplay.
///
/// All fallible functions return `Result<T, AppError>`.
/// An empty index is not an error: retrieval degrades to an empty context.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The corpus file does not exist
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Caller supplied an out-of-range parameter (k, temperature, chunking)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Language-model provider failures
    #[error("Generation error: {0}")]
    Generation(String),

    /// Embedding provider failures
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Index and retrieval errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The request was cancelled by the caller
    #[error("Request cancelled")]
    Cancelled,
}

impl AppError {
    /// Whether the error was caused by the caller rather than a collaborator.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidParameter(_) | AppError::SourceNotFound(_) | AppError::Config(_)
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_not_found_message() {
        let err = AppError::SourceNotFound(PathBuf::from("data/documents.txt"));
        assert_eq!(err.to_string(), "Source not found: data/documents.txt");
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_generation_is_not_caller_error() {
        let err = AppError::Generation("provider unavailable".to_string());
        assert!(!err.is_caller_error());
        assert!(err.to_string().contains("provider unavailable"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse: Result<Vec<u32>, _> = serde_yaml::from_str("not: [a list");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
