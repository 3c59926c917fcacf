//! Classification error types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse category of a classification failure.
///
/// Every failure path of the classifier maps onto exactly one of these, so
/// callers can branch on the kind and show the message verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "ValidationError")]
    Validation,
    #[serde(rename = "ConfigurationError")]
    Configuration,
    #[serde(rename = "TransportError")]
    Transport,
    #[serde(rename = "ParseError")]
    Parse,
    #[serde(rename = "OracleError")]
    Oracle,
    #[serde(rename = "EmptyResultError")]
    EmptyResult,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Transport => "TransportError",
            ErrorKind::Parse => "ParseError",
            ErrorKind::Oracle => "OracleError",
            ErrorKind::EmptyResult => "EmptyResultError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while classifying a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// Input text was empty or whitespace only.
    #[error("{0}")]
    Validation(String),
    /// Credentials or endpoint missing, or a client could not be built.
    #[error("{0}")]
    Configuration(String),
    /// Network failure, timeout, or a non-200 response.
    #[error("{0}")]
    Transport(String),
    /// Response body could not be understood.
    #[error("{0}")]
    Parse(String),
    /// The model reported an error of its own.
    #[error("{0}")]
    Oracle(String),
    /// The model returned no labels at all.
    #[error("{0}")]
    EmptyResult(String),
}

impl ClassifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassifyError::Validation(_) => ErrorKind::Validation,
            ClassifyError::Configuration(_) => ErrorKind::Configuration,
            ClassifyError::Transport(_) => ErrorKind::Transport,
            ClassifyError::Parse(_) => ErrorKind::Parse,
            ClassifyError::Oracle(_) => ErrorKind::Oracle,
            ClassifyError::EmptyResult(_) => ErrorKind::EmptyResult,
        }
    }

    /// Human-readable message, suitable for direct display.
    pub fn message(&self) -> &str {
        match self {
            ClassifyError::Validation(msg)
            | ClassifyError::Configuration(msg)
            | ClassifyError::Transport(msg)
            | ClassifyError::Parse(msg)
            | ClassifyError::Oracle(msg)
            | ClassifyError::EmptyResult(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_message() {
        let err = ClassifyError::Oracle("model loading".to_string());
        assert_eq!(err.kind(), ErrorKind::Oracle);
        assert_eq!(err.message(), "model loading");
        assert_eq!(err.to_string(), "model loading");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::Validation.to_string(), "ValidationError");
        assert_eq!(
            serde_json::to_string(&ErrorKind::EmptyResult).unwrap(),
            "\"EmptyResultError\""
        );
    }
}
