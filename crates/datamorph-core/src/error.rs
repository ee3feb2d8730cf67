//! Error types for the Datamorph core library
//!
//! This module defines the error handling system for Datamorph, using
//! thiserror for ergonomic error definitions and anyhow for flexible
//! error sources at adapter boundaries.

use thiserror::Error;

/// Main error type for Datamorph operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed dot-path text
    #[error("Path syntax error in '{path}' at position {position}: {message}")]
    PathSyntax {
        message: String,
        path: String,
        position: usize,
    },

    /// Malformed input text at a strict construction boundary
    #[error("{format} parse error: {message}")]
    Parse {
        format: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Malformed mapping specification
    #[error("Mapping specification error: {message}")]
    Spec {
        message: String,
        context: Option<String>,
    },

    /// A structural invariant of the mapping engine was violated
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// JSON serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Construct a specification error without extra context
    pub fn spec(message: impl Into<String>) -> Self {
        Error::Spec {
            message: message.into(),
            context: None,
        }
    }

    /// Construct an invariant violation
    pub fn invariant(message: impl Into<String>) -> Self {
        Error::InvariantViolation {
            message: message.into(),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
