//! Error types for the field pipeline.

use thiserror::Error;

/// Result type alias using FieldError.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors that terminate a single pipeline run.
///
/// None of these are retried internally; the caller decides what to report.
#[derive(Debug, Error)]
pub enum FieldError {
    // === Network ===
    #[error("transport error (status {status:?}): {message}")]
    Transport {
        /// HTTP status, when the server answered at all.
        status: Option<u16>,
        message: String,
    },

    // === Payload ===
    #[error("failed to decode payload: {0}")]
    Decode(String),

    #[error("shape mismatch: {0}")]
    Shape(String),

    // === Local ===
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("worker task failed: {0}")]
    Task(String),
}

impl FieldError {
    /// Create a Transport error.
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// Create a Decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a Shape error.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short stable name of the error kind, for logs and status output.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldError::Transport { .. } => "transport",
            FieldError::Decode(_) => "decode",
            FieldError::Shape(_) => "shape",
            FieldError::Config(_) => "config",
            FieldError::Task(_) => "task",
        }
    }

    /// HTTP status carried by a transport failure.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            FieldError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FieldError {
    fn from(err: serde_json::Error) -> Self {
        FieldError::Config(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for FieldError {
    fn from(err: std::io::Error) -> Self {
        FieldError::Config(err.to_string())
    }
}
