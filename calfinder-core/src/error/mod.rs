//! Core error types for calfinder

use thiserror::Error;

/// Main error type for calfinder operations
#[derive(Error, Debug)]
pub enum CalfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// An external program exited abnormally or reported a diagnostic
    #[error("{tool} failed: {message}")]
    Tool { tool: String, message: String },

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for calfinder operations
pub type CalfResult<T> = Result<T, CalfError>;

impl CalfError {
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        CalfError::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Process exit code used by the command line front-end
    pub fn exit_code(&self) -> i32 {
        match self {
            CalfError::Configuration(_) => 2,
            CalfError::Io(_) => 3,
            CalfError::Parse(_) => 4,
            CalfError::InvalidInput(_) => 5,
            CalfError::Tool { .. } => 6,
            CalfError::NotFound(_) => 7,
            CalfError::Other(_) => 1,
        }
    }
}

impl From<serde_json::Error> for CalfError {
    fn from(err: serde_json::Error) -> Self {
        CalfError::Parse(err.to_string())
    }
}

impl From<anyhow::Error> for CalfError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<CalfError>() {
            Ok(calf) => calf,
            Err(other) => CalfError::Other(other.to_string()),
        }
    }
}
