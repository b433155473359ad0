//! Error types for CodeMeter core.

use std::{error::Error, fmt};

/// Error type for CodeMeter core operations.
#[derive(Debug)]
pub enum CodeMeterError {
    /// The completion provider failed or is not configured.
    Provider(String),
    /// A response could not be decoded.
    Parse(String),
}

impl fmt::Display for CodeMeterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(message) => write!(f, "provider error: {message}"),
            Self::Parse(message) => write!(f, "parse error: {message}"),
        }
    }
}

impl Error for CodeMeterError {}

impl From<serde_json::Error> for CodeMeterError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

/// Convenience result type for CodeMeter core.
pub type Result<T> = std::result::Result<T, CodeMeterError>;
