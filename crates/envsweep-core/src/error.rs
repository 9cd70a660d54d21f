use std::io;
use std::path::PathBuf;

use glob::PatternError;
use thiserror::Error;

/// Custom result type for envsweep operations
pub type SweepResult<T> = Result<T, SweepError>;

/// Custom error type for envsweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Detection error: {0}")]
    Detection(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Usage data error: {0}")]
    Usage(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Scan error: {0}")]
    Scan(String),

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    #[error("Pattern error: {0}")]
    Pattern(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SweepError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SweepError::Config(msg.into())
    }

    /// Create a new detection error
    pub fn detection<S: Into<String>>(msg: S) -> Self {
        SweepError::Detection(msg.into())
    }

    /// Create a new metadata error
    pub fn metadata<S: Into<String>>(msg: S) -> Self {
        SweepError::Metadata(msg.into())
    }

    /// Create a new usage data error
    pub fn usage<S: Into<String>>(msg: S) -> Self {
        SweepError::Usage(msg.into())
    }

    /// Create a new version error
    pub fn version<S: Into<String>>(msg: S) -> Self {
        SweepError::Version(msg.into())
    }

    /// Create a new scan error
    pub fn scan<S: Into<String>>(msg: S) -> Self {
        SweepError::Scan(msg.into())
    }
}

impl From<io::Error> for SweepError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<PatternError> for SweepError {
    fn from(err: PatternError) -> Self {
        Self::Pattern(err.to_string())
    }
}
