//! CLI error types

use crate::config::ConfigError;
use std::path::PathBuf;

/// Error raised by a CLI command
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("Server error: {0}")]
    Server(String),
}
