//! CLI error types.

use std::path::PathBuf;

use sim_core::market_data::ProviderError;
use sim_core::SimError;
use thiserror::Error;

/// Errors raised by the command-line runner.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is missing, malformed or out of range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid command-line or environment value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure inside the simulation engine.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Price file missing or unreadable.
    #[error("Market data error: {0}")]
    Provider(#[from] ProviderError),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse failure.
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialisation failure.
    #[error("Failed to serialise report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_error_is_transparent() {
        let err: CliError = SimError::WeightSum { sum: 0.9 }.into();
        assert_eq!(err.to_string(), "Portfolio weights sum to 0.9, expected 1");
    }

    #[test]
    fn test_file_not_found_display() {
        let err = CliError::FileNotFound(PathBuf::from("data/SPY.csv"));
        assert_eq!(err.to_string(), "File not found: data/SPY.csv");
    }
}
