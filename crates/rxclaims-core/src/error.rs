//! Error types for rxclaims

use std::time::Duration;
use thiserror::Error;

/// Result type alias using RxClaimsError
pub type Result<T> = std::result::Result<T, RxClaimsError>;

/// Error type alias for convenience
pub type Error = RxClaimsError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
    pub const EXTERNAL_SERVICE: i32 = 4;
}

/// Main error type for rxclaims
#[derive(Debug, Error)]
pub enum RxClaimsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Claims source not found: {0}")]
    SourceNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Generation timed out after {0:?}")]
    GenerationTimeout(Duration),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RxClaimsError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SourceNotFound(_) => exit_codes::NOT_FOUND,
            Self::InvalidInput(_) | Self::Config(_) => exit_codes::INVALID_INPUT,
            Self::Http(_) | Self::Embedding(_) | Self::Generation(_) | Self::GenerationTimeout(_) => {
                exit_codes::EXTERNAL_SERVICE
            }
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// Whether a caller may keep serving after this error.
    ///
    /// Generation failures and timeouts only affect the current question.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Generation(_) | Self::GenerationTimeout(_) | Self::Http(_)
        )
    }
}
