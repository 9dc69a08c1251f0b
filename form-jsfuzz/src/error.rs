// form-jsfuzz/src/error.rs
//! Error types for configuration and corpus handling

use thiserror::Error;

/// Errors surfaced by the fuzzing infrastructure.
///
/// Mutation passes never fail; these come from loading configuration and
/// reading or writing corpus files.
#[derive(Error, Debug)]
pub enum FuzzError {
    /// Error while reading or writing corpus and artifact files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while (de)serializing a program or configuration
    #[error("Failed to (de)serialize: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration values outside their valid range
    #[error("Invalid mutator configuration: {0}")]
    InvalidConfig(String),
}

pub type FuzzResult<T> = Result<T, FuzzError>;
