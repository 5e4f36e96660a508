//! Error types for the rekvizity-core library.
//!
//! Extraction itself never fails: every field resolves to found or not found.
//! These errors cover the surfaces around it (configuration files, I/O).

use thiserror::Error;

/// Main error type for the rekvizity library.
#[derive(Error, Debug)]
pub enum RekvizityError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for the rekvizity library.
pub type Result<T> = std::result::Result<T, RekvizityError>;
