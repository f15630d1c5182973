//! Error types for fathom.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! the [`FathomError`] enum. Errors are scoped to the single request that raised
//! them: a failed `sync` or `search` never modifies the published generation.
//!
//! # Examples
//!
//! ```
//! use fathom::error::{FathomError, Result};
//!
//! fn check_terms(count: usize) -> Result<()> {
//!     if count > 10 {
//!         return Err(FathomError::QueryTooLong { terms: count, max: 10 });
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_terms(11).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for fathom operations.
#[derive(Error, Debug)]
pub enum FathomError {
    /// A search arrived before any generation was published.
    #[error("Still indexing: no index generation has been published yet")]
    StillIndexing,

    /// The parsed query has more distinct terms than allowed.
    #[error("Query too long: {terms} distinct terms (maximum {max})")]
    QueryTooLong { terms: usize, max: usize },

    /// The reference dictionary could not be loaded.
    #[error("Dictionary load failure: {0}")]
    DictionaryLoadFailure(String),

    /// A request shape the coordinator does not understand.
    #[error("Unknown request: {0}")]
    UnknownRequest(String),

    /// A manifest or one of its documents failed validation.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// A correlation edge with an empty term or an out-of-range weight.
    #[error("Invalid correlation: {0}")]
    InvalidCorrelation(String),

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O errors (dictionary files, configuration files, stdin/stdout)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with FathomError.
pub type Result<T> = std::result::Result<T, FathomError>;

impl FathomError {
    /// Create a new dictionary load error.
    pub fn dictionary<S: Into<String>>(msg: S) -> Self {
        FathomError::DictionaryLoadFailure(msg.into())
    }

    /// Create a new unknown request error.
    pub fn unknown_request<S: Into<String>>(msg: S) -> Self {
        FathomError::UnknownRequest(msg.into())
    }

    /// Create a new invalid manifest error.
    pub fn invalid_manifest<S: Into<String>>(msg: S) -> Self {
        FathomError::InvalidManifest(msg.into())
    }

    /// Create a new invalid correlation error.
    pub fn invalid_correlation<S: Into<String>>(msg: S) -> Self {
        FathomError::InvalidCorrelation(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        FathomError::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FathomError::Other(msg.into())
    }

    /// Whether the caller may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FathomError::StillIndexing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = FathomError::invalid_manifest("document 3 has an empty url");
        assert_eq!(
            error.to_string(),
            "Invalid manifest: document 3 has an empty url"
        );

        let error = FathomError::QueryTooLong { terms: 11, max: 10 };
        assert_eq!(
            error.to_string(),
            "Query too long: 11 distinct terms (maximum 10)"
        );

        let error = FathomError::unknown_request("ping");
        assert_eq!(error.to_string(), "Unknown request: ping");
    }

    #[test]
    fn test_retryable() {
        assert!(FathomError::StillIndexing.is_retryable());
        assert!(!FathomError::QueryTooLong { terms: 11, max: 10 }.is_retryable());
        assert!(!FathomError::dictionary("missing").is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let fathom_error = FathomError::from(io_error);

        match fathom_error {
            FathomError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
