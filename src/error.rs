//! Error types for the SpamGuard library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`SpamGuardError`] enum. The variants map onto the failure classes of the
//! pipeline: bad training input, misuse of an unfitted vectorizer, a training
//! split that lacks a class, and missing or unreadable model artifacts.
//!
//! # Examples
//!
//! ```
//! use spamguard::error::{Result, SpamGuardError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SpamGuardError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for SpamGuard operations.
#[derive(Error, Debug)]
pub enum SpamGuardError {
    /// The training corpus is missing, unreadable or malformed.
    #[error("Input data error: {0}")]
    InputData(String),

    /// A vectorizer was used before it was fitted.
    #[error("Vectorizer is not fitted: {0}")]
    NotFitted(String),

    /// The training data does not contain every class.
    #[error("Insufficient training data: {0}")]
    InsufficientData(String),

    /// A model artifact does not exist.
    #[error("Model artifact not found: {}", .0.display())]
    ArtifactMissing(PathBuf),

    /// A model artifact exists but could not be read back.
    #[error("Model artifact {} is corrupt: {reason}", .path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid argument passed to an operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SpamGuardError.
pub type Result<T> = std::result::Result<T, SpamGuardError>;

impl SpamGuardError {
    /// Create a new input data error.
    pub fn input_data<S: Into<String>>(msg: S) -> Self {
        SpamGuardError::InputData(msg.into())
    }

    /// Create a new not-fitted error.
    pub fn not_fitted<S: Into<String>>(msg: S) -> Self {
        SpamGuardError::NotFitted(msg.into())
    }

    /// Create a new insufficient data error.
    pub fn insufficient_data<S: Into<String>>(msg: S) -> Self {
        SpamGuardError::InsufficientData(msg.into())
    }

    /// Create a new artifact missing error.
    pub fn artifact_missing<P: AsRef<Path>>(path: P) -> Self {
        SpamGuardError::ArtifactMissing(path.as_ref().to_path_buf())
    }

    /// Create a new artifact corrupt error.
    pub fn artifact_corrupt<P: AsRef<Path>, S: Into<String>>(path: P, reason: S) -> Self {
        SpamGuardError::ArtifactCorrupt {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SpamGuardError::Analysis(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SpamGuardError::InvalidArgument(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SpamGuardError::InvalidArgument(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SpamGuardError::Other(msg.into())
    }

    /// Whether a caller can report this error and carry on.
    ///
    /// Only artifact loading failures qualify: they are setup problems fixed by
    /// (re)running training, not bugs or bad input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SpamGuardError::ArtifactMissing(_) | SpamGuardError::ArtifactCorrupt { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SpamGuardError::input_data("missing column 'spam'");
        assert_eq!(error.to_string(), "Input data error: missing column 'spam'");

        let error = SpamGuardError::insufficient_data("no spam examples");
        assert_eq!(
            error.to_string(),
            "Insufficient training data: no spam examples"
        );

        let error = SpamGuardError::analysis("bad pattern");
        assert_eq!(error.to_string(), "Analysis error: bad pattern");
    }

    #[test]
    fn test_artifact_errors_name_the_path() {
        let error = SpamGuardError::artifact_missing("models/spam_model.bin");
        assert_eq!(
            error.to_string(),
            "Model artifact not found: models/spam_model.bin"
        );

        let error = SpamGuardError::artifact_corrupt("models/vectorizer.bin", "unexpected eof");
        assert_eq!(
            error.to_string(),
            "Model artifact models/vectorizer.bin is corrupt: unexpected eof"
        );
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(SpamGuardError::artifact_missing("x").is_recoverable());
        assert!(SpamGuardError::artifact_corrupt("x", "y").is_recoverable());
        assert!(!SpamGuardError::input_data("x").is_recoverable());
        assert!(!SpamGuardError::not_fitted("x").is_recoverable());
        assert!(!SpamGuardError::insufficient_data("x").is_recoverable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = SpamGuardError::from(io_error);

        match error {
            SpamGuardError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
