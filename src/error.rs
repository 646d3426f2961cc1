//! Error handling module for debsetup
//!
//! Provides centralized error handling with proper error types using thiserror.
//! All errors in the application should use these types for consistency.
//!
//! Every provisioning handler returns [`Result`]; the caller (menu dispatcher
//! or CLI subcommand) decides what a failure means. The default policy is
//! abort on first error.

use thiserror::Error;

/// Main error type for debsetup
#[derive(Error, Debug)]
pub enum SetupError {
    /// IO errors (file writes, directory creation, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors (config files)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A host command failed or could not be spawned
    #[error("Command failed: {0}")]
    Command(String),

    /// Network fetch errors
    #[error("Download failed: {0}")]
    Download(String),

    /// A downloaded file did not match its pinned digest
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Archive discovery/extraction errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// Validation errors (user input, config values)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors (loading, detection)
    #[error("Configuration error: {0}")]
    Config(String),

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, SetupError>;

// Convenient error constructors
impl SetupError {
    /// Create a command error
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Create a download error
    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    /// Create a checksum mismatch error
    pub fn checksum(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ChecksumMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an archive error
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SetupError::config("no home directory for user");
        assert_eq!(
            err.to_string(),
            "Configuration error: no home directory for user"
        );

        let err = SetupError::validation("unrecognized menu choice");
        assert_eq!(err.to_string(), "Validation error: unrecognized menu choice");
    }

    #[test]
    fn test_checksum_display() {
        let err = SetupError::checksum("aaaa", "bbbb");
        assert_eq!(err.to_string(), "Checksum mismatch: expected aaaa, got bbbb");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SetupError = io_err.into();
        assert!(matches!(err, SetupError::Io(_)));
    }

    #[test]
    fn test_error_constructors() {
        let err = SetupError::command("apt-get exited with code 100");
        assert!(matches!(err, SetupError::Command(_)));

        let err = SetupError::archive("no matching archive");
        assert!(matches!(err, SetupError::Archive(_)));
    }
}
