//! Error types and handling for artifactor
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for bundling operations
#[derive(Error, Diagnostic, Debug)]
pub enum ArtifactorError {
    // Source tree errors
    #[error("Artifacts path not found: {path}")]
    #[diagnostic(
        code(artifactor::fs::artifacts_not_found),
        help("Point --artifacts-path at the root of a content repository")
    )]
    ArtifactsPathNotFound { path: String },

    #[error("Failed to read directory: {path}")]
    #[diagnostic(
        code(artifactor::fs::dir_read_failed),
        help("Check that the source directory exists and is readable")
    )]
    DirReadFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(artifactor::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(artifactor::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(artifactor::fs::io_error))]
    IoError { message: String },

    // Bundle errors
    #[error("Failed to clear bundle directory: {path}")]
    #[diagnostic(
        code(artifactor::bundle::clean_failed),
        help("Pass --preserve-bundles to keep pre-existing bundle contents")
    )]
    BundleCleanFailed { path: String, reason: String },

    // Serialization errors
    #[error("Failed to re-serialize content file: {path}")]
    #[diagnostic(code(artifactor::yaml::emit_failed))]
    YamlEmitFailed { path: String, reason: String },
}

impl From<std::io::Error> for ArtifactorError {
    fn from(err: std::io::Error) -> Self {
        ArtifactorError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ArtifactorError {
    fn from(err: serde_yaml::Error) -> Self {
        ArtifactorError::YamlEmitFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ArtifactorError>;
