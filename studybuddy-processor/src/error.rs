//! Error types for studybuddy-processor
//!
//! Every variant is recoverable: the orchestrator always ends a failed
//! `submit` in a state from which a fresh `submit` is possible.

use crate::models::BundleError;
use crate::services::ServiceError;
use thiserror::Error;

/// Description used when a failure carries no message of its own
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process files";

/// Processing run error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    /// Submit called with an empty selection; nothing was sent
    #[error("No files selected")]
    NoFilesSelected,

    /// The submit future was dropped before the run finished
    #[error("Processing was cancelled")]
    Cancelled,

    /// Network or service-level failure
    #[error("Error processing file: {0}")]
    RemoteInvocation(String),

    /// Response received but not a valid artifact bundle
    #[error("Malformed processing result: {0}")]
    MalformedResult(String),
}

impl ProcessingError {
    /// Stable error code for logs
    pub fn code(&self) -> &'static str {
        match self {
            ProcessingError::NoFilesSelected => "NO_FILES_SELECTED",
            ProcessingError::Cancelled => "CANCELLED",
            ProcessingError::RemoteInvocation(_) => "REMOTE_INVOCATION_ERROR",
            ProcessingError::MalformedResult(_) => "MALFORMED_RESULT",
        }
    }

    /// Text for the failure notification
    ///
    /// Falls back to [`GENERIC_FAILURE_MESSAGE`] when the underlying error
    /// had nothing to say.
    pub fn user_message(&self) -> String {
        match self {
            ProcessingError::RemoteInvocation(detail) | ProcessingError::MalformedResult(detail)
                if detail.trim().is_empty() =>
            {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<ServiceError> for ProcessingError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Malformed(detail) => ProcessingError::MalformedResult(detail),
            other => ProcessingError::RemoteInvocation(other.to_string()),
        }
    }
}

impl From<BundleError> for ProcessingError {
    fn from(err: BundleError) -> Self {
        ProcessingError::MalformedResult(err.to_string())
    }
}

/// Result type for processing operations
pub type ProcessingResult<T> = Result<T, ProcessingError>;
