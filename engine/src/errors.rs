//! Condition database error types
//!
//! Every failure here is terminal: the engine never retries or recovers
//! locally. "No data valid at this time" is not an error and is reported
//! through [`crate::Resolved::NotValid`] instead.

use thiserror::Error;

/// Error category for structured logging and caller-side dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The object id does not resolve in the backend
    NotFound,
    /// The backend could not be opened or re-opened
    BackendUnavailable,
    /// The object exists but its content cannot be interpreted
    InvalidData,
    /// Unexpected logic bugs (poisoned locks and the like)
    Internal,
}

impl ErrorCategory {
    /// Machine-readable code for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::BackendUnavailable => "BACKEND_UNAVAILABLE",
            Self::InvalidData => "INVALID_DATA",
            Self::Internal => "INTERNAL",
        }
    }
}

/// Condition database error with category and context
#[derive(Debug, Error)]
pub enum CondDbError {
    #[error("{message}")]
    NotFound {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{message}")]
    BackendUnavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{message}")]
    InvalidData {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl CondDbError {
    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::BackendUnavailable { .. } => ErrorCategory::BackendUnavailable,
            Self::InvalidData { .. } => ErrorCategory::InvalidData,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            source: None,
        }
    }

    /// Create a not-found error with source
    pub fn not_found_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::NotFound {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a backend-unavailable error with source
    pub fn backend_unavailable_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::BackendUnavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a backend-unavailable error
    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Create an invalid-data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
            source: None,
        }
    }

    /// Create an invalid-data error with source
    pub fn invalid_data_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InvalidData {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Result type for condition database operations
pub type Result<T> = std::result::Result<T, CondDbError>;
