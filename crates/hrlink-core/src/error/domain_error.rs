//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{MessageId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("Invalid session token")]
    InvalidSession,

    #[error("Session expired")]
    SessionExpired,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message body too long: max {max} characters")]
    BodyTooLong { max: usize },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Directory error: {0}")]
    DirectoryError(String),
}

impl DomainError {
    /// Check if this is a not-found error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::MessageNotFound(_))
    }

    /// Check if this is an authentication error
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::InvalidSession | Self::SessionExpired)
    }

    /// Check if this is a validation error
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::BodyTooLong { .. })
    }

    /// Error code for logs and API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::MessageNotFound(_) => "MESSAGE_NOT_FOUND",
            Self::InvalidSession => "INVALID_SESSION",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::BodyTooLong { .. } => "BODY_TOO_LONG",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::DirectoryError(_) => "DIRECTORY_ERROR",
        }
    }
}
