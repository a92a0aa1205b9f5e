//! Handler error types

use hrlink_core::DomainError;
use thiserror::Error;

/// Handler error type
///
/// Every variant is recovered by the router: logged, the frame's effect
/// skipped, the connection left open.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame was structurally valid but semantically unacceptable
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The storage collaborator failed; the dependent delivery is skipped
    #[error("Persistence failed: {0}")]
    Persistence(#[source] DomainError),

    /// Writing back to the originating connection failed
    #[error("Peer write failed")]
    PeerWrite,
}

impl From<DomainError> for HandlerError {
    fn from(e: DomainError) -> Self {
        Self::Persistence(e)
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
