//! Error types for the Jules SDK.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The failure half of every SDK operation.
///
/// A remote call resolves to exactly one of: success, [`SdkError::Api`]
/// (server reached, non-2xx), or [`SdkError::Network`] (transport failure).
/// [`SdkError::Precondition`] is raised locally and never reaches the network.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SdkError {
    /// The server answered with a non-2xx status. The body is kept verbatim.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The request never produced a usable response (connect, timeout, decode).
    #[error("Network error: {0}")]
    Network(String),

    /// The operation was attempted before its prerequisites were in place.
    #[error("{0}")]
    Precondition(String),
}

impl SdkError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Api error
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Creates a Network error
    pub fn network(cause: impl Into<String>) -> Self {
        Self::Network(cause.into())
    }

    /// Creates a Precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an API (non-2xx) error
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Check if this is a transport failure
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if this error was detected locally
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    /// HTTP status for API errors, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A type alias for `Result<T, SdkError>`.
pub type SdkResult<T> = std::result::Result<T, SdkError>;
