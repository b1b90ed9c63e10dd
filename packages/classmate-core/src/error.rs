//! # Error Handling
//!
//! Error types for the ClassMate client core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Config Errors (100-199)                                           │
//! │  │   └── InvalidConfig         - Bad base URL, zero timeout, ...       │
//! │  │                                                                      │
//! │  ├── Network Errors (200-299)                                          │
//! │  │   ├── ConnectionFailed      - Request never reached the backend     │
//! │  │   ├── Timeout               - Request timed out                     │
//! │  │   └── Http                  - Non-success status, no error body     │
//! │  │                                                                      │
//! │  ├── Resource Errors (300-399)                                         │
//! │  │   └── NotFound              - Unknown user / photo / post id        │
//! │  │                                                                      │
//! │  ├── Backend Errors (400-499)                                          │
//! │  │   └── Api                   - Structured ErrorDetails body          │
//! │  │                                                                      │
//! │  ├── Moderation Errors (500-599)                                       │
//! │  │   └── NotPermitted          - Viewer lacks the role for an action   │
//! │  │                                                                      │
//! │  └── Internal Errors (900-999)                                         │
//! │      ├── SerializationError                                            │
//! │      ├── DeserializationError                                          │
//! │      └── Internal                                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! View-models never bubble these up to the UI. They log the failure and
//! publish it as [`ClientEvent::OperationFailed`](crate::events::ClientEvent),
//! leaving the displayed state as it was.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for client core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the client core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ========================================================================
    // Config Errors (100-199)
    // ========================================================================

    /// Client configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Network Errors (200-299)
    // ========================================================================

    /// The request could not be delivered
    #[error("Failed to reach backend: {0}")]
    ConnectionFailed(String),

    /// The request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The backend answered with a non-success status and no error body
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Raw response text (may be empty)
        message: String,
    },

    // ========================================================================
    // Resource Errors (300-399)
    // ========================================================================

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    // ========================================================================
    // Backend Errors (400-499)
    // ========================================================================

    /// The backend rejected the request with a structured error body
    #[error("{code} ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Backend error code, e.g. `USER_NOT_FOUND`
        code: String,
        /// Backend message
        message: String,
    },

    // ========================================================================
    // Moderation Errors (500-599)
    // ========================================================================

    /// The viewer's role does not allow the action
    #[error("Action not permitted: {0}")]
    NotPermitted(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Request body could not be encoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Response body could not be decoded
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Numeric error code, grouped by category:
    /// - 100-199: Config
    /// - 200-299: Network
    /// - 300-399: Resource
    /// - 400-499: Backend
    /// - 500-599: Moderation
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_) => 100,

            Error::ConnectionFailed(_) => 200,
            Error::Timeout(_) => 201,
            Error::Http { .. } => 202,

            Error::NotFound(_) => 300,

            Error::Api { .. } => 400,

            Error::NotPermitted(_) => 500,

            Error::SerializationError(_) => 900,
            Error::DeserializationError(_) => 901,
            Error::Internal(_) => 902,
        }
    }

    /// Network-class failures that a later user action may resolve.
    ///
    /// Nothing in the client retries automatically.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::ConnectionFailed(_) | Error::Timeout(_) => true,
            Error::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
            || matches!(self, Error::Api { status: 404, .. } | Error::Http { status: 404, .. })
    }

    /// Build an error from a non-success response.
    ///
    /// The backend's exception handler answers with an [`ErrorDetails`]
    /// body; anything else is kept as raw text.
    pub fn from_response(status: u16, path: &str, body: &str) -> Self {
        if let Ok(details) = serde_json::from_str::<ErrorDetails>(body) {
            return Error::Api {
                status,
                code: details.error_code,
                message: details.message,
            };
        }
        if status == 404 {
            return Error::NotFound(path.to_string());
        }
        Error::Http {
            status,
            message: body.to_string(),
        }
    }
}

/// Error body produced by the backend's global exception handler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Server-local time the error was raised
    pub time_stamp: Option<chrono::NaiveDateTime>,
    /// Human-readable message
    pub message: String,
    /// Request description, e.g. `uri=/api/auth/register`
    #[serde(default)]
    pub path: String,
    /// Stable error code, e.g. `EMAIL_ALREADY_TAKEN`
    pub error_code: String,
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else if err.is_decode() {
            Error::DeserializationError(err.to_string())
        } else if let Some(status) = err.status() {
            Error::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_builder() {
            Error::InvalidConfig(err.to_string())
        } else {
            Error::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            Error::DeserializationError(err.to_string())
        } else {
            Error::SerializationError(err.to_string())
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
