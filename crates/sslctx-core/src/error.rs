use thiserror::Error;

use crate::types::TrustAction;

/// Result type alias for SSL context operations
pub type Result<T> = std::result::Result<T, SslContextError>;

/// Errors that can occur while reviewing or deciding certificate trust
#[derive(Error, Debug)]
pub enum SslContextError {
    /// Authentication failed - missing or invalid credentials
    #[error("authentication failed: missing or invalid credentials")]
    Unauthorized,

    /// The principal may not read or manage the SSL context
    #[error("not authorized: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// Server returned a non-success response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the server
        message: String,
    },

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Response body could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A link or base URL could not be resolved
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// The certificate carries no link for the requested action
    #[error("action `{0}` is not permitted for this certificate")]
    ActionNotPermitted(TrustAction),

    /// The selected certificate file exceeds the upload limit
    #[error("certificate file too large: {size} bytes, must be below {limit} bytes")]
    UploadTooLarge {
        /// Size of the selected file
        size: usize,
        /// Exclusive upper bound
        limit: usize,
    },

    /// Upload was submitted without a selected file
    #[error("no certificate file selected")]
    NoFileSelected,
}

impl SslContextError {
    /// Returns true for transport, status, and body failures.
    ///
    /// These are surfaced to the user as a single "request failed" condition.
    #[must_use]
    pub const fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized
                | Self::Forbidden(_)
                | Self::NotFound { .. }
                | Self::Api { .. }
                | Self::Http(_)
                | Self::Json(_)
        )
    }

    /// Returns true if the error was raised before any request was sent
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::ActionNotPermitted(_) | Self::UploadTooLarge { .. } | Self::NoFileSelected
        )
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Forbidden(_))
    }

    /// Returns the HTTP status code if the server answered
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
