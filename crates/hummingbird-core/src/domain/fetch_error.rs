//! Classified fetch failures
//!
//! Every failure of a page fetch is reduced to one of five kinds before it
//! reaches the orchestration layer. Only the page fetcher adapter performs
//! that reduction; everything above it reasons about [`FetchErrorKind`]
//! alone.

use std::fmt;

use thiserror::Error;

/// A page fetch failure, already classified
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The outgoing request could not be constructed (e.g. bad base URL)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transport-level failure: connect error, timeout, lost connectivity
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// The response payload did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Non-2xx status not covered by [`FetchError::Unauthorized`]
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP-like status code
        status: u16,
        /// Response body or reason, for diagnostics
        message: String,
    },

    /// 401/403, or no credential available
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// Discriminant of [`FetchError`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    InvalidRequest,
    NetworkUnreachable,
    Decode,
    Server,
    Unauthorized,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchErrorKind::InvalidRequest => "invalid-request",
            FetchErrorKind::NetworkUnreachable => "network-unreachable",
            FetchErrorKind::Decode => "decode-error",
            FetchErrorKind::Server => "server-error",
            FetchErrorKind::Unauthorized => "unauthorized",
        };
        f.write_str(s)
    }
}

impl FetchError {
    /// Create a server error from status and message
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Classifies a non-2xx HTTP-like status
    ///
    /// 401 and 403 are unauthorized; everything else is a server error
    /// carrying the code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(message.into()),
            _ => Self::server(status, message),
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::InvalidRequest(_) => FetchErrorKind::InvalidRequest,
            Self::NetworkUnreachable(_) => FetchErrorKind::NetworkUnreachable,
            Self::Decode(_) => FetchErrorKind::Decode,
            Self::Server { .. } => FetchErrorKind::Server,
            Self::Unauthorized(_) => FetchErrorKind::Unauthorized,
        }
    }

    /// HTTP-like status if this is a server error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Expected, recoverable conditions handled silently through fallback
    /// data: connectivity loss and missing/rejected credentials.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            FetchErrorKind::NetworkUnreachable | FetchErrorKind::Unauthorized
        )
    }

    /// Client/application bugs: logged and surfaced generically
    pub fn is_client_bug(&self) -> bool {
        matches!(
            self.kind(),
            FetchErrorKind::InvalidRequest | FetchErrorKind::Decode
        )
    }

    /// Message suitable for display to an end user
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidRequest(_) => "Invalid URL configuration".to_string(),
            Self::NetworkUnreachable(_) => "Network error - check your connection".to_string(),
            Self::Decode(_) => "Error processing server response".to_string(),
            Self::Server { status, .. } => format!("Server error (code: {status})"),
            Self::Unauthorized(_) => "Unauthorized - API token may have expired".to_string(),
        }
    }
}
