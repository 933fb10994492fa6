//! Hummingbird API - HTTP adapters for the remote listing APIs
//!
//! Provides async clients for:
//! - The ownership API (institutional filers, `GET .../api/filers`)
//! - The security master API (`POST .../security-search`)
//! - A [`PageFetcher`] that turns either client into the engine's
//!   `IPageSource` port, classifying every failure
//!
//! ## Modules
//!
//! - [`client`] - Shared HTTP plumbing (base URL, bearer auth, timeouts)
//! - [`ownership`] - Filer search adapter
//! - [`securities`] - Security search adapter
//! - [`fetcher`] - Error classification and page validation

pub mod client;
pub mod fetcher;
pub mod ownership;
pub mod securities;

pub use client::{ApiClient, PageEnvelope, RemoteDataSource};
pub use fetcher::PageFetcher;
pub use ownership::OwnershipClient;
pub use securities::{SecurityClient, SecuritySearchOptions};

use thiserror::Error;

/// Errors that can occur when talking to a remote listing API
///
/// These stay transport-shaped; [`PageFetcher`] is the only place they are
/// reduced to the engine's `FetchError` taxonomy.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request URL could not be built from the configured base URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A transport-level error reported by the HTTP client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("API error ({status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The response body did not match the expected JSON shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The envelope decoded but reported `successful: false`
    #[error("Request rejected by server: {0}")]
    Rejected(String),
}

impl ApiError {
    /// Create a status error from code and body
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// HTTP status if the server answered with a non-2xx code
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
