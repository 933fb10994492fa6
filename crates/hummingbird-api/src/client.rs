//! Shared HTTP client for the listing APIs
//!
//! Wraps `reqwest::Client` with base URL construction, bearer
//! authentication, a per-request timeout and JSON response parsing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use hummingbird_api::client::ApiClient;
//!
//! # fn example() -> Result<(), hummingbird_api::ApiError> {
//! let client = ApiClient::new("https://example.com/ownership-api", Duration::from_secs(15))?;
//! let url = client.endpoint("api/filers", &[("page", "1".to_string())])?;
//! assert_eq!(url.as_str(), "https://example.com/ownership-api/api/filers?page=1");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use hummingbird_core::domain::{ListRecord, PageRequest};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::ApiError;

/// Longest response body excerpt kept in errors and logs
const MAX_BODY_EXCERPT: usize = 512;

// ============================================================================
// Wire types
// ============================================================================

/// Pagination envelope shared by both listing APIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub page_size: u32,
    pub current_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub items: Vec<T>,
}

// ============================================================================
// RemoteDataSource
// ============================================================================

/// A remote API that can serve one page of `R` per call
///
/// Implementations perform exactly one HTTP request and never retry.
#[async_trait::async_trait]
pub trait RemoteDataSource<R: ListRecord>: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Fetches the page described by `request`
    async fn fetch(&self, request: &PageRequest, token: &str)
        -> Result<PageEnvelope<R>, ApiError>;
}

// ============================================================================
// ApiClient
// ============================================================================

/// HTTP client bound to one API base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL without trailing slash, e.g. `https://host/ownership-api`
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `base_url` with the given request timeout
    ///
    /// The base URL is only parsed when a request is built, so a bad value
    /// surfaces as an invalid-request failure of the first fetch.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `{base_url}/{path}?{query}`
    pub fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.base_url,
            path.trim_start_matches('/')
        ))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// `GET` with bearer auth, parsing a JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: &str,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query)?;
        debug!(%url, token_len = token.len(), "GET");
        let request = self.client.get(url).bearer_auth(token);
        Self::parse_response(Self::send(request).await?).await
    }

    /// `POST` a JSON body with bearer auth, parsing a JSON body
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        token: &str,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path, query)?;
        debug!(%url, token_len = token.len(), "POST");
        let request = self.client.post(url).bearer_auth(token).json(body);
        Self::parse_response(Self::send(request).await?).await
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Http(e)
            }
        })
    }

    /// Maps non-2xx to [`ApiError::Status`] and decodes 2xx bodies
    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Http(e)
            }
        })?;

        if !status.is_success() {
            let excerpt = excerpt(&body);
            warn!(status = status.as_u16(), body = %excerpt, "Request failed");
            return Err(ApiError::status(status.as_u16(), excerpt));
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %excerpt(&body), "Failed to deserialize response");
            ApiError::Json(e)
        })
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
