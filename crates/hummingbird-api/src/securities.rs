//! Security master adapter
//!
//! `POST {base}/security-search?page=N&pageSize=M` with a JSON criteria
//! body. The endpoint has no server-side ordering, so each returned page is
//! sorted here with the shared comparator.

use std::time::Duration;

use hummingbird_core::domain::{sort_records, PageRequest, Security};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{ApiClient, PageEnvelope, RemoteDataSource};
use crate::ApiError;

const SEARCH_PATH: &str = "security-search";

/// Request body of the security search endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySearchRequest {
    pub listed_only: bool,
    pub criteria: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Response wrapper of the security search endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySearchResponse {
    pub successful: bool,
    pub value: PageEnvelope<Security>,
}

/// Static search flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecuritySearchOptions {
    /// Only securities with an active listing
    pub listed_only: bool,
    /// Only primary listings
    pub primary_only: bool,
}

/// Security search client
#[derive(Debug, Clone)]
pub struct SecurityClient {
    api: ApiClient,
    options: SecuritySearchOptions,
}

impl SecurityClient {
    /// Creates a client for the security master API rooted at `base_url`
    /// (e.g. `https://host/secmaster-api/api/v2`)
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self::from_client(ApiClient::new(base_url, timeout)?))
    }

    pub fn from_client(api: ApiClient) -> Self {
        Self {
            api,
            options: SecuritySearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SecuritySearchOptions) -> Self {
        self.options = options;
        self
    }

    fn body(&self, request: &PageRequest) -> SecuritySearchRequest {
        SecuritySearchRequest {
            listed_only: self.options.listed_only,
            criteria: request.filter.clone().unwrap_or_default(),
            is_primary: self.options.primary_only.then_some(true),
            is_active: Some(true),
        }
    }

    /// Searches securities; one request, no retry
    pub async fn search_securities(
        &self,
        request: &PageRequest,
        token: &str,
    ) -> Result<PageEnvelope<Security>, ApiError> {
        let query = [
            ("page", request.page.to_string()),
            ("pageSize", request.page_size.to_string()),
        ];
        let response: SecuritySearchResponse = self
            .api
            .post_json(SEARCH_PATH, &query, &self.body(request), token)
            .await?;

        if !response.successful {
            return Err(ApiError::Rejected(
                "security search reported successful=false".to_string(),
            ));
        }

        let mut envelope = response.value;
        sort_records(&mut envelope.items, request.sort);
        debug!(
            page = envelope.current_page,
            items = envelope.items.len(),
            total = envelope.total_items,
            "Security page received"
        );
        Ok(envelope)
    }
}

#[async_trait::async_trait]
impl RemoteDataSource<Security> for SecurityClient {
    fn name(&self) -> &'static str {
        "securities"
    }

    async fn fetch(
        &self,
        request: &PageRequest,
        token: &str,
    ) -> Result<PageEnvelope<Security>, ApiError> {
        self.search_securities(request, token).await
    }
}
