//! Ownership API adapter (institutional filers)
//!
//! `GET {base}/api/filers?page=N&pageSize=M&sorts=-aum[&query=q]`

use std::time::Duration;

use hummingbird_core::domain::{Filer, PageRequest};
use tracing::debug;

use crate::client::{ApiClient, PageEnvelope, RemoteDataSource};
use crate::ApiError;

const FILERS_PATH: &str = "api/filers";

/// Filer search client
#[derive(Debug, Clone)]
pub struct OwnershipClient {
    api: ApiClient,
}

impl OwnershipClient {
    /// Creates a client for the ownership API rooted at `base_url`
    /// (e.g. `https://host/ownership-api`)
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            api: ApiClient::new(base_url, timeout)?,
        })
    }

    pub fn from_client(api: ApiClient) -> Self {
        Self { api }
    }

    /// Query parameters for `request`
    fn query(request: &PageRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", request.page.to_string()),
            ("pageSize", request.page_size.to_string()),
            ("sorts", request.sort.wire_value::<Filer>()),
        ];
        if let Some(filter) = &request.filter {
            query.push(("query", filter.clone()));
        }
        query
    }

    /// Searches filers; one request, no retry
    pub async fn search_filers(
        &self,
        request: &PageRequest,
        token: &str,
    ) -> Result<PageEnvelope<Filer>, ApiError> {
        let envelope: PageEnvelope<Filer> = self
            .api
            .get_json(FILERS_PATH, &Self::query(request), token)
            .await?;
        debug!(
            page = envelope.current_page,
            items = envelope.items.len(),
            total = envelope.total_items,
            "Filer page received"
        );
        Ok(envelope)
    }
}

#[async_trait::async_trait]
impl RemoteDataSource<Filer> for OwnershipClient {
    fn name(&self) -> &'static str {
        "ownership"
    }

    async fn fetch(
        &self,
        request: &PageRequest,
        token: &str,
    ) -> Result<PageEnvelope<Filer>, ApiError> {
        self.search_filers(request, token).await
    }
}

#[cfg(test)]
mod tests {
    use hummingbird_core::domain::{SortField, SortSpec};

    use super::*;

    #[test]
    fn test_query_default_sort_without_filter() {
        let request = PageRequest::new(1, 20, SortSpec::default());
        let query = OwnershipClient::query(&request);
        assert_eq!(
            query,
            vec![
                ("page", "1".to_string()),
                ("pageSize", "20".to_string()),
                ("sorts", "-aum".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_includes_filter_and_ascending_sort() {
        let request =
            PageRequest::new(3, 10, SortSpec::ascending(SortField::Name)).with_filter(" berk ");
        let query = OwnershipClient::query(&request);
        assert!(query.contains(&("sorts", "name".to_string())));
        assert!(query.contains(&("query", "berk".to_string())));
        assert!(query.contains(&("page", "3".to_string())));
    }
}
