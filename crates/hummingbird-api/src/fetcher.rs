//! Page fetcher: the single place transport failures are classified
//!
//! [`PageFetcher`] adapts any [`RemoteDataSource`] to the core
//! `IPageSource` port. It performs exactly one request per call, reduces
//! every [`ApiError`] to a [`FetchError`] kind, and validates the returned
//! pagination metadata before the engine sees it.
//!
//! ## Classification
//!
//! | Source                                  | Kind                |
//! |-----------------------------------------|---------------------|
//! | URL construction, request builder       | invalid-request     |
//! | connect / timeout / send failure        | network-unreachable |
//! | 401, 403                                | unauthorized        |
//! | any other non-2xx                       | server-error(code)  |
//! | body decode, `successful=false`, bad page metadata | decode-error |

use hummingbird_core::domain::{FetchError, ListRecord, Page, PageRequest};
use hummingbird_core::ports::IPageSource;
use tracing::{debug, warn};

use crate::client::{PageEnvelope, RemoteDataSource};
use crate::ApiError;

/// Adapts a [`RemoteDataSource`] to the `IPageSource` port
#[derive(Debug, Clone)]
pub struct PageFetcher<D> {
    source: D,
}

impl<D> PageFetcher<D> {
    pub fn new(source: D) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &D {
        &self.source
    }
}

/// Reduces a transport error to the engine taxonomy
pub fn classify(err: ApiError) -> FetchError {
    match err {
        ApiError::Url(e) => FetchError::InvalidRequest(e.to_string()),
        ApiError::Timeout => FetchError::NetworkUnreachable("request timed out".to_string()),
        ApiError::Status { status, body } => FetchError::from_status(status, body),
        ApiError::Json(e) => FetchError::Decode(e.to_string()),
        ApiError::Rejected(msg) => FetchError::Decode(msg),
        ApiError::Http(e) => {
            if e.is_builder() {
                FetchError::InvalidRequest(e.to_string())
            } else if e.is_decode() || e.is_body() {
                FetchError::Decode(e.to_string())
            } else if let Some(status) = e.status() {
                FetchError::from_status(status.as_u16(), e.to_string())
            } else {
                // connect, timeout, redirect loops, dropped connections
                FetchError::NetworkUnreachable(e.to_string())
            }
        }
    }
}

/// Validates envelope metadata into a [`Page`]
fn into_page<R>(envelope: PageEnvelope<R>) -> Result<Page<R>, FetchError> {
    Page::new(
        envelope.items,
        envelope.current_page,
        envelope.page_size,
        envelope.total_items,
        envelope.total_pages,
    )
    .map_err(|e| FetchError::Decode(e.to_string()))
}

#[async_trait::async_trait]
impl<R, D> IPageSource<R> for PageFetcher<D>
where
    R: ListRecord,
    D: RemoteDataSource<R>,
{
    async fn fetch_page(
        &self,
        request: &PageRequest,
        auth_token: &str,
    ) -> Result<Page<R>, FetchError> {
        if auth_token.is_empty() {
            return Err(FetchError::Unauthorized("no bearer token available".to_string()));
        }

        let source = self.source.name();
        debug!(source, page = request.page, filter = ?request.filter, "Fetching page");

        let envelope = self.source.fetch(request, auth_token).await.map_err(|e| {
            let classified = classify(e);
            warn!(source, page = request.page, kind = %classified.kind(), error = %classified, "Fetch failed");
            classified
        })?;

        let page = into_page(envelope).map_err(|e| {
            warn!(source, page = request.page, error = %e, "Invalid page metadata");
            e
        })?;

        if page.page_number() != request.page {
            debug!(
                source,
                requested = request.page,
                received = page.page_number(),
                "Server answered with a different page"
            );
        }
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use hummingbird_core::domain::FetchErrorKind;

    use super::*;

    #[test]
    fn test_classify_status_codes() {
        assert_eq!(
            classify(ApiError::status(401, "")).kind(),
            FetchErrorKind::Unauthorized
        );
        assert_eq!(
            classify(ApiError::status(403, "")).kind(),
            FetchErrorKind::Unauthorized
        );
        let err = classify(ApiError::status(500, "boom"));
        assert_eq!(err.kind(), FetchErrorKind::Server);
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(classify(ApiError::status(404, "")).status_code(), Some(404));
    }

    #[test]
    fn test_classify_non_http_errors() {
        assert_eq!(classify(ApiError::Timeout).kind(), FetchErrorKind::NetworkUnreachable);
        assert_eq!(
            classify(ApiError::Rejected("no".into())).kind(),
            FetchErrorKind::Decode
        );
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(classify(ApiError::Json(json_err)).kind(), FetchErrorKind::Decode);
        let url_err = url::Url::parse("::").unwrap_err();
        assert_eq!(
            classify(ApiError::Url(url_err)).kind(),
            FetchErrorKind::InvalidRequest
        );
    }

    #[test]
    fn test_into_page_rejects_inconsistent_metadata() {
        let env = PageEnvelope {
            page_size: 2,
            current_page: 1,
            total_items: 5,
            total_pages: 2,
            items: vec![1, 2],
        };
        assert!(matches!(into_page(env), Err(FetchError::Decode(_))));

        let env = PageEnvelope {
            page_size: 2,
            current_page: 1,
            total_items: 5,
            total_pages: 3,
            items: vec![1, 2],
        };
        assert_eq!(into_page(env).unwrap().total_pages(), 3);
    }
}
