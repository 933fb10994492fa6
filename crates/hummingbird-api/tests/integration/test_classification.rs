//! Error classification through the full HTTP path
//!
//! Every failure must come out of `PageFetcher` as exactly one of the five
//! fetch error kinds.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use hummingbird_api::{OwnershipClient, PageFetcher};
use hummingbird_core::domain::{FetchErrorKind, PageRequest, SortSpec};
use hummingbird_core::ports::IPageSource;

use crate::common::{self, TOKEN};

fn first_page() -> PageRequest {
    PageRequest::new(1, 20, SortSpec::default())
}

#[tokio::test]
async fn test_401_and_403_are_unauthorized() {
    for status in [401, 403] {
        let server = MockServer::start().await;
        common::mount_filers(&server, status, json!({ "message": "denied" })).await;

        let err = common::ownership_fetcher(&server)
            .fetch_page(&first_page(), TOKEN)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Unauthorized, "status {status}");
    }
}

#[tokio::test]
async fn test_other_statuses_are_server_errors_with_code() {
    for status in [400, 404, 429, 500, 503] {
        let server = MockServer::start().await;
        common::mount_filers(&server, status, json!({ "message": "nope" })).await;

        let err = common::ownership_fetcher(&server)
            .fetch_page(&first_page(), TOKEN)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Server);
        assert_eq!(err.status_code(), Some(status));
        assert_eq!(err.user_message(), format!("Server error (code: {status})"));
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = common::ownership_fetcher(&server)
        .fetch_page(&first_page(), TOKEN)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::Decode);
}

#[tokio::test]
async fn test_inconsistent_page_metadata_is_decode_error() {
    let server = MockServer::start().await;
    common::mount_filers(
        &server,
        200,
        json!({
            "pageSize": 20, "currentPage": 1, "totalItems": 45, "totalPages": 2,
            "items": []
        }),
    )
    .await;

    let err = common::ownership_fetcher(&server)
        .fetch_page(&first_page(), TOKEN)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::Decode);
}

#[tokio::test]
async fn test_timeout_is_network_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::filer_page(vec![], 1, 20, 0))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = OwnershipClient::new(
        format!("{}/ownership-api", server.uri()),
        Duration::from_millis(100),
    )
    .unwrap();
    let err = PageFetcher::new(client)
        .fetch_page(&first_page(), TOKEN)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::NetworkUnreachable);
}

#[tokio::test]
async fn test_connection_refused_is_network_unreachable() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = OwnershipClient::new(format!("{uri}/ownership-api"), Duration::from_secs(1)).unwrap();
    let err = PageFetcher::new(client)
        .fetch_page(&first_page(), TOKEN)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::NetworkUnreachable);
    assert_eq!(err.user_message(), "Network error - check your connection");
}

#[tokio::test]
async fn test_invalid_base_url_is_invalid_request() {
    let client = OwnershipClient::new("not a url", Duration::from_secs(1)).unwrap();
    let err = PageFetcher::new(client)
        .fetch_page(&first_page(), TOKEN)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::InvalidRequest);
}
