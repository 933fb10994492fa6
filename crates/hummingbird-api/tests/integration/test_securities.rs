//! Integration tests for the security master adapter

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hummingbird_core::domain::{FetchErrorKind, PageRequest, SortField, SortSpec};
use hummingbird_core::ports::IPageSource;

use crate::common::{self, TOKEN};

fn search_response(items: Vec<serde_json::Value>, total: u64) -> serde_json::Value {
    json!({
        "successful": true,
        "value": common::filer_page(items, 1, 50, total)
    })
}

#[tokio::test]
async fn test_post_body_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/secmaster-api/api/v2/security-search"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "50"))
        .and(header("authorization", "Bearer test-access-token"))
        .and(body_json(json!({
            "listedOnly": false,
            "criteria": "apple",
            "isActive": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(
            vec![common::security_json("s1", "Apple", 3.0e12)],
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = common::security_fetcher(&server);
    let request = PageRequest::new(1, 50, SortSpec::default()).with_filter("apple");
    let page = fetcher.fetch_page(&request, TOKEN).await.expect("search");

    assert_eq!(page.items().len(), 1);
    assert_eq!(page.items()[0].ticker, "APPLE");
    assert_eq!(page.items()[0].formatted_market_cap(), "3T");
}

#[tokio::test]
async fn test_page_is_sorted_locally() {
    let server = MockServer::start().await;
    common::mount_security_search(
        &server,
        200,
        search_response(
            vec![
                common::security_json("s1", "small", 1.0e6),
                common::security_json("s2", "Large", 1.0e12),
                common::security_json("s3", "mid", 1.0e9),
            ],
            3,
        ),
    )
    .await;

    let fetcher = common::security_fetcher(&server);

    let page = fetcher
        .fetch_page(&PageRequest::new(1, 50, SortSpec::default()), TOKEN)
        .await
        .expect("search");
    let ids: Vec<&str> = page.items().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s2", "s3", "s1"]);

    let page = fetcher
        .fetch_page(&PageRequest::new(1, 50, SortSpec::ascending(SortField::Name)), TOKEN)
        .await
        .expect("search");
    let ids: Vec<&str> = page.items().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s2", "s3", "s1"]);
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_decode_error() {
    let server = MockServer::start().await;
    common::mount_security_search(
        &server,
        200,
        json!({ "successful": false, "value": common::filer_page(vec![], 1, 50, 0) }),
    )
    .await;

    let fetcher = common::security_fetcher(&server);
    let err = fetcher
        .fetch_page(&PageRequest::new(1, 50, SortSpec::default()), TOKEN)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::Decode);
}
