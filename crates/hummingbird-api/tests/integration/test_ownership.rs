//! Integration tests for the ownership (filer) adapter

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hummingbird_core::domain::{PageRequest, SortField, SortSpec};
use hummingbird_core::ports::IPageSource;

use crate::common::{self, TOKEN};

#[tokio::test]
async fn test_first_page_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ownership-api/api/filers"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "2"))
        .and(query_param("sorts", "-aum"))
        .and(header("authorization", "Bearer test-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::filer_page(
            vec![
                common::filer_json("a", "Alpha", 300.0),
                common::filer_json("b", "Beta", 200.0),
            ],
            1,
            2,
            3,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = common::ownership_fetcher(&server);
    let page = fetcher
        .fetch_page(&PageRequest::new(1, 2, SortSpec::default()), TOKEN)
        .await
        .expect("fetch page 1");

    assert_eq!(page.items().len(), 2);
    assert_eq!(page.items()[0].name, "Alpha");
    assert_eq!(page.total_items(), 3);
    assert_eq!(page.total_pages(), 2);
    assert!(page.has_next());
}

#[tokio::test]
async fn test_filter_and_sort_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ownership-api/api/filers"))
        .and(query_param("page", "2"))
        .and(query_param("sorts", "name"))
        .and(query_param("query", "berkshire"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::filer_page(
            vec![common::filer_json("c", "Berkshire Bank", 1.0)],
            2,
            1,
            2,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = common::ownership_fetcher(&server);
    let request = PageRequest::new(2, 1, SortSpec::ascending(SortField::Name)).with_filter("berkshire");
    let page = fetcher.fetch_page(&request, TOKEN).await.expect("fetch");

    assert_eq!(page.page_number(), 2);
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_empty_result_set() {
    let server = MockServer::start().await;
    common::mount_filers(&server, 200, common::filer_page(vec![], 1, 20, 0)).await;

    let fetcher = common::ownership_fetcher(&server);
    let page = fetcher
        .fetch_page(&PageRequest::new(1, 20, SortSpec::default()), TOKEN)
        .await
        .expect("fetch");

    assert!(page.items().is_empty());
    assert_eq!(page.total_pages(), 0);
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_empty_token_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = common::ownership_fetcher(&server);
    let err = fetcher
        .fetch_page(&PageRequest::new(1, 20, SortSpec::default()), "")
        .await
        .unwrap_err();
    assert!(err.is_recoverable());
}
