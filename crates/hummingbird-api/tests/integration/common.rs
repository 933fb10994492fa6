//! Shared test helpers for API integration tests
//!
//! Provides wiremock-based mock server setup for the ownership and security
//! endpoints. Each helper returns a client pointing at the mock server.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hummingbird_api::{OwnershipClient, PageFetcher, SecurityClient};

pub const TOKEN: &str = "test-access-token";

/// Ownership client + fetcher pointing at `server`
pub fn ownership_fetcher(server: &MockServer) -> PageFetcher<OwnershipClient> {
    let client = OwnershipClient::new(
        format!("{}/ownership-api", server.uri()),
        Duration::from_secs(2),
    )
    .expect("build client");
    PageFetcher::new(client)
}

/// Security client + fetcher pointing at `server`
pub fn security_fetcher(server: &MockServer) -> PageFetcher<SecurityClient> {
    let client = SecurityClient::new(
        format!("{}/secmaster-api/api/v2", server.uri()),
        Duration::from_secs(2),
    )
    .expect("build client");
    PageFetcher::new(client)
}

pub fn filer_json(id: &str, name: &str, aum: f64) -> Value {
    json!({
        "id": id,
        "parentId": null,
        "name": name,
        "type": null,
        "city": "boston",
        "country": "MA",
        "dateOfLatestReport": "2025-02-14",
        "isActive": true,
        "aum": aum,
        "createdAt": "2025-03-27T06:00:22.780579Z",
        "updatedAt": "2025-03-27T06:00:22.780579Z"
    })
}

pub fn filer_page(items: Vec<Value>, page: u32, page_size: u32, total: u64) -> Value {
    let total_pages = total.div_ceil(u64::from(page_size));
    json!({
        "pageSize": page_size,
        "currentPage": page,
        "totalItems": total,
        "totalPages": total_pages,
        "items": items
    })
}

pub fn security_json(id: &str, short_name: &str, market_cap: f64) -> Value {
    json!({
        "id": id,
        "shortName": short_name,
        "longName": format!("{short_name} Inc."),
        "ticker": short_name.to_uppercase(),
        "assetClass": "Equity",
        "currency": "USD",
        "classifications": [],
        "latestPrice": { "tradeDate": "2025-03-26", "closeFullAdj": 10.0, "totalReturn": 0.01 },
        "latestMktCap": { "localCurrencyConsolidatedMarketValue": market_cap },
        "isActive": true
    })
}

/// Mounts `GET /ownership-api/api/filers` answering with `body`
pub async fn mount_filers(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path("/ownership-api/api/filers"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts `POST /secmaster-api/api/v2/security-search` answering with `body`
pub async fn mount_security_search(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path("/secmaster-api/api/v2/security-search"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}
