//! Integration tests for hummingbird-api
//!
//! Uses wiremock to simulate the ownership and security master APIs and
//! verifies request shape, response decoding and the error classification
//! performed by `PageFetcher`.

mod common;

mod test_classification;
mod test_ownership;
mod test_securities;
