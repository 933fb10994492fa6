//! Page source port (driven/secondary port)
//!
//! This module defines the single operation the sync engine needs from a
//! remote data source: fetch one page of records. Implementations live in
//! adapter crates (`hummingbird-api`) or in tests.
//!
//! ## Design Notes
//!
//! - Returns the classified [`FetchError`] rather than `anyhow::Error`: the
//!   engine's recovery policy is keyed on the error kind.
//! - Uses `#[async_trait]` for async trait methods.
//! - An implementation performs exactly one request per call and never
//!   retries.

use crate::domain::fetch_error::FetchError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::record::ListRecord;

/// Fetches one page of `R`
#[async_trait::async_trait]
pub trait IPageSource<R: ListRecord>: Send + Sync {
    /// Fetches the page described by `request`, authenticated with
    /// `auth_token`
    ///
    /// When `request.filter` is set, the result covers only records whose
    /// name matches it, and pagination metadata describes that filtered set.
    async fn fetch_page(&self, request: &PageRequest, auth_token: &str)
        -> Result<Page<R>, FetchError>;
}

#[async_trait::async_trait]
impl<R, T> IPageSource<R> for std::sync::Arc<T>
where
    R: ListRecord,
    T: IPageSource<R> + ?Sized,
{
    async fn fetch_page(
        &self,
        request: &PageRequest,
        auth_token: &str,
    ) -> Result<Page<R>, FetchError> {
        (**self).fetch_page(request, auth_token).await
    }
}
