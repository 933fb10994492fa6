//! Domain entities and business logic
//!
//! This module contains the core domain types for Hummingbird listings:
//! - The [`ListRecord`] abstraction and the concrete `Filer` / `Security` records
//! - Pagination values (`Page`, `PageRequest`)
//! - Sort specification and the shared comparator
//! - The classified fetch error taxonomy
//! - Observable listing state (`SyncPhase`, `ListingSnapshot`)
//! - The seeded offline dataset and display formatting

pub mod errors;
pub mod fetch_error;
pub mod filer;
pub mod format;
pub mod page;
pub mod record;
pub mod security;
pub mod seed;
pub mod sort;
pub mod state;

// Re-export commonly used types
pub use errors::DomainError;
pub use fetch_error::{FetchError, FetchErrorKind};
pub use filer::Filer;
pub use page::{Page, PageRequest, DEFAULT_PAGE_SIZE};
pub use record::ListRecord;
pub use security::{Classification, LatestMarketCap, LatestPrice, Security};
pub use seed::seed_filers;
pub use sort::{filter_and_sort, matches_query, sort_records, SortDirection, SortField, SortSpec};
pub use state::{
    AuthStatus, FailureReason, ListingSnapshot, NetworkStatus, Provenance, SyncPhase,
};
