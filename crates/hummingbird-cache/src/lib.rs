//! Hummingbird Cache - Session-scoped record store
//!
//! In-memory cache of records fetched during the current session, used to:
//! - Re-query (filter + sort) without a network round-trip once the whole
//!   dataset is resident
//! - Serve fallback data when the remote source is unreachable
//!
//! ## Architecture
//!
//! The cache is a plain synchronous value with no I/O and no timers. It is
//! owned by exactly one `SyncController` and lives as long as it does; it is
//! only cleared by an explicit reset.
//!
//! ## Key Components
//!
//! - [`RecordCache`] - Id-keyed record store with page-aware mutation
//! - [`CacheError`] - Error types for cache operations
//!
//! ## Usage
//!
//! ```
//! use hummingbird_cache::RecordCache;
//! use hummingbird_core::domain::{seed_filers, Page, SortSpec};
//!
//! let mut cache = RecordCache::new();
//! cache.replace_page(Page::single(seed_filers()));
//! assert!(cache.is_complete());
//! let hits = cache.query("partners", SortSpec::default());
//! assert_eq!(hits.len(), 1);
//! ```

pub mod store;

pub use store::RecordCache;

/// Errors that can occur during cache operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// A page was appended that does not directly follow the last one
    #[error("Out-of-order page: expected page {expected}, got page {got}")]
    OutOfOrderPage {
        /// The page number that would have been accepted
        expected: u32,
        /// The page number that was offered
        got: u32,
    },
}
