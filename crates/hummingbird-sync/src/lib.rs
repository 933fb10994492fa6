//! Hummingbird Sync - offline-capable paginated listing engine
//!
//! Provides:
//! - Last-request-wins orchestration of load, paging, search and sort
//! - Cache-first re-queries once the full dataset is resident
//! - Fallback to cached or seeded data when the network is unavailable
//! - Connectivity monitoring as an observable value
//!
//! ## Modules
//!
//! - [`controller`] - The [`SyncController`] and its published state
//! - [`debounce`] - Search input debouncing
//! - [`reachability`] - Network status monitor fed by a platform observer

pub mod controller;
pub mod debounce;
pub mod reachability;

pub use controller::{ControllerSettings, SyncController, SyncOutcome, NO_RESULTS_NOTICE};
pub use debounce::SearchDebouncer;
pub use reachability::{probe_once, PathUpdate, ReachabilityMonitor};
