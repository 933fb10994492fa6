//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IPageSource`] - Fetches one page of records from a remote source
//! - [`ITokenProvider`] - Supplies the bearer token for authenticated requests

pub mod page_source;
pub mod session;

pub use page_source::IPageSource;
pub use session::{ITokenProvider, StaticTokenProvider};
