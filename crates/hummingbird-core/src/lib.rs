//! Hummingbird Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Filer`, `Security`, `Page`, `SortSpec`, `ListingSnapshot`
//! - **Error taxonomy** - `FetchError` and its five kinds
//! - **Port definitions** - Traits for adapters: `IPageSource`, `ITokenProvider`
//! - **State machine** - The listing `SyncPhase` transitions
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.

pub mod config;
pub mod domain;
pub mod ports;
