//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including page invariant violations, invalid state transitions, and
//! validation failures.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A page violates its pagination invariants
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    /// Invalid state transition attempt
    #[error("Invalid state transition from {from} to {to}")]
    InvalidState {
        /// The current state
        from: String,
        /// The attempted target state
        to: String,
    },

    /// Unknown sort field name
    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
