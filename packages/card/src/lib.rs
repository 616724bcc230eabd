#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Resolves a GPS fix into a "what is here?" street card.
//!
//! A card is composed from four read-only lookups against a
//! [`SpatialStore`]:
//!
//! 1. **Street snap**: the nearest street segment within a radius derived
//!    from the fix accuracy ([`radius`]).
//! 2. **Neighborhood**: the polygon containing the fix.
//! 3. **Nearby POIs**: a fixed-radius search ranked by relevance-weighted
//!    distance ([`nearby`]).
//! 4. **Street fact**: only for streets the [`classify`] module considers
//!    properly named.
//!
//! The [`compose::CardComposer`] runs the first three concurrently, gates
//! the fact lookup on the classification, and applies the narrative
//! fallback chain.

pub mod classify;
pub mod compose;
pub mod config;
pub mod nearby;
pub mod radius;
pub mod store;

pub use compose::CardComposer;
pub use config::{CardConfig, ConfigError};
pub use store::SpatialStore;

/// Errors reported by a [`SpatialStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The query could not be executed (connection lost, statement
    /// timeout, store unreachable).
    #[error("Query failed: {message}")]
    Query {
        /// Description of what went wrong.
        message: String,
    },

    /// A returned row could not be converted into a domain type.
    #[error("Row conversion failed: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Errors that can occur while composing a card.
///
/// Empty lookups are never errors; they degrade the card instead.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// The fix was rejected before any query was issued.
    #[error("Invalid {field}: {message}")]
    InvalidInput {
        /// Name of the offending input field.
        field: &'static str,
        /// Description of why the value was rejected.
        message: String,
    },

    /// The spatial store could not be searched.
    #[error("Spatial store unavailable: {0}")]
    CollaboratorUnavailable(#[from] StoreError),

    /// The caller's deadline elapsed before the card was composed.
    #[error("Card composition timed out after {elapsed_ms} ms")]
    Timeout {
        /// The deadline that elapsed, in milliseconds.
        elapsed_ms: u64,
    },

    /// The caller cancelled the request.
    #[error("Card composition cancelled")]
    Cancelled,
}
