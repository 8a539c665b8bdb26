//! Client-side state container for activities.
//!
//! # Responsibility
//! - Cache API records and UI interaction flags in one place.
//! - Expose derived, date-grouped projections of the cache.
//!
//! # Invariants
//! - Consumers observe state only through snapshots and subscriptions.

pub mod activity_store;
pub mod grouping;
