//! Domain model for activity records.
//!
//! # Responsibility
//! - Define the record shape shared by the API layer and the store.
//!
//! # Invariants
//! - Every activity is identified by a stable, non-blank `ActivityId`.

pub mod activity;
