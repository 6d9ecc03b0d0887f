//! Shared primitives for the plank backend.
//!
//! Holds the database-facing type aliases and the pure domain logic that
//! must stay testable without a live database.

pub mod orphan;
pub mod types;
