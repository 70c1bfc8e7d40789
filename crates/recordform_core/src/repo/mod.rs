//! Storage gateway contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define the insert/replace/list/delete contract over one collection.
//! - Keep SQL details away from the form controller.
//!
//! # Invariants
//! - Write paths validate records before touching SQL.
//! - Failures are classified as unavailable/write/read, never swallowed.

pub mod record_repo;
