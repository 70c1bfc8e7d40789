//! Domain model for the record form.
//!
//! # Invariants
//! - Every stored record is identified by a store-assigned `RecordId`.
//! - Deletion is a hard delete; ids are still never reused.

pub mod record;
