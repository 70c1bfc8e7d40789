//! Flutter-facing bridge crate for the record form.

pub mod api;
