//! Use-case layer driven by UI events.
//!
//! # Responsibility
//! - Turn user actions into store calls and keep UI state in step.
//! - Keep hosts (FFI, CLI) decoupled from storage details.

pub mod form_controller;
