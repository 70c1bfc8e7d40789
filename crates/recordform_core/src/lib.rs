//! Core logic for the record form.
//! Storage, controller state and render snapshots live here; hosts only
//! forward user events and draw [`FormView`].

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::record::{parse_age, Record, RecordDraft, RecordId, RecordValidationError};
pub use repo::record_repo::{
    RecordStore, SqliteRecordStore, StoreError, StoreErrorKind, StoreResult,
};
pub use service::form_controller::{
    FormController, FormError, FormField, FormMode, FormResult, PendingInput,
};
pub use view::{FormView, InputKind, InputSpec, InputView, RowView};

/// Minimal health-check API for host wiring.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
