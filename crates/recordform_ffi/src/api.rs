//! FFI use-case API for the Flutter form screen.
//!
//! # Responsibility
//! - Expose form actions (field change, submit, edit, delete) to Dart via FRB.
//! - Hold one controller, and so one store handle, per process.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every action answers with the full view so Dart never re-derives state.

use log::warn;
use recordform_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    FormController, FormView, RecordId, SqliteRecordStore,
};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const DEFAULT_DB_FILE_NAME: &str = "recordform.sqlite3";
const DB_PATH_ENV: &str = "RECORDFORM_DB_PATH";

static DEFAULT_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static FORM: OnceLock<Mutex<Option<FormController<SqliteRecordStore>>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One form input as Dart renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInputItem {
    /// Wire name passed back to `form_set_field`.
    pub field: String,
    pub label: String,
    /// `text|email|number`.
    pub kind: String,
    pub required: bool,
    pub min: Option<u32>,
    pub value: String,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRowItem {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: u32,
}

/// Render state of the form screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormScreenState {
    pub inputs: Vec<FormInputItem>,
    /// `Submit` or `Update`.
    pub submit_label: String,
    pub editing_id: Option<i64>,
    pub headers: Vec<String>,
    /// Per-row buttons: `Edit`, `Delete`.
    pub row_actions: Vec<String>,
    pub rows: Vec<FormRowItem>,
    /// Error slot; `None` when the last action succeeded.
    pub error: Option<String>,
}

/// Response envelope for every form call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormViewResponse {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// Present whenever a form is open.
    pub state: Option<FormScreenState>,
}

/// Opens the record store and loads the table.
///
/// `db_path` empty means `RECORDFORM_DB_PATH`, falling back to the temp dir.
/// Re-opening replaces the current controller and its store handle.
#[flutter_rust_bridge::frb(sync)]
pub fn form_open(db_path: String) -> FormViewResponse {
    let path = resolve_db_path(db_path.as_str());
    let store = match SqliteRecordStore::open(&path) {
        Ok(store) => store,
        Err(err) => return FormViewResponse::failure(format!("form_open failed: {err}"), None),
    };

    let mut controller = FormController::new(store);
    let mounted = controller.mount();
    let state = to_screen_state(controller.view());

    let mut slot = match lock_form() {
        Ok(slot) => slot,
        Err(message) => return FormViewResponse::failure(message, None),
    };
    *slot = Some(controller);

    match mounted {
        Ok(()) => FormViewResponse::success("Form opened.", state),
        Err(err) => FormViewResponse::failure(format!("form_open failed: {err}"), Some(state)),
    }
}

/// Current render state without side effects.
#[flutter_rust_bridge::frb(sync)]
pub fn form_view() -> FormViewResponse {
    with_form("form_view", |_| Ok(()), |()| String::new())
}

/// Updates one pending field by wire name (`name|email|age`).
#[flutter_rust_bridge::frb(sync)]
pub fn form_set_field(field: String, value: String) -> FormViewResponse {
    with_form(
        "form_set_field",
        |form| form.set_field_by_name(field.as_str(), value),
        |()| String::new(),
    )
}

/// Submits pending input as insert (creating) or replace (editing).
#[flutter_rust_bridge::frb(sync)]
pub fn form_submit() -> FormViewResponse {
    with_form(
        "form_submit",
        |form| {
            let was_editing = form.is_editing();
            form.submit().map(|id| (was_editing, id))
        },
        |(was_editing, id)| {
            if was_editing {
                format!("Record {id} updated.")
            } else {
                format!("Record {id} created.")
            }
        },
    )
}

/// Enters editing mode for a displayed row.
#[flutter_rust_bridge::frb(sync)]
pub fn form_edit(id: i64) -> FormViewResponse {
    with_form(
        "form_edit",
        |form| form.begin_edit(RecordId(id)),
        |()| format!("Editing record {id}."),
    )
}

/// Deletes a row by id; absent ids are not an error.
#[flutter_rust_bridge::frb(sync)]
pub fn form_delete(id: i64) -> FormViewResponse {
    with_form(
        "form_delete",
        |form| form.delete(RecordId(id)),
        |()| format!("Record {id} deleted."),
    )
}

/// Clears the error slot.
#[flutter_rust_bridge::frb(sync)]
pub fn form_dismiss_error() -> FormViewResponse {
    with_form(
        "form_dismiss_error",
        |form| {
            form.clear_error();
            Ok(())
        },
        |()| String::new(),
    )
}

impl FormViewResponse {
    fn success(message: impl Into<String>, state: FormScreenState) -> Self {
        Self {
            ok: true,
            message: message.into(),
            state: Some(state),
        }
    }

    fn failure(message: impl Into<String>, state: Option<FormScreenState>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            state,
        }
    }
}

type FormSlot = Option<FormController<SqliteRecordStore>>;

fn lock_form() -> Result<std::sync::MutexGuard<'static, FormSlot>, String> {
    FORM.get_or_init(|| Mutex::new(None))
        .lock()
        .map_err(|_| "form state lock poisoned".to_string())
}

fn with_form<T>(
    action: &str,
    run: impl FnOnce(&mut FormController<SqliteRecordStore>) -> recordform_core::FormResult<T>,
    describe: impl FnOnce(T) -> String,
) -> FormViewResponse {
    let mut slot = match lock_form() {
        Ok(slot) => slot,
        Err(message) => return FormViewResponse::failure(message, None),
    };
    let Some(form) = slot.as_mut() else {
        return FormViewResponse::failure(format!("{action} failed: form is not open"), None);
    };

    let result = run(form);
    let state = to_screen_state(form.view());
    match result {
        Ok(value) => FormViewResponse::success(describe(value), state),
        Err(err) => {
            warn!("{}", failure_event(action, &err));
            FormViewResponse::failure(format!("{action} failed: {err}"), Some(state))
        }
    }
}

fn failure_event(action: &str, err: &impl Display) -> String {
    format!("event=ffi_call module=ffi status=error action={action} error={err}")
}

fn resolve_db_path(requested: &str) -> PathBuf {
    let trimmed = requested.trim();
    if !trimmed.is_empty() {
        return PathBuf::from(trimmed);
    }
    DEFAULT_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
        })
        .clone()
}

fn to_screen_state(view: FormView) -> FormScreenState {
    FormScreenState {
        inputs: view
            .inputs
            .into_iter()
            .map(|input| FormInputItem {
                field: input.spec.field.as_str().to_string(),
                label: input.spec.label.to_string(),
                kind: input_kind_label(input.spec.kind).to_string(),
                required: input.spec.required,
                min: input.spec.min,
                value: input.value,
            })
            .collect(),
        submit_label: view.submit_label.to_string(),
        editing_id: view.editing_id.map(RecordId::get),
        headers: view.headers.iter().map(|header| header.to_string()).collect(),
        row_actions: view
            .row_actions
            .iter()
            .map(|action| action.to_string())
            .collect(),
        rows: view
            .rows
            .into_iter()
            .map(|row| FormRowItem {
                id: row.id.get(),
                name: row.name,
                email: row.email,
                age: row.age,
            })
            .collect(),
        error: view.error,
    }
}

fn input_kind_label(kind: recordform_core::InputKind) -> &'static str {
    match kind {
        recordform_core::InputKind::Text => "text",
        recordform_core::InputKind::Email => "email",
        recordform_core::InputKind::Number => "number",
    }
}
