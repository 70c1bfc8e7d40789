//! Render snapshot for hosts that draw the form and the table.
//!
//! # Invariants
//! - Submit label is `"Update"` while editing, `"Submit"` otherwise.
//! - Table headers name the data fields they show.

use crate::model::record::{Record, RecordId};
use crate::service::form_controller::{FormField, FormMode, PendingInput};
use serde::Serialize;

pub const SUBMIT_LABEL: &str = "Submit";
pub const UPDATE_LABEL: &str = "Update";
pub const EDIT_ACTION_LABEL: &str = "Edit";
pub const DELETE_ACTION_LABEL: &str = "Delete";
pub const TABLE_HEADERS: [&str; 5] = ["Id", "Name", "Email", "Age", "Action"];

/// Native input kind a host should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Email,
    Number,
}

/// Declared shape of one form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputSpec {
    pub field: FormField,
    pub label: &'static str,
    pub kind: InputKind,
    pub required: bool,
    pub min: Option<u32>,
}

pub const FORM_INPUTS: [InputSpec; 3] = [
    InputSpec {
        field: FormField::Name,
        label: "Name",
        kind: InputKind::Text,
        required: true,
        min: None,
    },
    InputSpec {
        field: FormField::Email,
        label: "Email",
        kind: InputKind::Email,
        required: true,
        min: None,
    },
    InputSpec {
        field: FormField::Age,
        label: "Age",
        kind: InputKind::Number,
        required: true,
        min: Some(1),
    },
];

pub fn submit_label(mode: FormMode) -> &'static str {
    match mode {
        FormMode::Creating => SUBMIT_LABEL,
        FormMode::Editing(_) => UPDATE_LABEL,
    }
}

/// One input with its current pending value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputView {
    pub spec: InputSpec,
    pub value: String,
}

/// One table row. Both row actions take `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub age: u32,
}

impl From<&Record> for RowView {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
            age: record.age,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub inputs: Vec<InputView>,
    pub submit_label: &'static str,
    pub editing_id: Option<RecordId>,
    pub headers: [&'static str; 5],
    pub row_actions: [&'static str; 2],
    pub rows: Vec<RowView>,
    pub error: Option<String>,
}

impl FormView {
    pub fn build(
        mode: FormMode,
        pending: &PendingInput,
        records: &[Record],
        error: Option<&str>,
    ) -> Self {
        Self {
            inputs: FORM_INPUTS
                .iter()
                .map(|spec| InputView {
                    spec: *spec,
                    value: pending.get(spec.field).to_string(),
                })
                .collect(),
            submit_label: submit_label(mode),
            editing_id: mode.editing_id(),
            headers: TABLE_HEADERS,
            row_actions: [EDIT_ACTION_LABEL, DELETE_ACTION_LABEL],
            rows: records.iter().map(RowView::from).collect(),
            error: error.map(str::to_string),
        }
    }

    /// Pending value of one input.
    pub fn value(&self, field: FormField) -> Option<&str> {
        self.inputs
            .iter()
            .find(|input| input.spec.field == field)
            .map(|input| input.value.as_str())
    }
}
