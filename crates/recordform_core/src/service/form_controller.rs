//! Form controller: pending input, edit target and the displayed list.
//!
//! # Responsibility
//! - Route field changes, submit, edit and delete actions to the store.
//! - Re-fetch the full record list after every mutation.
//! - Keep the last failure visible in an error slot.
//!
//! # Invariants
//! - Mode is `Creating` or `Editing(id)`; `Editing` is left by a successful
//!   submit or by deleting the record being edited.
//! - A failed action leaves pending input, mode and list untouched.
//! - The store handle is owned for the controller's lifetime.

use crate::model::record::{parse_age, Record, RecordDraft, RecordId, RecordValidationError};
use crate::repo::record_repo::{RecordStore, StoreError};
use crate::view::FormView;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

pub type FormResult<T> = Result<T, FormError>;

/// Failure of one form action.
#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Invalid(#[from] RecordValidationError),
    #[error("unknown form field `{0}`")]
    UnknownField(String),
    #[error("record {0} is not in the displayed list")]
    NotDisplayed(RecordId),
}

/// Which record, if any, a submit will overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "id")]
pub enum FormMode {
    Creating,
    Editing(RecordId),
}

impl FormMode {
    pub fn editing_id(self) -> Option<RecordId> {
        match self {
            Self::Creating => None,
            Self::Editing(id) => Some(id),
        }
    }
}

/// Input fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Age,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Age => "age",
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "age" => Ok(Self::Age),
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }
}

/// Field values typed so far, kept as text until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInput {
    pub name: String,
    pub email: String,
    pub age: String,
}

impl PendingInput {
    pub fn from_record(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            age: record.age.to_string(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Age => &self.age,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Age => self.age = value,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Applies the input surface's constraints and builds a draft.
    ///
    /// The name is kept as typed; email is trimmed like a native email input.
    pub fn to_draft(&self) -> Result<RecordDraft, RecordValidationError> {
        let draft = RecordDraft::new(
            self.name.as_str(),
            self.email.trim(),
            parse_age(&self.age)?,
        );
        draft.validate()?;
        Ok(draft)
    }
}

/// Controller behind the record form and table.
pub struct FormController<S: RecordStore> {
    store: S,
    mode: FormMode,
    pending: PendingInput,
    records: Vec<Record>,
    last_error: Option<String>,
}

impl<S: RecordStore> FormController<S> {
    /// Creates a controller in `Creating` mode with an empty list.
    ///
    /// Call [`FormController::mount`] to load stored records.
    pub fn new(store: S) -> Self {
        Self {
            store,
            mode: FormMode::Creating,
            pending: PendingInput::default(),
            records: Vec::new(),
            last_error: None,
        }
    }

    /// Initial load of the displayed list.
    pub fn mount(&mut self) -> FormResult<()> {
        self.refresh()
    }

    /// Replaces the displayed list with the store's current contents.
    pub fn refresh(&mut self) -> FormResult<()> {
        let result = self.store.list_all().map_err(FormError::from);
        let result = result.map(|records| {
            self.records = records;
        });
        self.track("form_refresh", result)
    }

    /// Updates one pending field. No validation happens here.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.pending.set(field, value.into());
    }

    /// Same as [`FormController::set_field`] with the input's wire name.
    pub fn set_field_by_name(&mut self, name: &str, value: impl Into<String>) -> FormResult<()> {
        let result = name.parse::<FormField>();
        let result = result.map(|field| self.set_field(field, value));
        self.track("form_set_field", result)
    }

    /// Inserts or replaces from pending input, then re-fetches the list.
    ///
    /// On success pending input is cleared and mode returns to `Creating`.
    /// Returns the id that was written.
    pub fn submit(&mut self) -> FormResult<RecordId> {
        let result = self.try_submit();
        self.track("form_submit", result)
    }

    /// Targets a displayed record and copies its fields into pending input.
    pub fn begin_edit(&mut self, id: RecordId) -> FormResult<()> {
        let result = match self.records.iter().find(|record| record.id == id) {
            Some(record) => {
                self.pending = PendingInput::from_record(record);
                self.mode = FormMode::Editing(id);
                Ok(())
            }
            None => Err(FormError::NotDisplayed(id)),
        };
        self.track("form_edit", result)
    }

    /// Deletes by id, then re-fetches the list.
    ///
    /// Deleting the edit target clears pending input and returns to `Creating`.
    pub fn delete(&mut self, id: RecordId) -> FormResult<()> {
        let result = self.try_delete(id);
        self.track("form_delete", result)
    }

    /// Dismisses the error slot.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Editing(_))
    }

    pub fn pending(&self) -> &PendingInput {
        &self.pending
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Render snapshot of the current state.
    pub fn view(&self) -> FormView {
        FormView::build(
            self.mode,
            &self.pending,
            &self.records,
            self.last_error.as_deref(),
        )
    }

    fn try_submit(&mut self) -> FormResult<RecordId> {
        let draft = self.pending.to_draft()?;
        let id = match self.mode {
            FormMode::Editing(id) => {
                // replace upserts; a target missing from the list must not come back.
                if !self.records.iter().any(|record| record.id == id) {
                    return Err(FormError::NotDisplayed(id));
                }
                self.store.replace(&draft.with_id(id))?;
                id
            }
            FormMode::Creating => self.store.insert(&draft)?,
        };

        self.records = self.store.list_all()?;
        self.pending.clear();
        self.mode = FormMode::Creating;
        Ok(id)
    }

    fn try_delete(&mut self, id: RecordId) -> FormResult<()> {
        self.store.delete(id)?;
        self.records = self.store.list_all()?;
        if self.mode == FormMode::Editing(id) {
            self.pending.clear();
            self.mode = FormMode::Creating;
        }
        Ok(())
    }

    fn track<T>(&mut self, event: &str, result: FormResult<T>) -> FormResult<T> {
        match &result {
            Ok(_) => {
                info!(
                    "event={event} module=service status=ok mode={} records={}",
                    mode_label(self.mode),
                    self.records.len()
                );
                self.last_error = None;
            }
            Err(err) => {
                warn!(
                    "event={event} module=service status=error mode={} error={err}",
                    mode_label(self.mode)
                );
                self.last_error = Some(err.to_string());
            }
        }
        result
    }
}

fn mode_label(mode: FormMode) -> &'static str {
    match mode {
        FormMode::Creating => "creating",
        FormMode::Editing(_) => "editing",
    }
}
