//! Record domain model.
//!
//! # Responsibility
//! - Define the single stored entity and its insert-side draft.
//! - Check the constraints the form inputs declare (required text,
//!   email-shaped text, positive integer).
//!
//! # Invariants
//! - `id` is assigned by the store and never reused after deletion.
//! - `age` is at least 1.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

// Same shape a native `type=email` input accepts.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid email regex")
});

/// Store-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl RecordId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Constraint violations on record fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordValidationError {
    #[error("name is required")]
    EmptyName,
    #[error("email `{0}` is not a valid email address")]
    InvalidEmail(String),
    #[error("age must be a positive integer, got `{0}`")]
    InvalidAge(String),
}

/// Field values of a record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub name: String,
    pub email: String,
    pub age: u32,
}

impl RecordDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age,
        }
    }

    /// Checks required/email/min=1 constraints.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.name.is_empty() {
            return Err(RecordValidationError::EmptyName);
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(RecordValidationError::InvalidEmail(self.email.clone()));
        }
        if self.age == 0 {
            return Err(RecordValidationError::InvalidAge(self.age.to_string()));
        }
        Ok(())
    }

    /// Attaches a store-assigned id.
    pub fn with_id(self, id: RecordId) -> Record {
        Record {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
        }
    }
}

/// One stored name/email/age entry.
///
/// Serialized as `{"id", "name", "email", "age"}`, matching the row layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub age: u32,
}

impl Record {
    /// Field values without the id.
    pub fn draft(&self) -> RecordDraft {
        RecordDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age,
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        self.draft().validate()
    }
}

/// Parses the text of a number input into a positive age.
///
/// Integral float text (`2.0`, `1e1`) is accepted, as a `type=number min=1`
/// input with the default step would.
pub fn parse_age(raw: &str) -> Result<u32, RecordValidationError> {
    let trimmed = raw.trim();
    let invalid = || RecordValidationError::InvalidAge(trimmed.to_string());

    if let Ok(age) = trimmed.parse::<u32>() {
        return if age >= 1 { Ok(age) } else { Err(invalid()) };
    }

    let value = trimmed.parse::<f64>().map_err(|_| invalid())?;
    if value.is_finite() && value.fract() == 0.0 && value >= 1.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(invalid())
    }
}
