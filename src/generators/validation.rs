//! Input validation for the credentials form.
//!
//! Every field is checked on its own, so one bad value never hides another.
//! The result maps field keys to the message shown next to the input.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

use crate::credentials::model::{CredentialField, CredentialRecord};

lazy_static! {
    /// `<non-space>+@<non-space>+.<non-space>+`, matched against the whole trimmed value.
    static ref EMAIL_SHAPE: Regex = Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid");
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: CredentialField,
    pub message: String,
    /// Hint for fixing the value, not part of the field map.
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: CredentialField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Error for an empty or whitespace-only field.
    pub fn required(field: CredentialField) -> Self {
        Self::new(field, format!("{} is required", field.label()))
    }

    pub fn invalid_email(field: CredentialField) -> Self {
        Self::new(field, "Please enter a valid email address")
            .with_suggestion("Use the form name@example.com")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors collected for one record, in form order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: CredentialField) -> Option<&ValidationError> {
        self.errors.iter().find(|error| error.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Field key to message, the shape the form renders inline.
    pub fn to_field_map(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|error| (error.field.key().to_string(), error.message.clone()))
            .collect()
    }

    /// One-paragraph summary for logs and API error bodies.
    pub fn summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validation failed: {} field(s) need attention.",
            self.errors.len()
        )];
        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.join("\n")
    }

    /// `Ok` when nothing failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field: CredentialField, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::required(field));
    }
}

/// Validate a required email address
pub fn validate_email(value: &str, field: CredentialField, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::required(field));
        return;
    }

    if !is_email_shaped(trimmed) {
        errors.add(ValidationError::invalid_email(field));
    }
}

pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

/// Run every field rule against the record.
pub fn validate_record(record: &CredentialRecord) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for field in CredentialField::ALL {
        let value = record.value(field);
        match field {
            CredentialField::Email => validate_email(value, field, &mut errors),
            _ => validate_required(value, field, &mut errors),
        }
    }

    errors
}
