//! Draft plus per-field errors for a single entity being edited.
//!
//! Changing a field and validating the draft are separate steps: `set_field`
//! only clears that field's stale error, and errors are recomputed by
//! `validate` alone.

use std::fmt;

use shared::protocol::{AddressDraft, CustomerDraft};
use thiserror::Error;

use crate::validation::{self, AddressField, CustomerField, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Flag(true) => f.write_str("yes"),
            FieldValue::Flag(false) => f.write_str("no"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field '{field}' expects text")]
    ExpectedText { field: &'static str },
    #[error("field '{field}' expects yes/no, got '{value}'")]
    ExpectedFlag { field: &'static str, value: String },
}

/// An entity draft the form controller can edit and validate.
pub trait Draft: Clone + Default + fmt::Debug {
    type Field: Copy + Ord + fmt::Debug + fmt::Display;

    fn get(&self, field: Self::Field) -> FieldValue;
    fn apply(&mut self, field: Self::Field, value: FieldValue) -> Result<(), FieldError>;
    fn validate(&self) -> ValidationErrors<Self::Field>;
}

fn text(field: &'static str, value: FieldValue) -> Result<String, FieldError> {
    match value {
        FieldValue::Text(text) => Ok(text),
        FieldValue::Flag(_) => Err(FieldError::ExpectedText { field }),
    }
}

fn flag(field: &'static str, value: FieldValue) -> Result<bool, FieldError> {
    match value {
        FieldValue::Flag(flag) => Ok(flag),
        FieldValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Ok(true),
            "false" | "no" | "n" | "0" => Ok(false),
            _ => Err(FieldError::ExpectedFlag { field, value: text }),
        },
    }
}

impl Draft for CustomerDraft {
    type Field = CustomerField;

    fn get(&self, field: CustomerField) -> FieldValue {
        let text = match field {
            CustomerField::FirstName => &self.first_name,
            CustomerField::LastName => &self.last_name,
            CustomerField::PhoneNumber => &self.phone_number,
            CustomerField::Email => &self.email,
        };
        FieldValue::Text(text.clone())
    }

    fn apply(&mut self, field: CustomerField, value: FieldValue) -> Result<(), FieldError> {
        let value = text(field.as_str(), value)?;
        match field {
            CustomerField::FirstName => self.first_name = value,
            CustomerField::LastName => self.last_name = value,
            CustomerField::PhoneNumber => self.phone_number = value,
            CustomerField::Email => self.email = value,
        }
        Ok(())
    }

    fn validate(&self) -> ValidationErrors<CustomerField> {
        validation::validate_customer(self)
    }
}

impl Draft for AddressDraft {
    type Field = AddressField;

    fn get(&self, field: AddressField) -> FieldValue {
        let text = match field {
            AddressField::AddressDetails => &self.address_details,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::PinCode => &self.pin_code,
            AddressField::IsPrimary => return FieldValue::Flag(self.is_primary),
        };
        FieldValue::Text(text.clone())
    }

    fn apply(&mut self, field: AddressField, value: FieldValue) -> Result<(), FieldError> {
        let name = field.as_str();
        match field {
            AddressField::AddressDetails => self.address_details = text(name, value)?,
            AddressField::City => self.city = text(name, value)?,
            AddressField::State => self.state = text(name, value)?,
            AddressField::PinCode => self.pin_code = text(name, value)?,
            AddressField::IsPrimary => self.is_primary = flag(name, value)?,
        }
        Ok(())
    }

    fn validate(&self) -> ValidationErrors<AddressField> {
        validation::validate_address(self)
    }
}

#[derive(Debug, Clone)]
pub struct FormState<D: Draft> {
    draft: D,
    defaults: D,
    errors: ValidationErrors<D::Field>,
}

impl<D: Draft> Default for FormState<D> {
    fn default() -> Self {
        Self::with_defaults(D::default())
    }
}

impl<D: Draft> FormState<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form whose `reset(None)` returns to `defaults` instead of `D::default()`.
    pub fn with_defaults(defaults: D) -> Self {
        Self {
            draft: defaults.clone(),
            defaults,
            errors: ValidationErrors::default(),
        }
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors<D::Field> {
        &self.errors
    }

    pub fn value(&self, field: D::Field) -> FieldValue {
        self.draft.get(field)
    }

    pub fn error(&self, field: D::Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn set_field(
        &mut self,
        field: D::Field,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldError> {
        self.draft.apply(field, value.into())?;
        self.errors.clear(field);
        Ok(())
    }

    pub fn validate(&mut self) -> bool {
        self.errors = self.draft.validate();
        self.errors.is_empty()
    }

    pub fn reset(&mut self, draft: Option<D>) {
        self.draft = draft.unwrap_or_else(|| self.defaults.clone());
        self.errors = ValidationErrors::default();
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
