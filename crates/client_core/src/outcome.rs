//! The last operation outcome, as shown to the operator.

use std::fmt;

use serde::Serialize;

use crate::{
    address_editor::{AddressSaveError, AddressSaved},
    address_search::SearchError,
    wizard::{SubmitError, SubmitOutcome},
    GatewayError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.severity == Severity::Success
    }

    pub fn from_gateway(err: &GatewayError, fallback: &str) -> Self {
        Self::error(err.operator_message(fallback))
    }

    pub fn from_submitted(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Created { .. } => Self::success("Customer and address created successfully"),
            SubmitOutcome::Updated { .. } => Self::success("Customer updated successfully"),
        }
    }

    pub fn from_submit(err: &SubmitError) -> Self {
        const SAVE_FAILED: &str = "Failed to save customer";
        match err {
            SubmitError::Invalid => Self::error("Please fix the highlighted fields"),
            SubmitError::NotAtReview(_) | SubmitError::Finished => Self::error(err.to_string()),
            SubmitError::CreateFailed(source) | SubmitError::UpdateFailed { source, .. } => {
                Self::from_gateway(source, SAVE_FAILED)
            }
            SubmitError::AddressNotAdded {
                customer_id,
                source,
            } => Self::warning(format!(
                "Customer {customer_id} was created, but the address was not saved ({}). \
                 Add the address manually.",
                source.operator_message("Failed to save address")
            )),
            SubmitError::RolledBack { source, .. } => Self::error(format!(
                "{} The new customer was removed again.",
                source.operator_message("Failed to save address")
            )),
        }
    }

    pub fn from_address_saved(saved: AddressSaved) -> Self {
        match saved {
            AddressSaved::Added => Self::success("Address added successfully"),
            AddressSaved::Updated(_) => Self::success("Address updated successfully"),
        }
    }

    pub fn from_address_error(err: &AddressSaveError) -> Self {
        match err {
            AddressSaveError::Invalid => Self::error("Please fix the highlighted fields"),
            AddressSaveError::Remote(source) => Self::from_gateway(source, "Failed to save address"),
        }
    }

    pub fn from_search(err: &SearchError) -> Self {
        match err {
            SearchError::MissingCriteria => Self::error(err.to_string()),
            SearchError::Remote(source) => Self::from_gateway(source, "Failed to search addresses"),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
#[path = "tests/outcome_tests.rs"]
mod tests;
