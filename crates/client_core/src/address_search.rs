//! Search addresses by city, state and PIN code.

use shared::protocol::{AddressSearchHit, AddressSearchParams};
use thiserror::Error;
use tracing::debug;

use crate::{CrmApi, GatewayError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    City,
    State,
    PinCode,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Please provide at least one search parameter")]
    MissingCriteria,
    #[error(transparent)]
    Remote(#[from] GatewayError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub city: String,
    pub state: String,
    pub pin_code: String,
}

#[derive(Debug, Default)]
pub struct AddressSearchController {
    criteria: SearchCriteria,
    results: Vec<AddressSearchHit>,
    error: Option<String>,
    has_searched: bool,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl AddressSearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn results(&self) -> &[AddressSearchHit] {
        &self.results
    }

    /// Message of the last failed search, local or remote.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    pub fn set_field(&mut self, field: SearchField, value: impl Into<String>) {
        let value = value.into();
        match field {
            SearchField::City => self.criteria.city = value,
            SearchField::State => self.criteria.state = value,
            SearchField::PinCode => self.criteria.pin_code = value,
        }
        self.error = None;
    }

    /// Non-blank criteria, trimmed. Fails when nothing was given.
    pub fn build_params(&self) -> Result<AddressSearchParams, SearchError> {
        let params = AddressSearchParams {
            city: non_blank(&self.criteria.city),
            state: non_blank(&self.criteria.state),
            pin_code: non_blank(&self.criteria.pin_code),
        };
        if params == AddressSearchParams::default() {
            return Err(SearchError::MissingCriteria);
        }
        Ok(params)
    }

    pub async fn search(&mut self, api: &dyn CrmApi) -> Result<&[AddressSearchHit], SearchError> {
        let params = match self.build_params() {
            Ok(params) => params,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err);
            }
        };
        self.error = None;
        self.has_searched = true;

        match api.search_addresses(&params).await {
            Ok(hits) => {
                debug!(hits = hits.len(), "address search finished");
                self.results = hits;
                Ok(&self.results)
            }
            Err(err) => {
                self.results.clear();
                self.error = Some(err.operator_message("Failed to search addresses"));
                Err(SearchError::Remote(err))
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "tests/address_search_tests.rs"]
mod tests;
