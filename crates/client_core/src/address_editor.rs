//! Add or edit one address of an existing customer, outside the wizard.

use shared::{
    domain::{AddressId, CustomerId},
    protocol::{Address, AddressDraft},
};
use thiserror::Error;
use tracing::info;

use crate::{
    form::{FieldError, FieldValue, FormState},
    validation::AddressField,
    CrmApi, GatewayError,
};

#[derive(Debug, Error)]
pub enum AddressSaveError {
    #[error("the address has errors")]
    Invalid,
    #[error(transparent)]
    Remote(#[from] GatewayError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSaved {
    Added,
    Updated(AddressId),
}

#[derive(Debug, Clone)]
pub struct AddressEditor {
    customer_id: CustomerId,
    address_id: Option<AddressId>,
    form: FormState<AddressDraft>,
}

impl AddressEditor {
    pub fn add(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            address_id: None,
            form: FormState::new(),
        }
    }

    pub fn edit(customer_id: CustomerId, address: &Address) -> Self {
        let mut form = FormState::new();
        form.reset(Some(AddressDraft::from(address)));
        Self {
            customer_id,
            address_id: Some(address.id),
            form,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn address_id(&self) -> Option<AddressId> {
        self.address_id
    }

    pub fn is_edit(&self) -> bool {
        self.address_id.is_some()
    }

    pub fn form(&self) -> &FormState<AddressDraft> {
        &self.form
    }

    pub fn set_field(
        &mut self,
        field: AddressField,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldError> {
        self.form.set_field(field, value)
    }

    pub fn validate(&mut self) -> bool {
        self.form.validate()
    }

    pub async fn submit(&mut self, api: &dyn CrmApi) -> Result<AddressSaved, AddressSaveError> {
        if !self.form.validate() {
            return Err(AddressSaveError::Invalid);
        }
        match self.address_id {
            Some(address_id) => {
                api.update_address(address_id, self.form.draft()).await?;
                info!(address_id = address_id.0, "address updated");
                Ok(AddressSaved::Updated(address_id))
            }
            None => {
                api.add_address(self.customer_id, self.form.draft()).await?;
                info!(customer_id = self.customer_id.0, "address added");
                Ok(AddressSaved::Added)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/address_editor_tests.rs"]
mod tests;
