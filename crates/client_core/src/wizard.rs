//! Multi-step customer wizard: customer details, then address, then review.
//!
//! Forward moves are gated on the active stage's draft validating clean; back
//! moves never validate. Submission happens only from Review and re-checks
//! both drafts first. In create mode the new customer's id feeds the
//! add-address call, so the two calls run strictly in sequence.

use std::fmt;

use shared::{
    domain::CustomerId,
    protocol::{AddressDraft, CustomerDraft},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    form::{FieldError, FieldValue, FormState},
    validation::{AddressField, CustomerField},
    CrmApi, GatewayError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CustomerInfo,
    AddressInfo,
    Review,
}

impl Stage {
    pub fn title(self) -> &'static str {
        match self {
            Stage::CustomerInfo => "Customer Information",
            Stage::AddressInfo => "Address Information",
            Stage::Review => "Review & Save",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

const CREATE_STAGES: &[Stage] = &[Stage::CustomerInfo, Stage::AddressInfo, Stage::Review];
const EDIT_STAGES: &[Stage] = &[Stage::CustomerInfo, Stage::Review];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit(CustomerId),
}

/// What to do when the address call fails after the customer was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialFailurePolicy {
    /// Leave the new customer in place and report the inconsistency.
    #[default]
    Report,
    /// Delete the new customer again before reporting.
    Compensate,
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("{field} can only be changed during {owner}, the wizard is at {active}")]
    InactiveStage {
        field: &'static str,
        owner: Stage,
        active: Stage,
    },
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("the wizard has already been submitted")]
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { customer_id: CustomerId },
    Updated { customer_id: CustomerId },
}

impl SubmitOutcome {
    pub fn customer_id(self) -> CustomerId {
        match self {
            SubmitOutcome::Created { customer_id } | SubmitOutcome::Updated { customer_id } => {
                customer_id
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("submission is only possible from review, the wizard is at {0}")]
    NotAtReview(Stage),
    #[error("the wizard has already been submitted")]
    Finished,
    #[error("the form has errors; returned to customer information")]
    Invalid,
    #[error("failed to create customer: {0}")]
    CreateFailed(#[source] GatewayError),
    #[error("failed to update customer {customer_id}: {source}")]
    UpdateFailed {
        customer_id: CustomerId,
        source: GatewayError,
    },
    #[error("customer {customer_id} was created but the address was not saved: {source}")]
    AddressNotAdded {
        customer_id: CustomerId,
        source: GatewayError,
    },
    #[error("the address was not saved and customer {customer_id} was removed again: {source}")]
    RolledBack {
        customer_id: CustomerId,
        source: GatewayError,
    },
}

impl SubmitError {
    /// True when the remote side was left with a customer but no address.
    pub fn is_partial(&self) -> bool {
        matches!(self, SubmitError::AddressNotAdded { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CustomerWizard {
    mode: WizardMode,
    stage: Stage,
    customer: FormState<CustomerDraft>,
    address: FormState<AddressDraft>,
    policy: PartialFailurePolicy,
    finished: bool,
}

impl Default for CustomerWizard {
    fn default() -> Self {
        Self::create()
    }
}

impl CustomerWizard {
    /// New-customer wizard; the address starts out flagged as primary.
    pub fn create() -> Self {
        Self {
            mode: WizardMode::Create,
            stage: Stage::CustomerInfo,
            customer: FormState::new(),
            address: FormState::with_defaults(AddressDraft {
                is_primary: true,
                ..AddressDraft::default()
            }),
            policy: PartialFailurePolicy::default(),
            finished: false,
        }
    }

    /// Edit wizard for an existing customer. Addresses are edited elsewhere,
    /// so this one goes straight from customer details to review.
    pub fn edit(customer_id: CustomerId, current: CustomerDraft) -> Self {
        let mut wizard = Self::create();
        wizard.mode = WizardMode::Edit(customer_id);
        wizard.customer.reset(Some(current));
        wizard
    }

    pub fn with_policy(mut self, policy: PartialFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn stages(&self) -> &'static [Stage] {
        match self.mode {
            WizardMode::Create => CREATE_STAGES,
            WizardMode::Edit(_) => EDIT_STAGES,
        }
    }

    /// Zero-based position of the active stage within `stages()`.
    pub fn step_index(&self) -> usize {
        self.stages()
            .iter()
            .position(|stage| *stage == self.stage)
            .unwrap_or_default()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn customer(&self) -> &FormState<CustomerDraft> {
        &self.customer
    }

    pub fn address(&self) -> &FormState<AddressDraft> {
        &self.address
    }

    pub fn set_customer_field(
        &mut self,
        field: CustomerField,
        value: impl Into<FieldValue>,
    ) -> Result<(), WizardError> {
        self.ensure_editable(field.as_str(), Stage::CustomerInfo)?;
        self.customer.set_field(field, value)?;
        Ok(())
    }

    pub fn set_address_field(
        &mut self,
        field: AddressField,
        value: impl Into<FieldValue>,
    ) -> Result<(), WizardError> {
        self.ensure_editable(field.as_str(), Stage::AddressInfo)?;
        self.address.set_field(field, value)?;
        Ok(())
    }

    fn ensure_editable(&self, field: &'static str, owner: Stage) -> Result<(), WizardError> {
        if self.finished {
            return Err(WizardError::Finished);
        }
        if self.stage != owner {
            return Err(WizardError::InactiveStage {
                field,
                owner,
                active: self.stage,
            });
        }
        Ok(())
    }

    /// Moves forward when the active draft validates clean. Returns whether
    /// the stage changed; on failure the field errors are on the active form.
    pub fn advance(&mut self) -> bool {
        if self.finished {
            return false;
        }
        let next = match self.stage {
            Stage::CustomerInfo if self.customer.validate() => self.next_stage(),
            Stage::AddressInfo if self.address.validate() => self.next_stage(),
            _ => None,
        };
        match next {
            Some(stage) => {
                self.stage = stage;
                true
            }
            None => false,
        }
    }

    pub fn back(&mut self) -> Stage {
        if !self.finished {
            let index = self.step_index();
            if index > 0 {
                self.stage = self.stages()[index - 1];
            }
        }
        self.stage
    }

    fn next_stage(&self) -> Option<Stage> {
        self.stages().get(self.step_index() + 1).copied()
    }

    /// Re-validates the drafts and issues the remote calls.
    ///
    /// A validation failure at this point sends the wizard back to
    /// CustomerInfo whichever draft failed.
    pub async fn submit(&mut self, api: &dyn CrmApi) -> Result<SubmitOutcome, SubmitError> {
        if self.finished {
            return Err(SubmitError::Finished);
        }
        if self.stage != Stage::Review {
            return Err(SubmitError::NotAtReview(self.stage));
        }

        let customer_ok = self.customer.validate();
        let address_ok = match self.mode {
            WizardMode::Create => self.address.validate(),
            WizardMode::Edit(_) => true,
        };
        if !customer_ok || !address_ok {
            self.stage = Stage::CustomerInfo;
            return Err(SubmitError::Invalid);
        }

        let outcome = match self.mode {
            WizardMode::Edit(customer_id) => self.submit_update(api, customer_id).await?,
            WizardMode::Create => self.submit_create(api).await?,
        };
        self.finished = true;
        Ok(outcome)
    }

    async fn submit_update(
        &self,
        api: &dyn CrmApi,
        customer_id: CustomerId,
    ) -> Result<SubmitOutcome, SubmitError> {
        api.update_customer(customer_id, self.customer.draft())
            .await
            .map_err(|source| SubmitError::UpdateFailed {
                customer_id,
                source,
            })?;
        info!(customer_id = customer_id.0, "wizard: customer updated");
        Ok(SubmitOutcome::Updated { customer_id })
    }

    async fn submit_create(&mut self, api: &dyn CrmApi) -> Result<SubmitOutcome, SubmitError> {
        let customer_id = api
            .create_customer(self.customer.draft())
            .await
            .map_err(SubmitError::CreateFailed)?;
        info!(customer_id = customer_id.0, "wizard: customer created");

        let Err(source) = api.add_address(customer_id, self.address.draft()).await else {
            info!(customer_id = customer_id.0, "wizard: address added");
            return Ok(SubmitOutcome::Created { customer_id });
        };

        warn!(
            customer_id = customer_id.0,
            error = %source,
            "wizard: address add failed after customer was created"
        );
        if self.policy == PartialFailurePolicy::Compensate {
            match api.delete_customer(customer_id).await {
                Ok(()) => {
                    info!(customer_id = customer_id.0, "wizard: created customer removed");
                    return Err(SubmitError::RolledBack {
                        customer_id,
                        source,
                    });
                }
                Err(delete_err) => warn!(
                    customer_id = customer_id.0,
                    error = %delete_err,
                    "wizard: could not remove customer after address failure"
                ),
            }
        }

        // The customer exists remotely; submitting again would duplicate it.
        self.finished = true;
        Err(SubmitError::AddressNotAdded {
            customer_id,
            source,
        })
    }
}

#[cfg(test)]
#[path = "tests/wizard_tests.rs"]
mod tests;
