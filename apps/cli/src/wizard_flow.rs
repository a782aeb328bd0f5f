//! Drives the customer wizard and the address editor from a `Prompter`.

use client_core::{
    address_editor::AddressEditor,
    form::{Draft, FieldValue, FormState},
    validation::{AddressField, CustomerField},
    wizard::{CustomerWizard, Stage, WizardMode},
};

use crate::prompt::{Confirmation, PromptResponse, Prompter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Ready,
    Cancelled,
}

/// Field values given on the command line, applied before any prompting.
#[derive(Debug, Clone, Default)]
pub struct Prefill {
    pub customer: Vec<(CustomerField, String)>,
    pub address: Vec<(AddressField, String)>,
}

enum Step {
    Next,
    Back,
    Cancel,
}

/// Prompts each field in order. `Back` on the first field leaves the stage.
/// A rejected value re-prompts the same field with the rejection message.
fn prompt_fields<T, F: Copy>(
    target: &mut T,
    fields: &[F],
    label: fn(F) -> &'static str,
    prompter: &mut dyn Prompter,
    read: impl Fn(&T, F) -> (FieldValue, Option<String>),
    write: impl Fn(&mut T, F, String) -> Result<(), String>,
) -> Step {
    let mut index = 0;
    let mut rejected = None;
    while index < fields.len() {
        let field = fields[index];
        let (current, stored_error) = read(target, field);
        let error = rejected.take().or(stored_error);
        match prompter.prompt_field(label(field), &current.to_string(), error.as_deref()) {
            PromptResponse::Value(value) => {
                if let Err(message) = write(target, field, value) {
                    rejected = Some(message);
                    continue;
                }
            }
            PromptResponse::Keep => {}
            PromptResponse::Back if index == 0 => return Step::Back,
            PromptResponse::Back => {
                index -= 1;
                continue;
            }
            PromptResponse::Cancel => return Step::Cancel,
        }
        index += 1;
    }
    Step::Next
}

fn read_form<D: Draft>(form: &FormState<D>, field: D::Field) -> (FieldValue, Option<String>) {
    (form.value(field), form.error(field).map(str::to_string))
}

fn summary_lines<D: Draft>(
    form: &FormState<D>,
    fields: &[D::Field],
    label: fn(D::Field) -> &'static str,
) -> String {
    fields
        .iter()
        .map(|field| {
            let value = form.value(*field).to_string();
            let shown = if value.is_empty() { "-" } else { value.as_str() };
            format!("  {:<16} {shown}", label(*field))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn review_summary(wizard: &CustomerWizard) -> String {
    let mut out = String::from("Customer\n");
    out.push_str(&summary_lines(
        wizard.customer(),
        &CustomerField::ALL,
        CustomerField::label,
    ));
    if wizard.mode() == WizardMode::Create {
        out.push_str("\nAddress\n");
        out.push_str(&summary_lines(
            wizard.address(),
            &AddressField::ALL,
            AddressField::label,
        ));
    }
    out
}

/// Applies every prefilled value that belongs to the active stage.
fn apply_prefill(wizard: &mut CustomerWizard, prefill: &Prefill) -> Vec<String> {
    let mut problems = Vec::new();
    match wizard.stage() {
        Stage::CustomerInfo => {
            for (field, value) in &prefill.customer {
                if let Err(err) = wizard.set_customer_field(*field, value.as_str()) {
                    problems.push(err.to_string());
                }
            }
        }
        Stage::AddressInfo => {
            for (field, value) in &prefill.address {
                if let Err(err) = wizard.set_address_field(*field, value.as_str()) {
                    problems.push(err.to_string());
                }
            }
        }
        Stage::Review => {}
    }
    problems
}

fn stage_errors(wizard: &CustomerWizard) -> String {
    match wizard.stage() {
        Stage::CustomerInfo => wizard.customer().errors().to_string(),
        Stage::AddressInfo => wizard.address().errors().to_string(),
        Stage::Review => String::new(),
    }
}

/// Fills and advances the wizard up to Review with no operator involved.
/// Fails with the field errors of the first stage that does not validate.
pub fn complete_without_prompts(
    wizard: &mut CustomerWizard,
    prefill: &Prefill,
) -> Result<(), String> {
    while wizard.stage() != Stage::Review {
        let problems = apply_prefill(wizard, prefill);
        if !problems.is_empty() {
            return Err(problems.join("; "));
        }
        if !wizard.advance() {
            return Err(stage_errors(wizard));
        }
    }
    Ok(())
}

/// Walks the operator through the stages until they confirm the review or
/// cancel. Prefilled values are applied the first time a stage is entered.
pub fn run_wizard(
    wizard: &mut CustomerWizard,
    prefill: &Prefill,
    prompter: &mut dyn Prompter,
    skip_confirm: bool,
) -> FlowOutcome {
    let mut prefilled = Vec::new();
    loop {
        let stage = wizard.stage();
        prompter.show_stage(stage.title(), wizard.step_index() + 1, wizard.stages().len());
        if !prefilled.contains(&stage) {
            prefilled.push(stage);
            // Rejected values are left for the operator to enter.
            apply_prefill(wizard, prefill);
        }

        let step = match stage {
            Stage::CustomerInfo => prompt_fields(
                wizard,
                &CustomerField::ALL,
                CustomerField::label,
                prompter,
                |w, field| read_form(w.customer(), field),
                |w, field, value| w.set_customer_field(field, value).map_err(|e| e.to_string()),
            ),
            Stage::AddressInfo => prompt_fields(
                wizard,
                &AddressField::ALL,
                AddressField::label,
                prompter,
                |w, field| read_form(w.address(), field),
                |w, field, value| w.set_address_field(field, value).map_err(|e| e.to_string()),
            ),
            Stage::Review if skip_confirm => return FlowOutcome::Ready,
            Stage::Review => match prompter.confirm(&review_summary(wizard)) {
                Confirmation::Confirm => return FlowOutcome::Ready,
                Confirmation::Back => Step::Back,
                Confirmation::Cancel => Step::Cancel,
            },
        };

        match step {
            Step::Next => {
                wizard.advance();
            }
            Step::Back => {
                wizard.back();
            }
            Step::Cancel => return FlowOutcome::Cancelled,
        }
    }
}

/// Prompts the address fields until they validate or the operator cancels.
pub fn run_address_editor(editor: &mut AddressEditor, prompter: &mut dyn Prompter) -> FlowOutcome {
    loop {
        let step = prompt_fields(
            editor,
            &AddressField::ALL,
            AddressField::label,
            prompter,
            |e, field| read_form(e.form(), field),
            |e, field, value| e.set_field(field, value).map_err(|err| err.to_string()),
        );
        match step {
            Step::Cancel => return FlowOutcome::Cancelled,
            Step::Back => continue,
            Step::Next if editor.validate() => return FlowOutcome::Ready,
            Step::Next => continue,
        }
    }
}

#[cfg(test)]
#[path = "tests/wizard_flow_tests.rs"]
mod tests;
