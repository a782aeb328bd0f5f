use super::*;
use crate::prompt::scripted::ScriptedPrompter;
use shared::{
    domain::{AddressId, CustomerId},
    protocol::{Address, CustomerDraft},
};

fn full_prefill() -> Prefill {
    Prefill {
        customer: vec![
            (CustomerField::FirstName, "Jo".into()),
            (CustomerField::LastName, "Lee".into()),
            (CustomerField::PhoneNumber, "9999999999".into()),
        ],
        address: vec![
            (AddressField::AddressDetails, "221B Baker Street".into()),
            (AddressField::City, "Pune".into()),
            (AddressField::State, "MH".into()),
            (AddressField::PinCode, "411001".into()),
        ],
    }
}

#[test]
fn prefilled_wizard_reaches_review_without_prompts() {
    let mut wizard = CustomerWizard::create();
    complete_without_prompts(&mut wizard, &full_prefill()).expect("complete");
    assert_eq!(wizard.stage(), Stage::Review);
    assert!(wizard.address().draft().is_primary);
}

#[test]
fn missing_fields_report_stage_errors() {
    let mut wizard = CustomerWizard::create();
    let prefill = Prefill {
        customer: vec![(CustomerField::FirstName, "Jo".into())],
        ..Prefill::default()
    };

    let errors = complete_without_prompts(&mut wizard, &prefill).expect_err("invalid");

    assert!(errors.contains("last_name: Last name is required"));
    assert!(errors.contains("phone_number: Phone number is required"));
    assert_eq!(wizard.stage(), Stage::CustomerInfo);
}

#[test]
fn bad_primary_flag_in_prefill_is_reported() {
    let mut wizard = CustomerWizard::create();
    let mut prefill = full_prefill();
    prefill
        .address
        .push((AddressField::IsPrimary, "sometimes".into()));

    let errors = complete_without_prompts(&mut wizard, &prefill).expect_err("flag");
    assert!(errors.contains("is_primary"));
}

#[test]
fn operator_answers_every_field_and_confirms() {
    let mut wizard = CustomerWizard::create();
    let mut prompter = ScriptedPrompter::answering([
        "Jo",
        "Lee",
        "9999999999",
        "",
        "221B Baker Street",
        "Pune",
        "MH",
        "411001",
        "yes",
    ])
    .confirming(Confirmation::Confirm);

    let outcome = run_wizard(&mut wizard, &Prefill::default(), &mut prompter, false);

    assert_eq!(outcome, FlowOutcome::Ready);
    assert_eq!(wizard.stage(), Stage::Review);
    assert_eq!(wizard.customer().draft().last_name, "Lee");
    assert_eq!(wizard.address().draft().pin_code, "411001");
}

#[test]
fn invalid_stage_is_prompted_again_with_errors() {
    let mut wizard = CustomerWizard::create();
    let mut prompter = ScriptedPrompter::answering(["J", "Lee", "9999999999", ""])
        .then(PromptResponse::Value("Jo".into()))
        .then(PromptResponse::Keep)
        .then(PromptResponse::Keep)
        .then(PromptResponse::Keep)
        .then(PromptResponse::Cancel);

    let outcome = run_wizard(&mut wizard, &Prefill::default(), &mut prompter, false);

    assert_eq!(outcome, FlowOutcome::Cancelled);
    assert_eq!(wizard.stage(), Stage::AddressInfo);
    let second_round_first_name = &prompter.asked[4];
    assert_eq!(
        second_round_first_name.1.as_deref(),
        Some("First name must be at least 2 characters")
    );
}

#[test]
fn back_from_review_returns_to_address_stage() {
    let mut wizard = CustomerWizard::create();
    complete_without_prompts(&mut wizard, &full_prefill()).expect("complete");
    let mut prompter = ScriptedPrompter::default()
        .then(PromptResponse::Keep)
        .then(PromptResponse::Keep)
        .then(PromptResponse::Keep)
        .then(PromptResponse::Value("411002".into()))
        .then(PromptResponse::Keep)
        .confirming(Confirmation::Back)
        .confirming(Confirmation::Confirm);

    let outcome = run_wizard(&mut wizard, &Prefill::default(), &mut prompter, false);

    assert_eq!(outcome, FlowOutcome::Ready);
    assert_eq!(wizard.address().draft().pin_code, "411002");
}

#[test]
fn review_summary_hides_address_in_edit_mode() {
    let wizard = CustomerWizard::edit(
        CustomerId(3),
        CustomerDraft {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            phone_number: "9876543210".into(),
            email: String::new(),
        },
    );
    let summary = review_summary(&wizard);
    assert!(summary.contains("Asha"));
    assert!(!summary.contains("Address"));
}

#[test]
fn address_editor_reprompts_until_valid() {
    let address = Address {
        id: AddressId(10),
        customer_id: CustomerId(1),
        address_details: "12 MG Road".into(),
        city: "Pune".into(),
        state: "MH".into(),
        pin_code: "411001".into(),
        is_primary: true,
        created_at: None,
    };
    let mut editor = AddressEditor::edit(CustomerId(1), &address);
    let mut prompter = ScriptedPrompter::default()
        .then(PromptResponse::Keep)
        .then(PromptResponse::Keep)
        .then(PromptResponse::Keep)
        .then(PromptResponse::Value("0411".into()))
        .then(PromptResponse::Value("maybe".into()))
        .then(PromptResponse::Value("no".into()))
        .then(PromptResponse::Keep)
        .then(PromptResponse::Keep)
        .then(PromptResponse::Keep)
        .then(PromptResponse::Value("411038".into()))
        .then(PromptResponse::Keep);

    let outcome = run_address_editor(&mut editor, &mut prompter);

    assert_eq!(outcome, FlowOutcome::Ready);
    assert_eq!(editor.form().draft().pin_code, "411038");
    assert!(!editor.form().draft().is_primary);
    let flag_retry = &prompter.asked[5];
    assert!(flag_retry
        .1
        .as_deref()
        .is_some_and(|message| message.contains("yes/no")));
    let pin_retry = &prompter.asked[9];
    assert_eq!(pin_retry.1.as_deref(), Some("PIN code must be 6 digits"));
}
