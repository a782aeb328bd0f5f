use super::*;
use crate::test_support::{Call, Op, RecordingApi};

fn fill_customer(wizard: &mut CustomerWizard) {
    wizard
        .set_customer_field(CustomerField::FirstName, "Jo")
        .expect("first");
    wizard
        .set_customer_field(CustomerField::LastName, "Lee")
        .expect("last");
    wizard
        .set_customer_field(CustomerField::PhoneNumber, "9999999999")
        .expect("phone");
}

fn fill_address(wizard: &mut CustomerWizard) {
    wizard
        .set_address_field(AddressField::AddressDetails, "221B Baker Street")
        .expect("details");
    wizard
        .set_address_field(AddressField::City, "Pune")
        .expect("city");
    wizard
        .set_address_field(AddressField::State, "MH")
        .expect("state");
    wizard
        .set_address_field(AddressField::PinCode, "411001")
        .expect("pin");
}

fn wizard_at_review() -> CustomerWizard {
    let mut wizard = CustomerWizard::create();
    fill_customer(&mut wizard);
    assert!(wizard.advance());
    fill_address(&mut wizard);
    assert!(wizard.advance());
    assert_eq!(wizard.stage(), Stage::Review);
    wizard
}

#[test]
fn invalid_customer_blocks_advance_and_surfaces_errors() {
    let mut wizard = CustomerWizard::create();
    wizard
        .set_customer_field(CustomerField::FirstName, "J")
        .expect("first");

    assert!(!wizard.advance());
    assert_eq!(wizard.stage(), Stage::CustomerInfo);
    assert_eq!(
        wizard.customer().error(CustomerField::FirstName),
        Some("First name must be at least 2 characters")
    );
    assert!(wizard.customer().error(CustomerField::PhoneNumber).is_some());
}

#[test]
fn address_defaults_to_primary_in_wizard() {
    let wizard = CustomerWizard::create();
    assert!(wizard.address().draft().is_primary);
    assert_eq!(wizard.stages().len(), 3);
}

#[test]
fn fields_of_inactive_stage_are_rejected_without_mutation() {
    let mut wizard = CustomerWizard::create();
    let err = wizard
        .set_address_field(AddressField::City, "Pune")
        .expect_err("inactive");
    assert!(matches!(
        err,
        WizardError::InactiveStage {
            owner: Stage::AddressInfo,
            active: Stage::CustomerInfo,
            ..
        }
    ));
    assert!(wizard.address().draft().city.is_empty());

    fill_customer(&mut wizard);
    assert!(wizard.advance());
    assert!(wizard
        .set_customer_field(CustomerField::FirstName, "Other")
        .is_err());
    assert_eq!(wizard.customer().draft().first_name, "Jo");
}

#[test]
fn back_never_validates() {
    let mut wizard = CustomerWizard::create();
    fill_customer(&mut wizard);
    assert!(wizard.advance());
    assert_eq!(wizard.stage(), Stage::AddressInfo);

    // Address is still empty; going back must not touch its errors.
    assert_eq!(wizard.back(), Stage::CustomerInfo);
    assert!(wizard.address().errors().is_empty());
    assert_eq!(wizard.back(), Stage::CustomerInfo);
}

#[tokio::test]
async fn submit_outside_review_issues_no_call() {
    let api = RecordingApi::new();
    let mut wizard = CustomerWizard::create();

    let err = wizard.submit(&api).await.expect_err("not at review");
    assert!(matches!(err, SubmitError::NotAtReview(Stage::CustomerInfo)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn create_runs_customer_then_address_with_new_id() {
    let api = RecordingApi::new();
    let mut wizard = wizard_at_review();

    let outcome = wizard.submit(&api).await.expect("submit");

    assert_eq!(
        outcome,
        SubmitOutcome::Created {
            customer_id: CustomerId(501)
        }
    );
    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], Call::CreateCustomer(draft) if draft.first_name == "Jo"));
    assert!(matches!(
        &calls[1],
        Call::AddAddress(CustomerId(501), draft) if draft.is_primary && draft.pin_code == "411001"
    ));
    assert!(wizard.is_finished());
    assert!(matches!(
        wizard.set_customer_field(CustomerField::Email, "a@b.co"),
        Err(WizardError::Finished)
    ));
    assert!(matches!(
        wizard.submit(&api).await,
        Err(SubmitError::Finished)
    ));
}

#[tokio::test]
async fn failed_create_never_attempts_address() {
    let api = RecordingApi::new()
        .failing_on(Op::CreateCustomer)
        .with_failure_message("Phone number already exists");
    let mut wizard = wizard_at_review();

    let err = wizard.submit(&api).await.expect_err("create fails");

    assert!(matches!(err, SubmitError::CreateFailed(_)));
    assert!(!err.is_partial());
    assert_eq!(api.calls().len(), 1);
    assert_eq!(wizard.stage(), Stage::Review);
    assert!(!wizard.is_finished());
}

#[tokio::test]
async fn address_failure_after_create_is_reported_as_partial() {
    let api = RecordingApi::new().failing_on(Op::AddAddress);
    let mut wizard = wizard_at_review();

    let err = wizard.submit(&api).await.expect_err("address fails");

    assert!(matches!(
        err,
        SubmitError::AddressNotAdded {
            customer_id: CustomerId(501),
            ..
        }
    ));
    assert!(err.is_partial());
    assert_eq!(api.calls().len(), 2);
    assert!(wizard.is_finished());
}

#[tokio::test]
async fn compensate_policy_deletes_created_customer() {
    let api = RecordingApi::new().failing_on(Op::AddAddress);
    let mut wizard = wizard_at_review().with_policy(PartialFailurePolicy::Compensate);

    let err = wizard.submit(&api).await.expect_err("rolled back");

    assert!(matches!(err, SubmitError::RolledBack { .. }));
    assert_eq!(api.calls()[2], Call::DeleteCustomer(CustomerId(501)));
    assert!(!wizard.is_finished());
}

#[tokio::test]
async fn failed_compensation_stays_partial() {
    let api = RecordingApi::new()
        .failing_on(Op::AddAddress)
        .failing_on(Op::DeleteCustomer);
    let mut wizard = wizard_at_review().with_policy(PartialFailurePolicy::Compensate);

    let err = wizard.submit(&api).await.expect_err("partial");

    assert!(err.is_partial());
    assert_eq!(api.calls().len(), 3);
}

#[tokio::test]
async fn review_time_address_failure_routes_to_customer_info() {
    let api = RecordingApi::new();
    let mut wizard = CustomerWizard::create();
    fill_customer(&mut wizard);
    assert!(wizard.advance());
    fill_address(&mut wizard);
    assert!(wizard.advance());
    wizard.back();
    wizard
        .set_address_field(AddressField::PinCode, "012345")
        .expect("pin");
    // Jump to Review without passing the AddressInfo gate again.
    wizard.stage = Stage::Review;

    let err = wizard.submit(&api).await.expect_err("invalid");

    assert!(matches!(err, SubmitError::Invalid));
    assert_eq!(wizard.stage(), Stage::CustomerInfo);
    assert_eq!(
        wizard.address().error(AddressField::PinCode),
        Some("PIN code must be 6 digits")
    );
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn edit_skips_address_stage_and_updates_once() {
    let api = RecordingApi::new();
    let current = CustomerDraft {
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        phone_number: "9876543210".into(),
        email: String::new(),
    };
    let mut wizard = CustomerWizard::edit(CustomerId(7), current);
    assert_eq!(wizard.stages(), &[Stage::CustomerInfo, Stage::Review]);

    wizard
        .set_customer_field(CustomerField::Email, "asha@example.in")
        .expect("email");
    assert!(wizard.advance());
    assert_eq!(wizard.stage(), Stage::Review);

    // The address draft is blank and would not validate; edit mode never checks it.
    assert!(wizard.address().draft().address_details.is_empty());
    let outcome = wizard.submit(&api).await.expect("update");

    assert_eq!(
        outcome,
        SubmitOutcome::Updated {
            customer_id: CustomerId(7)
        }
    );
    assert!(wizard.address().errors().is_empty());
    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(
        &calls[0],
        Call::UpdateCustomer(CustomerId(7), draft) if draft.email == "asha@example.in"
    ));
}

#[tokio::test]
async fn failed_update_keeps_wizard_usable() {
    let api = RecordingApi::new().failing_on(Op::UpdateCustomer);
    let current = CustomerDraft {
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        phone_number: "9876543210".into(),
        email: String::new(),
    };
    let mut wizard = CustomerWizard::edit(CustomerId(7), current);
    assert!(wizard.advance());

    let err = wizard.submit(&api).await.expect_err("update fails");
    assert!(matches!(
        err,
        SubmitError::UpdateFailed {
            customer_id: CustomerId(7),
            ..
        }
    ));
    assert!(!wizard.is_finished());
    assert_eq!(wizard.back(), Stage::CustomerInfo);
}
