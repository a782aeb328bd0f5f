use clap::{Args, Subcommand, ValueEnum};
use client_core::{
    detail::load_customer_detail,
    listing::{CustomerListController, ListFilter},
    outcome::Notice,
    validation::{AddressField, CustomerField},
    wizard::{CustomerWizard, PartialFailurePolicy, SubmitError},
};
use shared::{
    domain::{CustomerId, SortField, SortOrder},
    protocol::CustomerDraft,
};
use tracing::debug;

use super::{cancelled, CommandOutput, Context};
use crate::wizard_flow::{complete_without_prompts, run_wizard, FlowOutcome, Prefill};

#[derive(Subcommand, Debug)]
pub enum CustomerCommand {
    /// Page through customers with optional filters.
    List(ListArgs),
    /// Show one customer with all of their addresses.
    Show { id: CustomerId },
    /// Create a customer together with their first address.
    Create(CreateArgs),
    /// Change a customer's name, phone or email.
    Edit(EditArgs),
    /// Delete a customer and their addresses.
    Delete {
        id: CustomerId,
        #[arg(long)]
        yes: bool,
    },
    /// Customers with more than one address.
    MultipleAddresses,
    /// Customers with exactly one address.
    SingleAddress,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Matches name, phone or email.
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub pin_code: Option<String>,
    /// first_name, last_name, phone_number or created_at.
    #[arg(long)]
    pub sort_by: Option<SortField>,
    /// ASC or DESC.
    #[arg(long)]
    pub order: Option<SortOrder>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub page_size: Option<u32>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct CustomerFieldArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long = "phone")]
    pub phone_number: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

impl CustomerFieldArgs {
    pub fn entries(&self) -> Vec<(CustomerField, String)> {
        [
            (CustomerField::FirstName, &self.first_name),
            (CustomerField::LastName, &self.last_name),
            (CustomerField::PhoneNumber, &self.phone_number),
            (CustomerField::Email, &self.email),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|v| (field, v)))
        .collect()
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct AddressFieldArgs {
    #[arg(long = "address")]
    pub address_details: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub pin_code: Option<String>,
}

impl AddressFieldArgs {
    pub fn entries(&self) -> Vec<(AddressField, String)> {
        [
            (AddressField::AddressDetails, &self.address_details),
            (AddressField::City, &self.city),
            (AddressField::State, &self.state),
            (AddressField::PinCode, &self.pin_code),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|v| (field, v)))
        .collect()
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnAddressFailure {
    /// Keep the new customer and report it.
    #[default]
    Report,
    /// Delete the new customer again.
    Compensate,
}

impl From<OnAddressFailure> for PartialFailurePolicy {
    fn from(value: OnAddressFailure) -> Self {
        match value {
            OnAddressFailure::Report => PartialFailurePolicy::Report,
            OnAddressFailure::Compensate => PartialFailurePolicy::Compensate,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    #[command(flatten)]
    pub customer: CustomerFieldArgs,
    #[command(flatten)]
    pub address: AddressFieldArgs,
    /// Do not mark the first address as primary.
    #[arg(long)]
    pub not_primary: bool,
    /// What to do when the customer is created but the address is not.
    #[arg(long, value_enum, default_value_t = OnAddressFailure::Report)]
    pub on_address_failure: OnAddressFailure,
    /// Never prompt; fail with the field errors instead.
    #[arg(long)]
    pub no_input: bool,
    /// Save without the review confirmation.
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: CustomerId,
    #[command(flatten)]
    pub customer: CustomerFieldArgs,
    #[arg(long)]
    pub no_input: bool,
    #[arg(long)]
    pub yes: bool,
}

pub(super) async fn run(
    command: CustomerCommand,
    ctx: &mut Context<'_>,
) -> anyhow::Result<CommandOutput> {
    let output = match command {
        CustomerCommand::List(args) => list(args, ctx).await,
        CustomerCommand::Show { id } => match load_customer_detail(ctx.api, id).await {
            Ok(detail) => CommandOutput::Detail(detail),
            Err(err) => Notice::from_gateway(&err, "Failed to load customer data").into(),
        },
        CustomerCommand::Create(args) => create(args, ctx).await,
        CustomerCommand::Edit(args) => edit(args, ctx).await,
        CustomerCommand::Delete { id, yes } => delete(id, yes, ctx).await,
        CustomerCommand::MultipleAddresses => {
            match ctx.api.customers_with_multiple_addresses().await {
                Ok(customers) => CommandOutput::Customers(customers),
                Err(err) => Notice::from_gateway(&err, "Failed to load customers").into(),
            }
        }
        CustomerCommand::SingleAddress => match ctx.api.customers_with_single_address().await {
            Ok(customers) => CommandOutput::Customers(customers),
            Err(err) => Notice::from_gateway(&err, "Failed to load customers").into(),
        },
    };
    Ok(output)
}

async fn list(args: ListArgs, ctx: &mut Context<'_>) -> CommandOutput {
    let mut list =
        CustomerListController::with_page_size(args.page_size.unwrap_or(ctx.settings.page_size));
    for (filter, value) in [
        (ListFilter::Search, args.search),
        (ListFilter::City, args.city),
        (ListFilter::State, args.state),
        (ListFilter::PinCode, args.pin_code),
    ] {
        if let Some(value) = value {
            list.set_filter(filter, value);
        }
    }
    if let Some(field) = args.sort_by {
        list.set_sort_by(field);
    }
    if let Some(order) = args.order {
        list.set_sort_order(order);
    }
    // Last, since filter and sort changes reset the page.
    if let Some(page) = args.page {
        list.set_page(page);
    }

    debug!(query = ?list.query(), "listing customers");
    match list.fetch(ctx.api).await {
        Ok(page) => CommandOutput::CustomerPage(page),
        Err(err) => Notice::from_gateway(&err, "Failed to load customers").into(),
    }
}

async fn create(args: CreateArgs, ctx: &mut Context<'_>) -> CommandOutput {
    let mut prefill = Prefill {
        customer: args.customer.entries(),
        address: args.address.entries(),
    };
    if args.not_primary {
        prefill.address.push((AddressField::IsPrimary, "no".into()));
    }
    let wizard = CustomerWizard::create().with_policy(args.on_address_failure.into());
    submit_wizard(wizard, prefill, args.no_input, args.yes, ctx).await
}

async fn edit(args: EditArgs, ctx: &mut Context<'_>) -> CommandOutput {
    let customer = match ctx.api.get_customer(args.id).await {
        Ok(customer) => customer,
        Err(err) => return Notice::from_gateway(&err, "Failed to load customer data").into(),
    };
    let wizard = CustomerWizard::edit(args.id, CustomerDraft::from(&customer));
    let prefill = Prefill {
        customer: args.customer.entries(),
        address: Vec::new(),
    };
    submit_wizard(wizard, prefill, args.no_input, args.yes, ctx).await
}

async fn submit_wizard(
    mut wizard: CustomerWizard,
    prefill: Prefill,
    no_input: bool,
    yes: bool,
    ctx: &mut Context<'_>,
) -> CommandOutput {
    let mut prefill = Some(prefill);
    loop {
        // Flag values only seed the first pass; later passes keep operator edits.
        let seed = prefill.take().unwrap_or_default();
        if no_input {
            if let Err(errors) = complete_without_prompts(&mut wizard, &seed) {
                return Notice::error(errors).into();
            }
        } else if run_wizard(&mut wizard, &seed, &mut *ctx.prompter, yes) == FlowOutcome::Cancelled {
            return cancelled();
        }

        match wizard.submit(ctx.api).await {
            Ok(outcome) => return Notice::from_submitted(outcome).into(),
            Err(SubmitError::Invalid) if !no_input => continue,
            Err(err) => return Notice::from_submit(&err).into(),
        }
    }
}

async fn delete(id: CustomerId, yes: bool, ctx: &mut Context<'_>) -> CommandOutput {
    if !yes
        && !ctx
            .prompter
            .confirm_action(&format!("Delete customer {id} and all of their addresses?"))
    {
        return cancelled();
    }
    match ctx.api.delete_customer(id).await {
        Ok(()) => Notice::success("Customer deleted successfully").into(),
        Err(err) => Notice::from_gateway(&err, "Failed to delete customer").into(),
    }
}
