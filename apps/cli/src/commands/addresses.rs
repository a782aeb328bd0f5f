use clap::{Args, Subcommand};
use client_core::{
    address_editor::{AddressEditor, AddressSaveError},
    address_search::{AddressSearchController, SearchField},
    outcome::Notice,
    validation::AddressField,
};
use shared::domain::{AddressId, CustomerId};

use super::{cancelled, customers::AddressFieldArgs, CommandOutput, Context};
use crate::wizard_flow::{run_address_editor, FlowOutcome};

#[derive(Subcommand, Debug)]
pub enum AddressCommand {
    /// List a customer's addresses.
    List { customer_id: CustomerId },
    /// Add an address to an existing customer.
    Add(AddArgs),
    /// Change one of a customer's addresses.
    Edit(EditArgs),
    /// Delete an address.
    Delete {
        address_id: AddressId,
        #[arg(long)]
        yes: bool,
    },
    /// Find addresses by city, state or PIN code.
    Search(SearchArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    pub customer_id: CustomerId,
    #[command(flatten)]
    pub address: AddressFieldArgs,
    /// Mark the new address as primary.
    #[arg(long)]
    pub primary: bool,
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub customer_id: CustomerId,
    pub address_id: AddressId,
    #[command(flatten)]
    pub address: AddressFieldArgs,
    #[arg(long)]
    pub primary: Option<bool>,
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub pin_code: Option<String>,
}

pub(super) async fn run(
    command: AddressCommand,
    ctx: &mut Context<'_>,
) -> anyhow::Result<CommandOutput> {
    let output = match command {
        AddressCommand::List { customer_id } => match ctx.api.list_addresses(customer_id).await {
            Ok(addresses) => CommandOutput::Addresses(addresses),
            Err(err) => Notice::from_gateway(&err, "Failed to load customer data").into(),
        },
        AddressCommand::Add(args) => add(args, ctx).await,
        AddressCommand::Edit(args) => edit(args, ctx).await,
        AddressCommand::Delete { address_id, yes } => delete(address_id, yes, ctx).await,
        AddressCommand::Search(args) => search(args, ctx).await,
    };
    Ok(output)
}

fn prefill(editor: &mut AddressEditor, fields: &[(AddressField, String)]) -> Result<(), String> {
    for (field, value) in fields {
        editor
            .set_field(*field, value.as_str())
            .map_err(|err| err.to_string())?;
    }
    Ok(())
}

async fn save(editor: &mut AddressEditor, no_input: bool, ctx: &mut Context<'_>) -> CommandOutput {
    if !no_input && run_address_editor(editor, &mut *ctx.prompter) == FlowOutcome::Cancelled {
        return cancelled();
    }
    match editor.submit(ctx.api).await {
        Ok(saved) => Notice::from_address_saved(saved).into(),
        Err(AddressSaveError::Invalid) => Notice::error(editor.form().errors().to_string()).into(),
        Err(err) => Notice::from_address_error(&err).into(),
    }
}

async fn add(args: AddArgs, ctx: &mut Context<'_>) -> CommandOutput {
    let mut editor = AddressEditor::add(args.customer_id);
    let mut fields = args.address.entries();
    if args.primary {
        fields.push((AddressField::IsPrimary, "yes".into()));
    }
    if let Err(problem) = prefill(&mut editor, &fields) {
        return Notice::error(problem).into();
    }
    save(&mut editor, args.no_input, ctx).await
}

async fn edit(args: EditArgs, ctx: &mut Context<'_>) -> CommandOutput {
    let addresses = match ctx.api.list_addresses(args.customer_id).await {
        Ok(addresses) => addresses,
        Err(err) => return Notice::from_gateway(&err, "Failed to load customer data").into(),
    };
    let Some(address) = addresses.iter().find(|a| a.id == args.address_id) else {
        return Notice::error(format!(
            "Address {} does not belong to customer {}",
            args.address_id, args.customer_id
        ))
        .into();
    };

    let mut editor = AddressEditor::edit(args.customer_id, address);
    let mut fields = args.address.entries();
    if let Some(primary) = args.primary {
        fields.push((AddressField::IsPrimary, primary.to_string()));
    }
    if let Err(problem) = prefill(&mut editor, &fields) {
        return Notice::error(problem).into();
    }
    save(&mut editor, args.no_input, ctx).await
}

async fn delete(address_id: AddressId, yes: bool, ctx: &mut Context<'_>) -> CommandOutput {
    if !yes && !ctx
        .prompter
        .confirm_action(&format!("Delete address {address_id}?"))
    {
        return cancelled();
    }
    match ctx.api.delete_address(address_id).await {
        Ok(()) => Notice::success("Address deleted successfully").into(),
        Err(err) => Notice::from_gateway(&err, "Failed to delete address").into(),
    }
}

async fn search(args: SearchArgs, ctx: &mut Context<'_>) -> CommandOutput {
    let mut search = AddressSearchController::new();
    for (field, value) in [
        (SearchField::City, args.city),
        (SearchField::State, args.state),
        (SearchField::PinCode, args.pin_code),
    ] {
        if let Some(value) = value {
            search.set_field(field, value);
        }
    }
    match search.search(ctx.api).await {
        Ok(hits) => CommandOutput::SearchHits(hits.to_vec()),
        Err(err) => Notice::from_search(&err).into(),
    }
}
