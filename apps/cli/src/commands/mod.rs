mod addresses;
mod customers;

use clap::Subcommand;
use client_core::{
    detail::CustomerDetail,
    outcome::{Notice, Severity},
    CrmApi,
};
use shared::protocol::{Address, AddressSearchHit, Customer, PageResult};

pub use addresses::AddressCommand;
pub use customers::CustomerCommand;

use crate::{config::Settings, prompt::Prompter, render};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List, inspect and maintain customers.
    #[command(subcommand)]
    Customers(CustomerCommand),
    /// Maintain customer addresses and search by location.
    #[command(subcommand)]
    Addresses(AddressCommand),
}

pub struct Context<'a> {
    pub api: &'a dyn CrmApi,
    pub settings: &'a Settings,
    pub prompter: &'a mut dyn Prompter,
}

/// Result of one command, rendered by the caller.
#[derive(Debug)]
pub enum CommandOutput {
    CustomerPage(PageResult<Customer>),
    Customers(Vec<Customer>),
    Detail(CustomerDetail),
    Addresses(Vec<Address>),
    SearchHits(Vec<AddressSearchHit>),
    Notice(Notice),
}

impl From<Notice> for CommandOutput {
    fn from(notice: Notice) -> Self {
        CommandOutput::Notice(notice)
    }
}

impl CommandOutput {
    pub fn is_failure(&self) -> bool {
        matches!(self, CommandOutput::Notice(notice) if notice.severity != Severity::Success)
    }

    pub fn render(&self, json: bool) -> anyhow::Result<String> {
        if json {
            return match self {
                CommandOutput::CustomerPage(page) => render::json(page),
                CommandOutput::Customers(customers) => render::json(customers),
                CommandOutput::Detail(detail) => render::json(detail),
                CommandOutput::Addresses(addresses) => render::json(addresses),
                CommandOutput::SearchHits(hits) => render::json(hits),
                CommandOutput::Notice(notice) => render::json(notice),
            };
        }
        Ok(match self {
            CommandOutput::CustomerPage(page) => render::customer_page(page),
            CommandOutput::Customers(customers) => render::customers(customers),
            CommandOutput::Detail(detail) => render::customer_detail(detail),
            CommandOutput::Addresses(addresses) => render::addresses(addresses),
            CommandOutput::SearchHits(hits) => render::search_hits(hits),
            CommandOutput::Notice(notice) => render::notice(notice),
        })
    }
}

pub async fn dispatch(command: Command, ctx: &mut Context<'_>) -> anyhow::Result<CommandOutput> {
    match command {
        Command::Customers(command) => customers::run(command, ctx).await,
        Command::Addresses(command) => addresses::run(command, ctx).await,
    }
}

fn cancelled() -> CommandOutput {
    Notice::warning("Cancelled. Nothing was saved.").into()
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
