mod commands;
mod config;
mod prompt;
mod render;
mod wizard_flow;

use std::{
    io::{self, IsTerminal},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context as _;
use clap::Parser;
use client_core::HttpCrmClient;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{
    commands::{Command, Context},
    config::load_settings,
    prompt::{DialoguerPrompter, NoInput, Prompter},
};

#[derive(Parser, Debug)]
#[command(name = "crm", version, about = "Customers and addresses on the CRM API")]
struct Cli {
    /// Base URL of the CRM API, e.g. http://localhost:5000/api
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Settings file; defaults to ./crm.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log requests and responses to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(cli.config.as_deref(), cli.api_url.as_deref())?;
    debug!(api = %settings.api_base_url, page_size = settings.page_size, "settings loaded");
    let api = HttpCrmClient::with_timeout(&settings.api_base_url, settings.request_timeout())
        .context("failed to build http client")?;

    let mut prompter: Box<dyn Prompter> = if io::stdin().is_terminal() {
        Box::new(DialoguerPrompter::new())
    } else {
        debug!("stdin is not a terminal, prompts are disabled");
        Box::new(NoInput)
    };
    let mut ctx = Context {
        api: &api,
        settings: &settings,
        prompter: prompter.as_mut(),
    };
    let output = commands::dispatch(cli.command, &mut ctx).await?;

    let rendered = output.render(cli.json)?;
    if output.is_failure() {
        eprintln!("{}", rendered.trim_end());
        return Ok(ExitCode::FAILURE);
    }
    println!("{}", rendered.trim_end());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
