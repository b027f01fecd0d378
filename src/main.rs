mod cache;
mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod form;
mod infra;
mod services;
mod store;
#[cfg(test)]
mod testing;
mod view;
mod workflow;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::board::{self as board_cmd, BoardArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::ticket::{self as ticket_cmd, TicketArgs};
use crate::cmd::users as users_cmd;
use crate::config::AppConfig;
use crate::context::{AppContext, Session};
use crate::error::AppResult;
use crate::infra::console::ConsoleNotifier;
use crate::infra::http::HttpTicketApi;
use crate::store::BoardStore;

#[derive(Parser)]
#[command(name = "desk", author, version, about = "Ticket and task board client")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create project or support tickets.
    Ticket(TicketArgs),
    /// Show the task board or move a task between columns.
    Board(BoardArgs),
    /// List users that tickets can be assigned to.
    Users,
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("desk={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands) -> AppResult<bool> {
    match command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            Ok(true)
        }
        Commands::Ticket(args) => ticket_cmd::run(&build_context()?, args.command).await,
        Commands::Board(args) => board_cmd::run(&build_context()?, args.command).await,
        Commands::Users => users_cmd::run(&build_context()?).await,
    }
}

fn build_context() -> AppResult<AppContext> {
    let config = AppConfig::load()?;

    if config.api_base_url.is_none() {
        eprintln!(
            "Warning: API base URL not configured; run `desk config init` or set {}.",
            config::ENV_API_URL
        );
    }
    if config.api_token.is_none() {
        eprintln!(
            "Warning: API token not configured; requests will be refused. Set {}.",
            config::ENV_TOKEN
        );
    }

    let session = Session::new(config.api_token.clone());
    let api = Arc::new(HttpTicketApi::new(config.api_base_url.clone()));

    Ok(AppContext::new(
        config,
        session,
        api,
        Arc::new(ConsoleNotifier),
        Arc::new(BoardStore::new()),
    ))
}
