mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod view;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::ticket::{self, CommentArgs, EditArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::http::HelpdeskApi;
use crate::infra::realtime::RealtimeChannel;
use crate::services::{DisabledNotifier, NotificationService};

#[derive(Parser)]
#[command(name = "helpdesk", author, version, about = "Helpdesk ticket client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Remote(RemoteCommand),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

/// Commands that talk to the helpdesk server.
#[derive(Subcommand)]
enum RemoteCommand {
    /// Show tickets with their comment threads, one after another.
    Show {
        /// Ticket identifiers.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Edit a ticket's fields or assignees and submit the changes.
    Edit(EditArgs),
    /// Add a comment to a ticket.
    Comment(CommentArgs),
    /// List users that tickets can be assigned to.
    Assignees,
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Remote(command) => run_remote(command).await,
    }
}

async fn run_remote(command: RemoteCommand) -> AppResult<()> {
    let config = AppConfig::load()?;
    if config.session_token.is_none() {
        eprintln!("Warning: no session token configured; requests are sent unauthenticated.");
    }
    if config.session.user_id.is_none() {
        eprintln!("Warning: current user unknown; ticket fields will be read-only.");
    }

    let api = Arc::new(HelpdeskApi::new(
        &config.api_base_url,
        config.session_token.clone(),
    )?);
    let realtime = match &config.realtime_url {
        Some(url) => Some(Arc::new(RealtimeChannel::connect(url)?)),
        None => None,
    };
    let notifier: Arc<dyn NotificationService> = match &realtime {
        Some(channel) => channel.clone() as Arc<dyn NotificationService>,
        None => Arc::new(DisabledNotifier),
    };

    let context = AppContext::new(config, api.clone(), api, notifier);
    let result = dispatch(&context, command).await;

    if let Some(channel) = realtime {
        channel.disconnect().await;
    }
    result
}

async fn dispatch(ctx: &AppContext, command: RemoteCommand) -> AppResult<()> {
    match command {
        RemoteCommand::Show { ids } => ticket::show(ctx, ids).await,
        RemoteCommand::Edit(args) => ticket::edit(ctx, args).await,
        RemoteCommand::Comment(args) => ticket::comment(ctx, args).await,
        RemoteCommand::Assignees => cmd::assignees::run(ctx).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn parses_remote_and_config_commands() {
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from(["helpdesk", "show", "t-1", "t-2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Remote(RemoteCommand::Show { ref ids }) if ids == &["t-1", "t-2"]
        ));

        let cli = Cli::try_parse_from(["helpdesk", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(_)));

        assert!(Cli::try_parse_from(["helpdesk", "show"]).is_err());
    }
}
