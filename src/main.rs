use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use deskbox::commands::{
    cmd_config_get, cmd_config_set, cmd_config_show, cmd_inbox, cmd_ls, cmd_peek, cmd_select,
    cmd_show, cmd_transition,
};
use deskbox::lifecycle::Transition;
use deskbox::types::VALID_STATUSES;

#[derive(Parser)]
#[command(name = "deskbox")]
#[command(about = "Terminal client for a support-ticket inbox")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tickets
    #[command(visible_alias = "l")]
    Ls {
        /// Filter by status
        #[arg(long, value_parser = parse_status)]
        status: Option<String>,

        /// Include tickets owned by other agents
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display a ticket
    #[command(visible_alias = "s")]
    Show {
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Take ownership of a pending ticket and open it
    Accept {
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Close a ticket
    Close {
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reopen a closed ticket
    Reopen {
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a ticket in the detail pane
    Select {
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read a ticket's conversation without accepting it (admin only)
    Peek {
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the inbox
    Inbox {
        /// Filter by status
        #[arg(long, value_parser = parse_status)]
        status: Option<String>,

        /// Highlight this ticket as the one open in the detail pane
        #[arg(long)]
        selected: Option<u64>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Dotted key, e.g. api.base_url or actor.name
        key: String,
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_status(s: &str) -> Result<String, String> {
    let lower = s.to_lowercase();
    if VALID_STATUSES.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(format!(
            "Invalid status. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "deskbox=warn".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ls { status, all, json } => cmd_ls(status.as_deref(), all, json).await,
        Commands::Show { id, json } => cmd_show(id, json).await,

        Commands::Accept { id, json } => cmd_transition(id, Transition::Accept, json).await,
        Commands::Close { id, json } => cmd_transition(id, Transition::Close, json).await,
        Commands::Reopen { id, json } => cmd_transition(id, Transition::Reopen, json).await,
        Commands::Select { id, json } => cmd_select(id, json).await,

        Commands::Peek { id, json } => cmd_peek(id, json).await,
        Commands::Inbox { status, selected } => cmd_inbox(status.as_deref(), selected).await,

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(json),
            ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
            ConfigAction::Get { key, json } => cmd_config_get(&key, json),
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
