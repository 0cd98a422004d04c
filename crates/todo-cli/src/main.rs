//! Todo CLI
//!
//! Command-line and terminal interface for todo. Logged out, todos are
//! kept in the local data directory; logged in, they live on the todo
//! service.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use todo_core::Config;

mod commands;
mod output;
mod prompt;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Todo - a terminal client for your todo list")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - ids only
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Log in to the todo service
    Login {
        #[arg(short, long)]
        email: Option<String>,
        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account and log in
    Register {
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
        /// Password confirmation
        #[arg(short, long)]
        confirm: Option<String>,
    },
    /// Log out (local todos are kept)
    Logout,
    /// Create a todo
    Add {
        /// Title
        title: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List todos
    #[command(alias = "ls")]
    List,
    /// Show a todo
    Show {
        /// Todo ID
        id: i64,
    },
    /// Mark a todo as done
    Done {
        /// Todo ID
        id: i64,
    },
    /// Mark a todo as not done
    Undone {
        /// Todo ID
        id: i64,
    },
    /// Delete a todo
    #[command(alias = "rm")]
    Delete {
        /// Todo ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show status (session, server, storage)
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, api_url, request_timeout_secs, banner_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work even when the config file is broken
    if let Some(Commands::Config { command }) = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    let command = match cli.command {
        Some(Commands::Tui) | None => return tui::run(&config).await,
        Some(command) => command,
    };

    init_cli_logging();

    match command {
        Commands::Login { email, password } => {
            commands::auth::login(&config, email, password, &output).await
        }
        Commands::Register {
            email,
            password,
            confirm,
        } => commands::auth::register(&config, email, password, confirm, &output).await,
        Commands::Logout => commands::auth::logout(&config, &output),
        Commands::Add { title, description } => {
            commands::todo::add(&config, title, description, &output).await
        }
        Commands::List => commands::todo::list(&config, &output).await,
        Commands::Show { id } => commands::todo::show(&config, id, &output).await,
        Commands::Done { id } => commands::todo::set_completed(&config, id, true, &output).await,
        Commands::Undone { id } => {
            commands::todo::set_completed(&config, id, false, &output).await
        }
        Commands::Delete { id, yes } => commands::todo::delete(&config, id, yes, &output).await,
        Commands::Status => commands::status::show(&config, &output).await,
        Commands::Tui | Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Initialize logging for one-shot commands
///
/// Only initializes if TODO_LOG is set; logs go to stderr so stdout stays
/// clean for --json.
fn init_cli_logging() {
    let Ok(log_level) = std::env::var("TODO_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!("todo_core={},todo={}", log_level, log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
