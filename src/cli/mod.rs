pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::types::TodoFilter;

pub const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Todo CLI - Command-line client for the todo API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "TODO_API_URL", help = "API base URL (defaults to the saved session, then http://localhost:3000)")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create an account and start a session")]
    Register {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, env = "TODO_PASSWORD", hide_env_values = true, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Login and save the session token")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, env = "TODO_PASSWORD", hide_env_values = true, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the saved session")]
    Logout,

    #[command(about = "Show current session")]
    Status,

    #[command(about = "List todos")]
    List {
        #[arg(long, default_value = "all", help = "all, active or completed")]
        filter: TodoFilter,
    },

    #[command(about = "Add a todo")]
    Add {
        #[arg(help = "Todo text")]
        text: String,
    },

    #[command(about = "Mark a todo as completed")]
    Done {
        #[arg(help = "Todo ID")]
        id: i64,
    },

    #[command(about = "Mark a todo as active again")]
    Undo {
        #[arg(help = "Todo ID")]
        id: i64,
    },

    #[command(about = "Replace the text of a todo")]
    Edit {
        #[arg(help = "Todo ID")]
        id: i64,
        #[arg(help = "New text")]
        text: String,
    },

    #[command(about = "Delete a todo")]
    Rm {
        #[arg(help = "Todo ID")]
        id: i64,
    },

    #[command(about = "Check server health")]
    Health,
}

impl Commands {
    /// Verb used in "Failed to <action>" messages
    pub fn action(&self) -> &'static str {
        match self {
            Commands::Register { .. } => "register",
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Status => "read session",
            Commands::List { .. } => "fetch todos",
            Commands::Add { .. } => "create todo",
            Commands::Done { .. } | Commands::Undo { .. } | Commands::Edit { .. } => "update todo",
            Commands::Rm { .. } => "delete todo",
            Commands::Health => "check health",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let action = cli.command.action();
    let server = cli.server;

    let result = match cli.command {
        Commands::Register { email, password } => {
            commands::auth::register(server, email, password, output_format).await
        }
        Commands::Login { email, password } => {
            commands::auth::login(server, email, password, output_format).await
        }
        Commands::Logout => commands::auth::logout(output_format),
        Commands::Status => commands::auth::status(server, output_format),
        Commands::List { filter } => commands::todos::list(server, filter, output_format).await,
        Commands::Add { text } => commands::todos::add(server, text, output_format).await,
        Commands::Done { id } => commands::todos::set_completed(server, id, true, output_format).await,
        Commands::Undo { id } => commands::todos::set_completed(server, id, false, output_format).await,
        Commands::Edit { id, text } => commands::todos::edit(server, id, text, output_format).await,
        Commands::Rm { id } => commands::todos::remove(server, id, output_format).await,
        Commands::Health => commands::server::health(server, output_format).await,
    };

    result.map_err(|e| anyhow::anyhow!("Failed to {}: {}", action, e))
}
