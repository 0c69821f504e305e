//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Statbot - chat bot answering prefixed game-stats commands
#[derive(Parser, Debug)]
#[command(name = "statbot")]
#[command(about = "Chat bot answering prefixed game-stats commands", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file layered over the bundled defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and answer commands
    Run,

    /// Read messages from stdin and print replies
    Console {
        /// Treat lines as messages in this guild instead of a private conversation
        #[arg(long)]
        guild: Option<String>,

        /// Send guild messages as an administrator
        #[arg(long, requires = "guild")]
        admin: bool,
    },

    /// Validate configuration and list the registered commands
    CheckConfig,
}
