//! Statbot CLI binary.
//!
//! This binary runs the bot:
//! - On Discord (`run`, requires the `discord` feature)
//! - Against stdin and stdout (`console`)
//! - Or just loads and validates its configuration (`check-config`)

use clap::Parser;
use statbot::BotConfig;
use statbot::observability::{ObservabilityConfig, init_observability_with_config, shutdown_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, check_config, run_bot, run_console};

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    init_observability_with_config(
        ObservabilityConfig::new("statbot")
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs),
    )?;

    let config = BotConfig::load(cli.config.as_deref())?;

    // Execute the requested command
    let result = match cli.command {
        Commands::Run => run_bot(config).await,
        Commands::Console { guild, admin } => run_console(config, guild, admin).await,
        Commands::CheckConfig => check_config(config).await,
    };

    shutdown_observability();
    result?;
    Ok(())
}
