//! Configuration check command handler.

use statbot::{
    BotConfig, ConsoleGateway, InMemoryConfigStore, StatbotApp, StatbotResult,
    UnconfiguredStatsApi,
};
use std::sync::Arc;

/// Build the bot against throwaway collaborators and print what it would serve.
pub async fn check_config(config: BotConfig) -> StatbotResult<()> {
    let store = if config.database_url.is_some() {
        "postgres"
    } else {
        "memory"
    };
    let app = StatbotApp::build(
        config,
        Arc::new(InMemoryConfigStore::new()),
        Arc::new(ConsoleGateway::new()),
        Arc::new(UnconfiguredStatsApi),
    )
    .await?;

    let bot = &app.config().bot;
    println!("Configuration OK");
    println!("  default prefix:      {}", bot.default_prefix);
    println!("  global help token:   {}", bot.global_help_token);
    println!("  administrator level: {}", bot.administrator_level);
    println!("  guild config store:  {}", store);
    println!();
    println!("Commands:");
    for descriptor in app.registry().descriptors() {
        let mut flags = Vec::new();
        if !*descriptor.enabled() {
            flags.push("disabled".to_string());
        }
        if *descriptor.group_only() {
            flags.push("group only".to_string());
        }
        if *descriptor.required_level() > statbot::PermissionLevel::BASE {
            flags.push(format!("level {}", descriptor.required_level()));
        }
        let aliases: Vec<&str> = descriptor.aliases().iter().map(String::as_str).collect();
        println!(
            "  {:<12} {:<20} {}",
            descriptor.name(),
            aliases.join(", "),
            flags.join(", ")
        );
    }

    Ok(())
}
