//! PostgreSQL store tests. Require `DATABASE_URL` and the `postgres` feature.

#![cfg(feature = "postgres")]

use statbot_database::{PostgresConfigStore, establish_connection};
use statbot_interface::{ConfigStore, GameMode, GuildConfig, GuildConfigUpdate, GuildId, StatsDefaults};

async fn store() -> Option<PostgresConfigStore> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").ok()?;
    let store = PostgresConfigStore::new(establish_connection(&url).ok()?);
    store.run_migrations().await.ok()?;
    Some(store)
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL database"]
async fn test_upsert_round_trip() {
    let Some(store) = store().await else {
        return;
    };
    let guild: GuildId = format!("test-{}", std::process::id()).into();
    let base = GuildConfig::new(guild.clone(), "!", StatsDefaults::default());

    store
        .upsert_config(&guild, &base, &GuildConfigUpdate::default())
        .await
        .unwrap();
    let update = GuildConfigUpdate {
        mode: Some(GameMode::Casual),
        ..GuildConfigUpdate::prefix("?p-")
    };
    store.upsert_config(&guild, &base, &update).await.unwrap();

    let stored = store.get_config(&guild).await.unwrap().unwrap();
    assert_eq!(stored.prefix, "?p-");
    assert_eq!(stored.defaults.mode, GameMode::Casual);
}
