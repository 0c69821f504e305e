//! PostgreSQL configuration store.

use crate::models::{GuildConfigChangeset, GuildConfigRow, NewGuildConfigRow};
use crate::schema::guild_configs;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use statbot_error::{StoreError, StoreErrorKind, StoreResult};
use statbot_interface::{ConfigStore, GuildConfig, GuildConfigUpdate, GuildId};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Open a connection to `database_url`.
pub fn establish_connection(database_url: &str) -> StoreResult<PgConnection> {
    PgConnection::establish(database_url).map_err(StoreError::from)
}

/// PostgreSQL-backed [`ConfigStore`].
///
/// # Example
/// ```no_run
/// use statbot_database::{PostgresConfigStore, establish_connection};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let conn = establish_connection("postgres://localhost/statbot")?;
/// let store = PostgresConfigStore::new(conn);
/// store.run_migrations().await?;
/// # Ok(())
/// # }
/// ```
pub struct PostgresConfigStore {
    /// Database connection wrapped in Arc<Mutex> for async access.
    conn: Arc<Mutex<PgConnection>>,
}

impl PostgresConfigStore {
    /// Create a store over a single connection.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a store from a shared connection.
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }

    /// Apply any pending schema migrations.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        let mut conn = self.conn.lock().await;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(StoreErrorKind::Query(e.to_string())))?;
        tracing::info!(applied = applied.len(), "Applied guild config migrations");
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for PostgresConfigStore {
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    async fn get_config(&self, guild_id: &GuildId) -> StoreResult<Option<GuildConfig>> {
        let mut conn = self.conn.lock().await;

        let row: Option<GuildConfigRow> = guild_configs::table
            .find(guild_id.as_str())
            .select(GuildConfigRow::as_select())
            .first(&mut *conn)
            .optional()?;

        row.map(GuildConfig::try_from).transpose()
    }

    /// Uses INSERT ... ON CONFLICT to upsert only the supplied columns.
    #[instrument(skip(self, base, update), fields(guild_id = %guild_id))]
    async fn upsert_config(
        &self,
        guild_id: &GuildId,
        base: &GuildConfig,
        update: &GuildConfigUpdate,
    ) -> StoreResult<()> {
        let mut initial = base.clone();
        initial.apply(update);
        let new_row = NewGuildConfigRow::from(&initial);
        let changes = GuildConfigChangeset::from(update);

        let mut conn = self.conn.lock().await;

        diesel::insert_into(guild_configs::table)
            .values(&new_row)
            .on_conflict(guild_configs::guild_id)
            .do_update()
            .set((changes, guild_configs::updated_at.eq(diesel::dsl::now)))
            .execute(&mut *conn)?;

        tracing::debug!("Upserted guild config row");
        Ok(())
    }
}
