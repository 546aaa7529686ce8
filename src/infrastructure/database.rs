//! Pooled SQLite connection

use crate::config::AppConfig;
use crate::infrastructure::error::StoreError;
use log::info;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

/// Store handle shared by every service.
///
/// Only obtainable already migrated, through [`DatabaseConnection::connect`]
/// or [`DatabaseConnection::in_memory`]. The composition root registers the
/// instance with the DI container and closes it on shutdown.
pub struct DatabaseConnection {
    connection: SqlitePool,
}

impl DatabaseConnection {
    /// Opens the configured database and brings the schema up to date.
    pub async fn connect(config: &AppConfig) -> Result<DatabaseConnection, StoreError> {
        let options = config.connect_options()?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let database = DatabaseConnection { connection: pool };
        database.migrate().await?;
        Ok(database)
    }

    /// A fresh, migrated in-memory database.
    ///
    /// Uses a single connection that never expires: every SQLite `:memory:`
    /// connection is its own database.
    pub async fn in_memory() -> Result<DatabaseConnection, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let database = DatabaseConnection { connection: pool };
        database.migrate().await?;
        Ok(database)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!().run(&self.connection).await?;
        info!("database schema is up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.connection
    }
}

impl Deref for DatabaseConnection {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}

impl DerefMut for DatabaseConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.connection
    }
}
