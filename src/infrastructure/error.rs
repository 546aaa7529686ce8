//! Storage errors

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error("unknown column `{column}` on table `{table}`")]
    UnknownColumn {
        table: &'static str,
        column: &'static str,
    },
}
