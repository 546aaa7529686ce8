//! Application configuration
//!
//! Values come from the environment, after loading a `.env` file if one is
//! present:
//! 1. `DATABASE_URL` (default `sqlite://scenarios.db?mode=rwc`)
//! 2. `BIND_ADDRESS` (default `0.0.0.0:3000`)
//! 3. `DATABASE_MAX_CONNECTIONS` (default `5`)

use sqlx::sqlite::SqliteConnectOptions;
use std::env;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "sqlite://scenarios.db?mode=rwc";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid DATABASE_URL `{url}`: {source}")]
    DatabaseUrl { url: String, source: sqlx::Error },
    #[error("DATABASE_MAX_CONNECTIONS must be a positive integer, got `{0}`")]
    MaxConnections(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => return Err(ConfigError::MaxConnections(raw)),
            },
            None => defaults.max_connections,
        };

        let config = AppConfig {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            max_connections,
        };
        config.connect_options()?;
        Ok(config)
    }

    /// Connection options with foreign key enforcement switched on.
    pub fn connect_options(&self) -> Result<SqliteConnectOptions, ConfigError> {
        SqliteConnectOptions::from_str(&self.database_url)
            .map(|options| options.foreign_keys(true))
            .map_err(|source| ConfigError::DatabaseUrl {
                url: self.database_url.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.max_connections, 2);
    }

    #[test]
    fn test_rejects_bad_max_connections() {
        let result = AppConfig::from_lookup(lookup_from(&[("DATABASE_MAX_CONNECTIONS", "zero")]));
        assert!(matches!(result, Err(ConfigError::MaxConnections(_))));

        let result = AppConfig::from_lookup(lookup_from(&[("DATABASE_MAX_CONNECTIONS", "0")]));
        assert!(matches!(result, Err(ConfigError::MaxConnections(_))));
    }

    #[test]
    fn test_rejects_unparsable_url() {
        let result =
            AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite://app.db?mode=bogus")]));
        assert!(matches!(result, Err(ConfigError::DatabaseUrl { .. })));
    }
}
