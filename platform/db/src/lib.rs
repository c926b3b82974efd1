//! Database settings and connection bootstrap.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Shared connection pool alias.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (set {0})")]
    MissingUrl(String),
    #[error("invalid value {value:?} for {key}")]
    InvalidSetting { key: &'static str, value: String },
    #[error(transparent)]
    Connect(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven connection settings.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_url_key")]
    env_key: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_url_key() -> String {
    "DATABASE_URL".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    8
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            env_key: default_url_key(),
            url: None,
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
            sqlx_logging: false,
        }
    }
}

impl DatabaseSettings {
    pub fn new(env_key: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
            ..Self::default()
        }
    }

    /// Settings pinned to an explicit url, ignoring the environment.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn from_env() -> DbResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `DATABASE_MAX_CONNECTIONS` and `DATABASE_SQLX_LOGGING` through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> DbResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(raw) = lookup("DATABASE_MAX_CONNECTIONS") {
            settings.max_connections = raw.trim().parse().map_err(|_| DbError::InvalidSetting {
                key: "DATABASE_MAX_CONNECTIONS",
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup("DATABASE_SQLX_LOGGING") {
            settings.sqlx_logging = matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        settings.url = lookup(&settings.env_key);
        Ok(settings)
    }

    pub fn database_url(&self) -> DbResult<String> {
        match &self.url {
            Some(url) => Ok(url.clone()),
            None => std::env::var(&self.env_key)
                .map_err(|_| DbError::MissingUrl(self.env_key.clone())),
        }
    }
}

pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let url = settings.database_url()?;
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(settings.max_connections)
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .sqlx_logging(settings.sqlx_logging);
    let pool = Database::connect(options).await?;
    info!(backend = ?pool.get_database_backend(), "database connected");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_url_and_pool_size_from_lookup() {
        let settings = DatabaseSettings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://hr@localhost/hr"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("DATABASE_SQLX_LOGGING", "true"),
        ]))
        .unwrap();
        assert_eq!(settings.database_url().unwrap(), "postgres://hr@localhost/hr");
        assert_eq!(settings.max_connections, 4);
        assert!(settings.sqlx_logging);
    }

    #[test]
    fn rejects_non_numeric_pool_size() {
        let err = DatabaseSettings::from_lookup(lookup(&[("DATABASE_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::InvalidSetting { key: "DATABASE_MAX_CONNECTIONS", .. }
        ));
    }

    #[test]
    fn missing_url_names_the_variable() {
        let settings = DatabaseSettings::new("HRD_TEST_URL_THAT_IS_NEVER_SET");
        let err = settings.database_url().unwrap_err();
        assert_eq!(
            err.to_string(),
            "database url missing (set HRD_TEST_URL_THAT_IS_NEVER_SET)"
        );
    }

    #[tokio::test]
    async fn connects_to_in_memory_sqlite() {
        let pool = connect(&DatabaseSettings::with_url("sqlite::memory:"))
            .await
            .unwrap();
        assert_eq!(pool.get_database_backend(), sea_orm::DatabaseBackend::Sqlite);
    }
}
