//! Shared fixtures for the cross-crate HR tests.

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, connect};
use products_hr::{ApiResult, PasswordHasher};
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};
use url::Url;
use uuid::Uuid;

/// Reversible hasher so tests can assert on stored hashes.
pub struct TestHasher;

impl PasswordHasher for TestHasher {
    fn hash(&self, password: &str) -> ApiResult<String> {
        Ok(format!("test${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> ApiResult<bool> {
        Ok(hash.strip_prefix("test$") == Some(password))
    }
}

/// Fresh in-memory SQLite with foreign keys enforced and every migration applied.
pub async fn sqlite() -> Result<DbPool> {
    // Every pooled connection to `:memory:` would open its own database.
    let mut settings = DatabaseSettings::with_url("sqlite::memory:");
    settings.max_connections = 1;
    let pool = connect(&settings).await?;
    pool.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;",
    ))
    .await?;
    Migrator::up(&pool, None).await?;
    Ok(pool)
}

/// A throwaway Postgres database created next to `TEST_DATABASE_URL`.
pub struct PgTestContext {
    pub db: DbPool,
    admin_url: String,
    db_name: String,
}

impl PgTestContext {
    /// `None` when `TEST_DATABASE_URL` is unset, so callers can skip.
    pub async fn new() -> Result<Option<Self>> {
        let Ok(base) = std::env::var("TEST_DATABASE_URL") else {
            return Ok(None);
        };
        let (admin_url, db_name, test_url) =
            build_urls(&base).context("TEST_DATABASE_URL is not a valid url")?;
        let admin = Database::connect(&admin_url).await?;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("CREATE DATABASE \"{db_name}\";"),
            ))
            .await?;
        let db = connect(&DatabaseSettings::with_url(test_url)).await?;
        Migrator::up(&db, None).await?;
        Ok(Some(Self {
            db,
            admin_url,
            db_name,
        }))
    }

    pub async fn cleanup(self) {
        let Self {
            db,
            admin_url,
            db_name,
        } = self;
        drop(db);
        if let Ok(admin) = Database::connect(&admin_url).await {
            let drop_sql = format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE);");
            let _ = admin
                .execute(Statement::from_string(DatabaseBackend::Postgres, drop_sql))
                .await;
        }
    }
}

fn build_urls(base: &str) -> Option<(String, String, String)> {
    let url = Url::parse(base).ok()?;
    let db_path = url.path().trim_start_matches('/').to_string();
    let base_name = if db_path.is_empty() {
        "hrd_test".to_string()
    } else {
        db_path
    };
    let db_name = format!("{}_{}", base_name, Uuid::new_v4().simple());
    let mut admin_url = url.clone();
    admin_url.set_path("/postgres");
    let mut test_url = url;
    test_url.set_path(&format!("/{db_name}"));
    Some((admin_url.to_string(), db_name, test_url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_gets_a_unique_name() {
        let (admin, name, test) = build_urls("postgres://hr:pw@localhost:5432/hr").unwrap();
        assert_eq!(admin, "postgres://hr:pw@localhost:5432/postgres");
        assert!(name.starts_with("hr_"));
        assert!(test.ends_with(&format!("/{name}")));
    }
}
