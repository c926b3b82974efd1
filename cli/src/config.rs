use anyhow::{Context, Result, anyhow};
use platform_db::DatabaseSettings;
use platform_obs::ObsConfig;

const DEFAULT_ADMIN_EMAIL: &str = "admin@hrd.local";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub obs: ObsConfig,
    pub admin_email: String,
    admin_password: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database =
            DatabaseSettings::from_lookup(&lookup).context("invalid database settings")?;
        let mut obs = ObsConfig::for_service("hrd-cli").resolve_with(&lookup);
        obs.json = lookup("HRD_LOG_FORMAT")
            .map(|format| format.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let admin_email = lookup("HRD_ADMIN_EMAIL")
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string());
        let admin_password = lookup("HRD_ADMIN_PASSWORD").filter(|pw| !pw.is_empty());

        Ok(Self {
            database,
            obs,
            admin_email,
            admin_password,
        })
    }

    /// Only `seed` needs it, so a missing password is an error there and nowhere else.
    pub fn admin_password(&self) -> Result<&str> {
        self.admin_password
            .as_deref()
            .ok_or_else(|| anyhow!("missing env HRD_ADMIN_PASSWORD"))
    }
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
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.admin_email, DEFAULT_ADMIN_EMAIL);
        assert!(config.admin_password().is_err());
        assert!(!config.obs.json);
        assert_eq!(config.obs.service_name, "hrd-cli");
    }

    #[test]
    fn reads_admin_and_logging_keys() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("HRD_ADMIN_EMAIL", " ops@example.com "),
            ("HRD_ADMIN_PASSWORD", "s3cret!"),
            ("HRD_LOG", "debug"),
            ("HRD_LOG_FORMAT", "JSON"),
            ("OTLP_ENDPOINT", "http://collector:4318/v1/traces"),
        ]))
        .unwrap();
        assert_eq!(config.admin_email, "ops@example.com");
        assert_eq!(config.admin_password().unwrap(), "s3cret!");
        assert_eq!(config.database.database_url().unwrap(), "sqlite::memory:");
        assert_eq!(config.obs.filter_directives(), "debug");
        assert!(config.obs.json);
        assert_eq!(
            config.obs.otlp_endpoint.as_deref(),
            Some("http://collector:4318/v1/traces")
        );
    }

    #[test]
    fn bad_pool_size_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_MAX_CONNECTIONS", "lots")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("DATABASE_MAX_CONNECTIONS"));
    }
}
