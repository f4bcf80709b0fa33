//! Process configuration
//!
//! One JSON document supplies the warehouse dataset and table ids, the
//! relational database location and, in the same file, the service-account
//! key used to authenticate against the warehouse.

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use termlens_query::{Catalog, QueryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid table identifier: {0}")]
    Catalog(#[from] QueryError),

    #[error("credentials: {0}")]
    Credentials(#[from] termlens_db::Error),

    #[error("invalid database settings: {0}")]
    Database(#[from] sqlx::Error),

    #[error("missing `{0}`")]
    Missing(&'static str),

    #[error("invalid `{0}`")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Port {
    Number(u16),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub dataset_id: String,
    pub top_terms_id: String,
    pub top_rising_terms_id: String,
    /// Billing project; defaults to the key's `project_id`
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub database_name: Option<String>,
    #[serde(default)]
    pub database_user: Option<String>,
    #[serde(default)]
    pub database_password: Option<String>,
    #[serde(default)]
    pub database_host: Option<String>,
    #[serde(default)]
    pub database_port: Option<Port>,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        Ok(Catalog::new(
            &self.dataset_id,
            &self.top_terms_id,
            &self.top_rising_terms_id,
        )?)
    }

    /// Connection options for the relational store. `database_url` wins over
    /// the discrete keys, of which `database_name` is required.
    pub fn pg_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = self.database_url.as_deref() {
            return Ok(PgConnectOptions::from_str(url)?);
        }

        let name = self
            .database_name
            .as_deref()
            .ok_or(ConfigError::Missing("database_name"))?;
        let mut options = PgConnectOptions::new().database(name);
        if let Some(host) = self.database_host.as_deref() {
            options = options.host(host);
        }
        if let Some(port) = self.port()? {
            options = options.port(port);
        }
        if let Some(user) = self.database_user.as_deref() {
            options = options.username(user);
        }
        if let Some(password) = self.database_password.as_deref() {
            options = options.password(password);
        }
        Ok(options)
    }

    fn port(&self) -> Result<Option<u16>, ConfigError> {
        match &self.database_port {
            None => Ok(None),
            Some(Port::Number(n)) => Ok(Some(*n)),
            Some(Port::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Port::Text(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::Invalid("database_port")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"{
        "type": "service_account",
        "project_id": "trends-project",
        "private_key": "k",
        "client_email": "reader@trends-project.iam.gserviceaccount.com",
        "dataset_id": "google_trends",
        "top_terms_id": "international_top_terms",
        "top_rising_terms_id": "international_top_rising_terms",
        "django-key": "ignored",
        "database_name": "trends",
        "database_user": "app",
        "database_password": "secret",
        "database_host": "db",
        "database_port": "5433"
    }"#;

    #[test]
    fn reads_shared_key_document() {
        let cfg = AppConfig::from_json(CONFIG).unwrap();
        assert_eq!(cfg.dataset_id, "google_trends");
        assert_eq!(cfg.project_id, None);
        assert_eq!(cfg.database_port, Some(Port::Text("5433".into())));

        let spec = cfg.catalog().unwrap().terms_date_bounds().unwrap();
        assert!(spec
            .query_text()
            .contains("`google_trends.international_top_terms`"));
    }

    #[test]
    fn discrete_database_keys() {
        let options = AppConfig::from_json(CONFIG).unwrap().pg_options().unwrap();
        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("trends"));
        assert_eq!(options.get_username(), "app");
    }

    #[test]
    fn database_url_wins() {
        let mut cfg = AppConfig::from_json(CONFIG).unwrap();
        cfg.database_url = Some("postgres://u:p@other:6000/elsewhere".into());
        let options = cfg.pg_options().unwrap();
        assert_eq!(options.get_host(), "other");
        assert_eq!(options.get_database(), Some("elsewhere"));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            AppConfig::from_json(r#"{"dataset_id": "d"}"#),
            Err(ConfigError::Parse(_))
        ));

        let mut cfg = AppConfig::from_json(CONFIG).unwrap();
        cfg.top_terms_id = "t` UNION SELECT".into();
        assert!(matches!(cfg.catalog(), Err(ConfigError::Catalog(_))));

        cfg.database_name = None;
        assert!(matches!(
            cfg.pg_options(),
            Err(ConfigError::Missing("database_name"))
        ));

        assert!(matches!(
            AppConfig::from_file("/nonexistent/config.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
