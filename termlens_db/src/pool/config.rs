use super::credentials::Credentials;
use crate::error::{Error, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WarehouseConfig {
    /// Project that runs and bills the query jobs.
    pub project_id: String,
    /// Request the read-only BigQuery scope when authenticating.
    ///
    /// _Default:_ `true`.
    #[serde(default = "default_readonly")]
    pub readonly: bool,
}

fn default_readonly() -> bool {
    true
}

impl WarehouseConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            readonly: true,
        }
    }

    /// Use `project_id` when given, otherwise the project named in the
    /// service-account key.
    pub fn resolve(project_id: Option<String>, credentials: &Credentials) -> Result<Self> {
        project_id
            .or_else(|| credentials.project_id().map(str::to_string))
            .filter(|p| !p.is_empty())
            .map(Self::new)
            .ok_or_else(|| {
                Error::Config("project_id missing from config and credentials".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(project: Option<&str>) -> Credentials {
        let project = project
            .map(|p| format!(r#""project_id": "{}","#, p))
            .unwrap_or_default();
        Credentials::from_json(format!(
            r#"{{{} "client_email": "a@b", "private_key": "k"}}"#,
            project
        ))
        .unwrap()
    }

    #[test]
    fn explicit_project_wins() {
        let cfg = WarehouseConfig::resolve(Some("billing".into()), &creds(Some("key"))).unwrap();
        assert_eq!(cfg, WarehouseConfig::new("billing"));
        assert!(cfg.readonly);
    }

    #[test]
    fn falls_back_to_key_project() {
        let cfg = WarehouseConfig::resolve(None, &creds(Some("key"))).unwrap();
        assert_eq!(cfg.project_id, "key");
    }

    #[test]
    fn missing_project_is_an_error() {
        assert!(WarehouseConfig::resolve(None, &creds(None)).is_err());
    }
}
