use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Service-account key material, loaded once at startup and read-only
/// afterwards. The same JSON document also carries the gateway's dataset
/// and table ids, so unknown keys are ignored.
#[derive(Clone)]
pub struct Credentials {
    raw: Arc<str>,
    client_email: String,
    project_id: Option<String>,
}

#[derive(Deserialize)]
struct KeyFields {
    #[serde(rename = "type")]
    key_type: Option<String>,
    client_email: Option<String>,
    private_key: Option<String>,
    project_id: Option<String>,
}

impl Credentials {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "cannot read credentials");
        })?;
        let creds = Self::from_json(raw)?;
        info!(client_email = %creds.client_email, "loaded service account credentials");
        Ok(creds)
    }

    pub fn from_json(raw: impl Into<String>) -> Result<Self> {
        let raw: String = raw.into();
        let fields: KeyFields = serde_json::from_str(&raw)?;

        if let Some(key_type) = fields.key_type.as_deref() {
            if key_type != "service_account" {
                return Err(Error::Config(format!(
                    "unsupported credential type `{}`",
                    key_type
                )));
            }
        }
        let client_email = fields
            .client_email
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Config("client_email is required".to_string()))?;
        if fields.private_key.as_deref().map_or(true, str::is_empty) {
            return Err(Error::Config("private_key is required".to_string()));
        }

        Ok(Self {
            raw: raw.into(),
            client_email,
            project_id: fields.project_id,
        })
    }

    /// The full key document, as handed to the BigQuery authenticator
    pub fn key_json(&self) -> &str {
        &self.raw
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}
