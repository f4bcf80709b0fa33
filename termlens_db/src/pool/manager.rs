use super::config::WarehouseConfig;
use super::credentials::Credentials;
use crate::error::Result;
use crate::executor::bigquery::BigQueryHandle;
use gcp_bigquery_client::Client;
use tracing::{debug, instrument};

/// Factory for warehouse clients. The pool calls `create` at most once per
/// worker under normal operation.
#[async_trait::async_trait]
pub trait ClientManager: Send + Sync + 'static {
    type Client: Send + Sync + 'static;

    async fn create(&self) -> Result<Self::Client>;
}

pub struct BigQueryManager {
    credentials: Credentials,
    config: WarehouseConfig,
}

impl BigQueryManager {
    pub fn new(credentials: Credentials, config: WarehouseConfig) -> Self {
        Self {
            credentials,
            config,
        }
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl ClientManager for BigQueryManager {
    type Client = BigQueryHandle;

    #[instrument(skip(self), fields(project = %self.config.project_id))]
    async fn create(&self) -> Result<Self::Client> {
        let key = serde_json::from_str(self.credentials.key_json())?;
        let client = Client::from_service_account_key(key, self.config.readonly).await?;
        debug!(client_email = %self.credentials.client_email(), "authenticated warehouse client");
        Ok(BigQueryHandle::new(client, self.config.project_id.clone()))
    }
}
