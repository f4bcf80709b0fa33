//! The analytical query path: catalog, pool, executor

use crate::normalize::QueryOutcome;
use async_trait::async_trait;
use termlens_db::{ClientManager, ClientPool, QueryExecutor, WarehouseClient, WorkerId};
use termlens_query::{Catalog, Template, TemplateInput};
use tracing::instrument;

#[async_trait]
pub trait Analytics: Send + Sync {
    /// Render, acquire the worker's client and execute. Every error ends up
    /// in the outcome; nothing escapes as a panic or a separate error type.
    async fn run(&self, template: Template, input: TemplateInput, worker: WorkerId) -> QueryOutcome;
}

pub struct AnalyticsGateway<M: ClientManager> {
    catalog: Catalog,
    pool: ClientPool<M>,
    executor: QueryExecutor,
}

impl<M> AnalyticsGateway<M>
where
    M: ClientManager,
    M::Client: WarehouseClient,
{
    pub fn new(catalog: Catalog, pool: ClientPool<M>) -> Self {
        Self {
            catalog,
            pool,
            executor: QueryExecutor::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pool(&self) -> &ClientPool<M> {
        &self.pool
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    #[instrument(skip_all, fields(template = %template, worker = worker.get()))]
    pub async fn execute(&self, template: Template, input: &TemplateInput, worker: WorkerId) -> QueryOutcome {
        let spec = self.catalog.render(template, input)?;
        let client = self.pool.acquire(worker).await?;
        self.executor
            .execute(&spec, template.columns(), &*client)
            .await
    }
}

#[async_trait]
impl<M> Analytics for AnalyticsGateway<M>
where
    M: ClientManager,
    M::Client: WarehouseClient,
{
    async fn run(&self, template: Template, input: TemplateInput, worker: WorkerId) -> QueryOutcome {
        self.execute(template, &input, worker).await
    }
}
