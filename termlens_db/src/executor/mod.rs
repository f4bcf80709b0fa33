use crate::error::Error;
use serde_json::{Map, Number, Value};
use std::sync::Arc;
use std::time::Instant;
use termlens_query::{AnalyticalQuerySpec, ColumnKind, OutputColumn, QueryError};
use thiserror::Error;
use tracing::{debug, error, instrument};
use utils::metrics::ExecutorMetrics;

pub mod bigquery;
pub mod utils;

/// One result row, keyed by column name in warehouse column order
pub type TermRow = Map<String, Value>;
pub type ResultSet = Vec<TermRow>;

/// Rows as returned by the warehouse, before typing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Any warehouse-side error, reduced to its description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExecutionFailure {
    message: String,
}

impl ExecutionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<Error> for ExecutionFailure {
    fn from(err: Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<QueryError> for ExecutionFailure {
    fn from(err: QueryError) -> Self {
        Self::new(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Run `spec` with its parameters bound by name and wait for the
    /// complete result.
    async fn run(&self, spec: &AnalyticalQuerySpec) -> Result<RawResult, ExecutionFailure>;
}

#[async_trait::async_trait]
impl<T: WarehouseClient + ?Sized> WarehouseClient for Arc<T> {
    async fn run(&self, spec: &AnalyticalQuerySpec) -> Result<RawResult, ExecutionFailure> {
        (**self).run(spec).await
    }
}

/// Runs a spec once against a client and types the rows. No retries and no
/// client-side timeout.
#[derive(Debug, Clone, Default)]
pub struct QueryExecutor {
    metrics: Arc<ExecutorMetrics>,
}

impl QueryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &ExecutorMetrics {
        &self.metrics
    }

    #[instrument(skip_all, fields(params = spec.parameters().len()))]
    pub async fn execute<C>(
        &self,
        spec: &AnalyticalQuerySpec,
        columns: &[OutputColumn],
        client: &C,
    ) -> Result<ResultSet, ExecutionFailure>
    where
        C: WarehouseClient + ?Sized,
    {
        let start = Instant::now();
        match client.run(spec).await {
            Ok(raw) => {
                let elapsed = start.elapsed();
                self.metrics
                    .update_success(elapsed.as_micros() as usize, raw.rows.len());
                debug!(
                    rows = raw.rows.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    avg_us = self.metrics.average_query_duration().unwrap_or_default(),
                    "query completed"
                );
                Ok(into_rows(raw, columns))
            }
            Err(e) => {
                self.metrics.update_failure();
                error!(
                    error = %e,
                    total = self.metrics.total_queries(),
                    success_rate = self.metrics.success_rate(),
                    "query failed"
                );
                Err(e)
            }
        }
    }
}

fn into_rows(raw: RawResult, declared: &[OutputColumn]) -> ResultSet {
    let kinds: Vec<Option<ColumnKind>> = raw
        .columns
        .iter()
        .map(|name| declared.iter().find(|c| c.name == name).map(|c| c.kind))
        .collect();

    raw.rows
        .into_iter()
        .map(|cells| {
            raw.columns
                .iter()
                .zip(&kinds)
                .zip(cells)
                .map(|((name, kind), cell)| (name.clone(), coerce(cell, *kind)))
                .collect()
        })
        .collect()
}

/// BigQuery's REST surface returns every scalar as a string; numeric
/// columns are converted back, anything unparsable is left untouched.
fn coerce(cell: Value, kind: Option<ColumnKind>) -> Value {
    let Value::String(text) = &cell else {
        return cell;
    };
    match kind {
        Some(ColumnKind::Integer) => text
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or(cell),
        Some(ColumnKind::Float) => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(cell),
        _ => cell,
    }
}
