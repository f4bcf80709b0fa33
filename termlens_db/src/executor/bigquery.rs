use super::{ExecutionFailure, RawResult, WarehouseClient};
use crate::error::{self, Error};
use gcp_bigquery_client::model::get_query_results_parameters::GetQueryResultsParameters;
use gcp_bigquery_client::model::query_parameter::QueryParameter;
use gcp_bigquery_client::model::query_parameter_type::QueryParameterType;
use gcp_bigquery_client::model::query_parameter_value::QueryParameterValue;
use gcp_bigquery_client::model::query_request::QueryRequest;
use gcp_bigquery_client::model::query_response::ResultSet;
use gcp_bigquery_client::Client;
use serde_json::Value;
use std::future::Future;
use termlens_query::{AnalyticalQuerySpec, QueryParam};
use tracing::{debug, instrument};

/// How long one `jobs.getQueryResults` call may block server-side waiting
/// for a running job.
const POLL_TIMEOUT_MS: i32 = 10_000;

/// An authenticated BigQuery client bound to one billing project.
pub struct BigQueryHandle {
    client: Client,
    project_id: String,
}

impl BigQueryHandle {
    pub fn new(client: Client, project_id: String) -> Self {
        Self { client, project_id }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

#[async_trait::async_trait]
impl WarehouseClient for BigQueryHandle {
    #[instrument(skip_all, fields(project = %self.project_id))]
    async fn run(&self, spec: &AnalyticalQuerySpec) -> Result<RawResult, ExecutionFailure> {
        let request = query_request(spec);
        let first = self
            .client
            .job()
            .query(&self.project_id, request)
            .await
            .map_err(Error::from)?;

        let job = first.query_response().job_reference.clone().unwrap_or_default();
        let job_id = job.job_id;
        let location = job.location;
        let fetch = |page_token: Option<String>| {
            let params = GetQueryResultsParameters {
                page_token,
                location: location.clone(),
                timeout_ms: Some(POLL_TIMEOUT_MS),
                ..Default::default()
            };
            let jobs = self.client.job();
            let project_id = self.project_id.as_str();
            let job_id = job_id.as_deref();
            async move {
                let job_id = job_id
                    .ok_or_else(|| Error::Generic("query response carries no job id".to_string()))?;
                let response = jobs.get_query_results(project_id, job_id, params).await?;
                Ok::<_, Error>(ResultSet::new(response.into()))
            }
        };

        let result = drain(first, fetch).await?;
        debug!(rows = result.rows.len(), "read result set");
        Ok(result)
    }
}

/// Where a query job stands after one response.
#[derive(Debug, PartialEq)]
pub(crate) enum Step {
    Running,
    /// Rows of one page, with the token of the page after it.
    Page(RawResult, Option<String>),
}

/// Follows a job from its first response until the last page has been read.
/// `next` fetches the results again at a page token, `None` meaning the
/// first page.
pub(crate) async fn drain<F, Fut>(mut rs: ResultSet, mut next: F) -> error::Result<RawResult>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = error::Result<ResultSet>>,
{
    let mut columns = None;
    let mut rows = Vec::new();
    let mut page_token = None;
    loop {
        match step(&mut rs)? {
            Step::Running => debug!("job still running"),
            Step::Page(page, token) => {
                if columns.is_none() {
                    columns = Some(page.columns);
                }
                rows.extend(page.rows);
                match token {
                    Some(token) => page_token = Some(token),
                    None => break,
                }
            }
        }
        rs = next(page_token.clone()).await?;
    }

    Ok(RawResult {
        columns: columns.unwrap_or_default(),
        rows,
    })
}

/// Reads the page held by `rs`. Columns come out in schema order and every
/// cell is read by its schema position.
pub(crate) fn step(rs: &mut ResultSet) -> error::Result<Step> {
    let response = rs.query_response();
    if !response.job_complete.unwrap_or(false) {
        return Ok(Step::Running);
    }
    let columns: Vec<String> = response
        .schema
        .as_ref()
        .and_then(|schema| schema.fields.as_ref())
        .ok_or_else(|| Error::Generic("completed query returned no schema".to_string()))?
        .iter()
        .map(|field| field.name.clone())
        .collect();
    let page_token = response.page_token.clone();

    let mut rows = Vec::with_capacity(rs.row_count());
    while rs.next_row() {
        let mut row = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            row.push(rs.get_json_value(idx)?.unwrap_or(Value::Null));
        }
        rows.push(row);
    }

    Ok(Step::Page(RawResult { columns, rows }, page_token))
}

pub(crate) fn query_request(spec: &AnalyticalQuerySpec) -> QueryRequest {
    let mut request = QueryRequest::new(spec.query_text());
    if !spec.parameters().is_empty() {
        request.parameter_mode = Some("NAMED".to_string());
        request.query_parameters = Some(spec.parameters().iter().map(bind).collect());
    }
    request
}

fn bind(param: &QueryParam) -> QueryParameter {
    QueryParameter {
        name: Some(param.name.clone()),
        parameter_type: Some(QueryParameterType {
            r#type: param.param_type.to_string(),
            ..Default::default()
        }),
        parameter_value: Some(QueryParameterValue {
            value: param.wire_value(),
            ..Default::default()
        }),
    }
}
