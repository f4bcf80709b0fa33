use gcp_bigquery_client::error::BQError;
use serde_json::Error as SerdeError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("BigQuery error: {0}")]
    BigQuery(#[from] BQError),

    #[error("JSON error: {0}")]
    Json(#[from] SerdeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, Error>;
