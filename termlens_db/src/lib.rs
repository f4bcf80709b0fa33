//! termlens_db - warehouse access for the termlens gateway
//!
//! Holds the per-worker [`ClientPool`], the [`ClientManager`] and
//! [`WarehouseClient`] seams with their BigQuery implementations, and the
//! [`QueryExecutor`] that turns a bound [`termlens_query::AnalyticalQuerySpec`]
//! into ordered rows.

pub mod error;
pub mod executor;
pub mod pool;

pub use error::{Error, Result};
pub use executor::bigquery::BigQueryHandle;
pub use executor::utils::metrics::ExecutorMetrics;
pub use executor::{ExecutionFailure, QueryExecutor, RawResult, ResultSet, TermRow, WarehouseClient};
pub use pool::config::WarehouseConfig;
pub use pool::credentials::Credentials;
pub use pool::manager::{BigQueryManager, ClientManager};
pub use pool::{ClientPool, WorkerId};
