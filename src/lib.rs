//! termlens - saved SQL queries and top-terms analytics over HTTP
//!
//! The analytical path renders one of six fixed templates
//! ([`termlens_query::Catalog`]), runs it on the calling worker's pooled
//! warehouse client ([`termlens_db::ClientPool`]) and normalizes the outcome
//! into a JSON payload and status code. Saved queries and their comments live
//! behind [`store::QueryStore`].

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod store;

pub use analytics::{Analytics, AnalyticsGateway};
pub use api::{create_router, AppState};
pub use config::{AppConfig, ConfigError};
pub use error::ApiError;
pub use normalize::{normalize, QueryOutcome, NO_DATA_FOUND};
