#![allow(clippy::wrong_self_convention)]
//! termlens_query - parameterized analytical queries for the terms warehouse
//!
//! Builds BigQuery Standard SQL statements whose user-supplied values are
//! always bound as named `@param` placeholders, and exposes the fixed
//! catalog of top-terms templates served by the gateway.

pub mod backend;
pub mod catalog;
pub mod error;
pub mod query;

pub use backend::*;
pub use catalog::*;
pub use error::{QueryError, Result};
pub use query::*;
