//! Persistence of saved queries and their comments
//!
//! A plain create/read gateway behind the [`QueryStore`] trait. The HTTP
//! layer validates input into [`NewQuery`]/[`NewComment`] before it reaches a
//! store.

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryQueryStore;
pub use models::*;
pub use postgres::PgQueryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid pk \"{0}\" - object does not exist.")]
    UnknownQuery(i64),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait QueryStore: Send + Sync {
    async fn create_query(&self, new: NewQuery) -> Result<SavedQuery>;

    /// All queries, oldest first
    async fn list_queries(&self) -> Result<Vec<QuerySummary>>;

    async fn get_query(&self, id: i64) -> Result<Option<SavedQuery>>;

    /// Fails with [`StoreError::UnknownQuery`] when the target query does not exist.
    async fn create_comment(&self, new: NewComment) -> Result<Comment>;

    /// Comments on one query, newest first
    async fn list_comments(&self, query_id: i64) -> Result<Vec<Comment>>;
}
