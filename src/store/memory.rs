use super::{Comment, NewComment, NewQuery, QueryStore, QuerySummary, Result, SavedQuery, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    queries: Vec<SavedQuery>,
    comments: Vec<Comment>,
}

/// Process-local store for tests and `--memory-store` runs.
#[derive(Default)]
pub struct MemoryQueryStore {
    tables: RwLock<Tables>,
}

impl MemoryQueryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueryStore for MemoryQueryStore {
    async fn create_query(&self, new: NewQuery) -> Result<SavedQuery> {
        let mut tables = self.tables.write().await;
        let saved = SavedQuery {
            id: tables.queries.len() as i64 + 1,
            name: new.name,
            query: new.query,
            username: new.username,
            date: Utc::now().date_naive(),
            query_comment: new.query_comment,
        };
        tables.queries.push(saved.clone());
        Ok(saved)
    }

    async fn list_queries(&self) -> Result<Vec<QuerySummary>> {
        let tables = self.tables.read().await;
        Ok(tables.queries.iter().map(QuerySummary::from).collect())
    }

    async fn get_query(&self, id: i64) -> Result<Option<SavedQuery>> {
        let tables = self.tables.read().await;
        Ok(tables.queries.iter().find(|q| q.id == id).cloned())
    }

    async fn create_comment(&self, new: NewComment) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.queries.iter().any(|q| q.id == new.query) {
            return Err(StoreError::UnknownQuery(new.query));
        }
        let comment = Comment {
            id: tables.comments.len() as i64 + 1,
            query: new.query,
            username: new.username,
            comment_text: new.comment_text,
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, query_id: i64) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .rev()
            .filter(|c| c.query == query_id)
            .cloned()
            .collect())
    }
}
