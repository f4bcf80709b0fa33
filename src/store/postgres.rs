//! PostgreSQL-backed [`QueryStore`]
//!
//! Uses runtime queries (`sqlx::query`) and bootstraps its two tables on
//! connect, so no compile-time database is needed.

use super::{Comment, NewComment, NewQuery, QueryStore, QuerySummary, Result, SavedQuery, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::{info, instrument};

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS saved_queries (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(50) NOT NULL,
        query TEXT NOT NULL,
        username VARCHAR(50) NOT NULL,
        date DATE NOT NULL DEFAULT CURRENT_DATE,
        query_comment TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS query_comments (
        id BIGSERIAL PRIMARY KEY,
        query_id BIGINT NOT NULL REFERENCES saved_queries(id) ON DELETE CASCADE,
        username VARCHAR(50) NOT NULL,
        comment_text TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS query_comments_query_id ON query_comments (query_id)",
];

pub struct PgQueryStore {
    pool: PgPool,
}

impl PgQueryStore {
    pub async fn connect(options: PgConnectOptions) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: PgPool) -> Result<Self> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        info!("relational store ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn saved_query(r: &PgRow) -> SavedQuery {
    SavedQuery {
        id: r.get("id"),
        name: r.get("name"),
        query: r.get("query"),
        username: r.get("username"),
        date: r.get("date"),
        query_comment: r.get("query_comment"),
    }
}

fn comment(r: &PgRow) -> Comment {
    Comment {
        id: r.get("id"),
        query: r.get("query_id"),
        username: r.get("username"),
        comment_text: r.get("comment_text"),
    }
}

#[async_trait]
impl QueryStore for PgQueryStore {
    #[instrument(skip_all, fields(name = %new.name))]
    async fn create_query(&self, new: NewQuery) -> Result<SavedQuery> {
        let row = sqlx::query(
            "INSERT INTO saved_queries (name, query, username, query_comment)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, query, username, date, query_comment",
        )
        .bind(&new.name)
        .bind(&new.query)
        .bind(&new.username)
        .bind(&new.query_comment)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved_query(&row))
    }

    async fn list_queries(&self) -> Result<Vec<QuerySummary>> {
        let rows = sqlx::query("SELECT id, name, username, date FROM saved_queries ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|r| QuerySummary {
                id: r.get("id"),
                name: r.get("name"),
                username: r.get("username"),
                date: r.get("date"),
            })
            .collect())
    }

    async fn get_query(&self, id: i64) -> Result<Option<SavedQuery>> {
        let row = sqlx::query(
            "SELECT id, name, query, username, date, query_comment
             FROM saved_queries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(saved_query))
    }

    #[instrument(skip_all, fields(query = new.query))]
    async fn create_comment(&self, new: NewComment) -> Result<Comment> {
        // The existence check and insert are one statement.
        let row = sqlx::query(
            "INSERT INTO query_comments (query_id, username, comment_text)
             SELECT id, $2, $3 FROM saved_queries WHERE id = $1
             RETURNING id, query_id, username, comment_text",
        )
        .bind(new.query)
        .bind(&new.username)
        .bind(&new.comment_text)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref()
            .map(comment)
            .ok_or(StoreError::UnknownQuery(new.query))
    }

    async fn list_comments(&self, query_id: i64) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT id, query_id, username, comment_text
             FROM query_comments WHERE query_id = $1 ORDER BY id DESC",
        )
        .bind(query_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(comment).collect())
    }
}
