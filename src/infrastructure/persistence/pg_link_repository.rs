//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses bound-parameter statements throughout; rows are mapped through a
/// private row type so the domain entity stays free of persistence
/// attributes.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    url: String,
    clicks: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    last_clicked_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(
            row.id,
            row.code,
            row.url,
            row.clicks,
            row.is_active,
            row.created_at,
            row.last_clicked_at,
        )
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tx = self.pool.begin().await?;

        let retired: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM retired_codes WHERE code = $1)")
                .bind(&new_link.code)
                .fetch_one(&mut *tx)
                .await?;

        if retired {
            return Err(AppError::conflict(
                "Short code has been retired",
                json!({ "code": new_link.code }),
            ));
        }

        let row: LinkRow = sqlx::query_as(
            r#"
            INSERT INTO links (code, url)
            VALUES ($1, $2)
            RETURNING id, code, url, clicks, is_active, created_at, last_clicked_at
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> = sqlx::query_as(
            r#"
            SELECT id, code, url, clicks, is_active, created_at, last_clicked_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn code_in_use(&self, code: &str) -> Result<bool, AppError> {
        let in_use: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM links WHERE code = $1)
                OR EXISTS(SELECT 1 FROM retired_codes WHERE code = $1)
            "#,
        )
        .bind(code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(in_use)
    }

    async fn list(&self) -> Result<Vec<Link>, AppError> {
        let rows: Vec<LinkRow> = sqlx::query_as(
            r#"
            SELECT id, code, url, clicks, is_active, created_at, last_clicked_at
            FROM links
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn update_active(
        &self,
        code: &str,
        is_active: bool,
    ) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> = sqlx::query_as(
            r#"
            UPDATE links
            SET is_active = $2
            WHERE code = $1
            RETURNING id, code, url, clicks, is_active, created_at, last_clicked_at
            "#,
        )
        .bind(code)
        .bind(is_active)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET clicks = clicks + 1, last_clicked_at = NOW()
            WHERE code = $1
            "#,
        )
        .bind(code)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            debug!(code, "Click for a code that no longer exists");
        }

        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let deleted: Option<String> =
            sqlx::query_scalar("DELETE FROM links WHERE code = $1 RETURNING code")
                .bind(code)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(code) = deleted else {
            return Ok(false);
        };

        sqlx::query("INSERT INTO retired_codes (code) VALUES ($1) ON CONFLICT (code) DO NOTHING")
            .bind(&code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
