use chrono::{DateTime, Utc};
use error_stack::ResultExt;
use futures::future::{BoxFuture, FutureExt};
use sqlx::types::Json;
use sqlx::FromRow;

use super::{PageQuery, PostStore, Result, StoreError};
use crate::database::{self, ErrorExt, ReportExt};
use crate::schema::{NewPost, Post, PostDocument};
use crate::types::PostId;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS "posts" (
    id BIGSERIAL PRIMARY KEY,
    created_at TIMESTAMPTZ NOT NULL,
    data JSONB NOT NULL
)"#;

const CREATE_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS "posts_created_at_idx"
    ON "posts" (created_at DESC, id DESC)"#;

/// Post store backed by a Postgres table of JSONB documents.
#[derive(Debug, Clone)]
pub struct PgPostStore {
    pool: database::Pool,
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    data: Json<serde_json::Value>,
}

impl PostRow {
    fn decode(self) -> Result<Post> {
        PostDocument::decode(PostId::new(self.id.to_string()), self.data.0)
            .change_context(StoreError::Decode)
    }
}

impl PgPostStore {
    #[must_use]
    pub fn new(pool: database::Pool) -> Self {
        Self { pool }
    }

    /// Creates the posts table and its ordering index if they
    /// do not exist yet.
    #[tracing::instrument(skip_all, name = "store.postgres.ensure_schema")]
    pub async fn ensure_schema(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        for statement in [CREATE_TABLE, CREATE_INDEX] {
            sqlx::query(statement)
                .execute(&mut *conn)
                .await
                .into_db_error()
                .change_context(StoreError::Query)
                .attach_printable("could not prepare posts table")?;
        }
        Ok(())
    }

    async fn connection(&self) -> Result<database::PoolConnection> {
        self.pool.get().await.map_err(|e| {
            let context = if e.is_unhealthy() {
                StoreError::Unavailable
            } else {
                StoreError::Query
            };
            e.change_context(context)
        })
    }

    #[tracing::instrument(skip_all, name = "store.postgres.query_page", fields(
        after = query.start_after.is_some(),
        limit = query.limit,
    ))]
    async fn query_page_now(&self, query: PageQuery) -> Result<Vec<Post>> {
        let (after_created_at, after_id) = match &query.start_after {
            Some(cursor) => {
                let id = cursor
                    .id()
                    .as_str()
                    .parse::<i64>()
                    .change_context(StoreError::InvalidCursor)?;
                (Some(DateTime::<Utc>::from(cursor.created_at())), Some(id))
            }
            None => (None, None),
        };

        let limit = i64::try_from(query.limit).change_context(StoreError::Query)?;
        let mut conn = self.connection().await?;

        let rows = sqlx::query_as::<_, PostRow>(
            r#"SELECT id, data FROM "posts"
            WHERE $1::timestamptz IS NULL OR (created_at, id) < ($1, $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3"#,
        )
        .bind(after_created_at)
        .bind(after_id)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await
        .into_db_error()
        .change_context(StoreError::Query)
        .attach_printable("could not fetch a page of posts")?;

        rows.into_iter().map(PostRow::decode).collect()
    }

    #[tracing::instrument(skip_all, name = "store.postgres.find", fields(%id))]
    async fn find_now(&self, id: &PostId) -> Result<Option<Post>> {
        // ids of this store are always numeric
        let Ok(numeric_id) = id.as_str().parse::<i64>() else {
            return Ok(None);
        };

        let mut conn = self.connection().await?;
        let row = sqlx::query_as::<_, PostRow>(r#"SELECT id, data FROM "posts" WHERE id = $1"#)
            .bind(numeric_id)
            .fetch_optional(&mut *conn)
            .await
            .into_db_error()
            .change_context(StoreError::Query)
            .attach_printable("could not find post from post id")?;

        row.map(PostRow::decode).transpose()
    }

    #[tracing::instrument(skip_all, name = "store.postgres.insert")]
    async fn insert_now(&self, post: NewPost) -> Result<Post> {
        let created_at = DateTime::<Utc>::from(post.created_at);
        let data = PostDocument::encode(&post);

        let mut conn = self.connection().await?;
        let row = sqlx::query_as::<_, PostRow>(
            r#"INSERT INTO "posts" (created_at, data) VALUES ($1, $2) RETURNING id, data"#,
        )
        .bind(created_at)
        .bind(Json(data))
        .fetch_one(&mut *conn)
        .await
        .into_db_error()
        .change_context(StoreError::Query)
        .attach_printable("could not insert post")?;

        row.decode()
    }
}

impl PostStore for PgPostStore {
    fn query_page(&self, query: PageQuery) -> BoxFuture<'_, Result<Vec<Post>>> {
        self.query_page_now(query).boxed()
    }

    fn find<'a>(&'a self, id: &'a PostId) -> BoxFuture<'a, Result<Option<Post>>> {
        self.find_now(id).boxed()
    }

    fn insert(&self, post: NewPost) -> BoxFuture<'_, Result<Post>> {
        self.insert_now(post).boxed()
    }
}
