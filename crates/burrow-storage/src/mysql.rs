use async_trait::async_trait;
use burrow_core::{Link, LinkStore, NewLink, ReadLinkStore, Slug, StorageError};
use jiff::Timestamp;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tracing::debug;

use crate::Result;

/// MySQL implementation of [`LinkStore`].
///
/// The schema (see `migrations/`) carries a unique index on `slug` only;
/// `original_url` has a plain prefix index, so the duplicate-URL race
/// described by the concurrency model is arbitrated solely by the slug
/// index. Both columns use a binary collation so URL dedup stays
/// case-sensitive. Timestamps are stored as Unix seconds.
#[derive(Debug, Clone)]
pub struct MySqlLinkStore {
    pool: MySqlPool,
}

impl MySqlLinkStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Runs the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Operation(format!("migration failed: {e}")))?;
        debug!("link store migrations applied");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn parse_timestamp(column: &str, seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{seconds}': {e}"))
    })
}

fn row_to_link(row: MySqlRow) -> Result<Link> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let slug: String = row.try_get("slug").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let updated_at: i64 = row.try_get("updated_at").map_err(map_sqlx_error)?;

    Ok(Link {
        id,
        original_url,
        slug: Slug::new_unchecked(slug),
        created_at: parse_timestamp("created_at", created_at)?,
        updated_at: parse_timestamp("updated_at", updated_at)?,
    })
}

#[async_trait]
impl ReadLinkStore for MySqlLinkStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>> {
        let row = sqlx::query(
            r#"
            SELECT id, original_url, slug, created_at, updated_at
            FROM links
            WHERE slug = ?
            LIMIT 1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(row_to_link).transpose()
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Link>> {
        let row = sqlx::query(
            r#"
            SELECT id, original_url, slug, created_at, updated_at
            FROM links
            WHERE original_url = ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(row_to_link).transpose()
    }
}

#[async_trait]
impl LinkStore for MySqlLinkStore {
    async fn insert(&self, link: NewLink) -> Result<Link> {
        let now = Timestamp::now();
        let seconds = now.as_second();

        let result = sqlx::query(
            r#"
            INSERT INTO links (original_url, slug, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&link.original_url)
        .bind(link.slug.as_str())
        .bind(seconds)
        .bind(seconds)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(Link {
                id: done.last_insert_id() as i64,
                original_url: link.original_url,
                slug: link.slug,
                created_at: now,
                updated_at: now,
            }),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(link.slug.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
