//! Key-value data access over the `kv_store` table.
//!
//! The DAOs own no connection. Every call takes the caller's handle, so the
//! same DAO works on a pooled connection or inside a caller-managed
//! transaction:
//!
//! ```ignore
//! let dao = PgKvDao::new();
//! let mut tx = db.begin().await?;
//! dao.set(&mut *tx, "feature.a", "on").await?;
//! dao.delete(&mut *tx, "feature.b").await?;
//! tx.commit().await?;
//! ```

use crate::models::Kv;
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::PgConnection;
use std::time::Instant;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("key '{0}' not found")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<sqlx::Error> for KvError {
    fn from(err: sqlx::Error) -> Self {
        KvError::Storage(Box::new(err))
    }
}

impl From<KvError> for AppError {
    fn from(err: KvError) -> Self {
        match err {
            KvError::NotFound(_) => AppError::NotFound(anyhow::Error::new(err)),
            KvError::Storage(_) => AppError::DatabaseError(anyhow::Error::new(err)),
        }
    }
}

/// Key-value store operations against a caller-supplied handle.
#[async_trait]
pub trait KvDao: Send + Sync {
    /// Connection or transaction the operations run on.
    type Handle: Send;

    /// Current value for `key`, or [`KvError::NotFound`].
    async fn get(&self, handle: &mut Self::Handle, key: &str) -> Result<String, KvError>;

    /// Insert `key` or replace its value, atomically.
    async fn set(&self, handle: &mut Self::Handle, key: &str, value: &str)
        -> Result<(), KvError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, handle: &mut Self::Handle, key: &str) -> Result<(), KvError>;

    async fn exists(&self, handle: &mut Self::Handle, key: &str) -> Result<bool, KvError>;

    /// Every record, ordered by key.
    async fn get_all(&self, handle: &mut Self::Handle) -> Result<Vec<Kv>, KvError>;

    /// Records whose key starts with `prefix` (literal, case-sensitive),
    /// ordered by key. The empty prefix matches everything.
    async fn get_by_prefix(
        &self,
        handle: &mut Self::Handle,
        prefix: &str,
    ) -> Result<Vec<Kv>, KvError>;
}

/// Escape LIKE metacharacters so `prefix` matches literally under
/// `ESCAPE '\'`.
pub fn escape_like(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Record the query duration, failed or not, then convert the result.
fn timed<T>(
    operation: &'static str,
    start: Instant,
    result: Result<T, sqlx::Error>,
) -> Result<T, KvError> {
    metrics::histogram!("kv_store_query_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
    Ok(result?)
}

/// PostgreSQL implementation. Pass `&mut *pool_conn` or `&mut *tx` as the
/// handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgKvDao;

impl PgKvDao {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KvDao for PgKvDao {
    type Handle = PgConnection;

    #[instrument(skip(self, handle))]
    async fn get(&self, handle: &mut PgConnection, key: &str) -> Result<String, KvError> {
        let start = Instant::now();

        let result = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&mut *handle)
            .await;

        timed("get", start, result)?.ok_or_else(|| KvError::NotFound(key.to_string()))
    }

    #[instrument(skip(self, handle, value))]
    async fn set(&self, handle: &mut PgConnection, key: &str, value: &str) -> Result<(), KvError> {
        let start = Instant::now();

        let result = sqlx::query(
            r#"
            INSERT INTO kv_store (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&mut *handle)
        .await;

        timed("set", start, result)?;
        Ok(())
    }

    #[instrument(skip(self, handle))]
    async fn delete(&self, handle: &mut PgConnection, key: &str) -> Result<(), KvError> {
        let start = Instant::now();

        let result = sqlx::query("DELETE FROM kv_store WHERE key = $1")
            .bind(key)
            .execute(&mut *handle)
            .await;

        timed("delete", start, result)?;
        Ok(())
    }

    #[instrument(skip(self, handle))]
    async fn exists(&self, handle: &mut PgConnection, key: &str) -> Result<bool, KvError> {
        let start = Instant::now();

        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_one(&mut *handle)
            .await;

        Ok(timed("exists", start, result)? > 0)
    }

    #[instrument(skip(self, handle))]
    async fn get_all(&self, handle: &mut PgConnection) -> Result<Vec<Kv>, KvError> {
        let start = Instant::now();

        // COLLATE "C" keeps the order bytewise regardless of database locale.
        let result = sqlx::query_as::<_, Kv>(
            r#"SELECT key, value FROM kv_store ORDER BY key COLLATE "C""#,
        )
        .fetch_all(&mut *handle)
        .await;

        timed("get_all", start, result)
    }

    #[instrument(skip(self, handle))]
    async fn get_by_prefix(
        &self,
        handle: &mut PgConnection,
        prefix: &str,
    ) -> Result<Vec<Kv>, KvError> {
        let start = Instant::now();
        let pattern = format!("{}%", escape_like(prefix));

        let result = sqlx::query_as::<_, Kv>(
            r#"
            SELECT key, value FROM kv_store
            WHERE key LIKE $1 ESCAPE '\'
            ORDER BY key COLLATE "C"
            "#,
        )
        .bind(pattern)
        .fetch_all(&mut *handle)
        .await;

        timed("get_by_prefix", start, result)
    }
}
