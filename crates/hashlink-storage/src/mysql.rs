use async_trait::async_trait;
use hashlink_core::table::Result;
use hashlink_core::{DurableTable, PutOutcome, ShortCode, StorageError, UrlRecord};
use jiff::Timestamp;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tracing::trace;

const SCHEMA: &str = include_str!("../ddl/mysql/url_records.sql");

/// MySQL implementation of the durable table contract.
///
/// The conditional put relies on the primary key on `short_code`: a
/// duplicate-key failure is reported as [`PutOutcome::AlreadyExists`].
/// Click increments run `UPDATE ... SET clicks = clicks + ?` and read the
/// new value back inside the same transaction, while the row lock is held.
#[derive(Debug, Clone)]
pub struct MySqlTable {
    pool: MySqlPool,
}

impl MySqlTable {
    /// Creates a table from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a table by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `url_records` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
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

fn parse_row(row: &MySqlRow) -> Result<UrlRecord> {
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let clicks: u64 = row.try_get("clicks").map_err(map_sqlx_error)?;

    let short_code = ShortCode::new(short_code)
        .map_err(|e| StorageError::InvalidData(e.to_string()))?;
    let created_at = Timestamp::from_second(created_at).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{created_at}': {e}"))
    })?;

    Ok(UrlRecord {
        short_code,
        long_url,
        created_at,
        clicks,
    })
}

#[async_trait]
impl DurableTable for MySqlTable {
    async fn conditional_put(&self, record: &UrlRecord) -> Result<PutOutcome> {
        trace!(code = %record.short_code, "Inserting URL record into MySQL");

        let result = sqlx::query(
            r#"
            INSERT INTO url_records (short_code, long_url, created_at, clicks)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.short_code.as_str())
        .bind(&record.long_url)
        .bind(record.created_at.as_second())
        .bind(record.clicks)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(PutOutcome::Inserted),
            Err(err) if is_unique_violation(&err) => Ok(PutOutcome::AlreadyExists),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT short_code, long_url, created_at, clicks
            FROM url_records
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(parse_row).transpose()
    }

    async fn increment_clicks(&self, code: &ShortCode, delta: u64) -> Result<Option<u64>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let updated = sqlx::query(
            r#"
            UPDATE url_records
            SET clicks = clicks + ?
            WHERE short_code = ?
            "#,
        )
        .bind(delta)
        .bind(code.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(None);
        }

        let clicks: u64 = sqlx::query_scalar(
            r#"
            SELECT clicks
            FROM url_records
            WHERE short_code = ?
            "#,
        )
        .bind(code.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(Some(clicks))
    }
}
