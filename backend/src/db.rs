//! Query executor over the shared connection pool
//!
//! Each call checks out one connection for the duration of a single
//! statement. The connection goes back to the pool when the guard drops,
//! whether the statement succeeded or not.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{FromRow, Postgres};
use uuid::Uuid;

/// Positional statement parameter (`$1`, `$2`, ...)
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Uuid(Uuid),
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
}

impl From<Uuid> for SqlParam {
    fn from(value: Uuid) -> Self {
        SqlParam::Uuid(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Integer(value)
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Integer(i64::from(value))
    }
}

impl From<Decimal> for SqlParam {
    fn from(value: Decimal) -> Self {
        SqlParam::Decimal(value)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(value: NaiveDate) -> Self {
        SqlParam::Date(value)
    }
}

macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param {
                SqlParam::Uuid(v) => query.bind(*v),
                SqlParam::Text(v) => query.bind(v.as_str()),
                SqlParam::Integer(v) => query.bind(*v),
                SqlParam::Decimal(v) => query.bind(*v),
                SqlParam::Date(v) => query.bind(*v),
            };
        }
        query
    }};
}

#[derive(Clone, Debug)]
pub struct QueryExecutor {
    pool: PgPool,
}

impl QueryExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// All rows, in the order the statement returns them
    pub async fn fetch_all<T>(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql, params = params.len(), "fetch_all");
        let mut conn = self.pool.acquire().await?;
        bind_params!(sqlx::query_as::<Postgres, T>(sql), params)
            .fetch_all(&mut *conn)
            .await
    }

    /// First row, or `None` for an empty result
    pub async fn fetch_optional<T>(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql, params = params.len(), "fetch_optional");
        let mut conn = self.pool.acquire().await?;
        bind_params!(sqlx::query_as::<Postgres, T>(sql), params)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Single value from the first column of the first row
    pub async fn fetch_scalar<O>(&self, sql: &str, params: &[SqlParam]) -> Result<O, sqlx::Error>
    where
        O: Send + Unpin,
        (O,): for<'r> FromRow<'r, PgRow>,
    {
        tracing::debug!(sql, params = params.len(), "fetch_scalar");
        let mut conn = self.pool.acquire().await?;
        bind_params!(sqlx::query_scalar::<Postgres, O>(sql), params)
            .fetch_one(&mut *conn)
            .await
    }
}

/// Apply pending migrations. Failures are logged and reported as `false`
/// so the server keeps running without a database.
pub async fn run_migrations(db: &QueryExecutor) -> bool {
    match sqlx::migrate!("./migrations").run(db.pool()).await {
        Ok(()) => {
            tracing::info!("Migrations completed");
            true
        }
        Err(e) => {
            tracing::warn!("Skipping migrations: {}", e);
            false
        }
    }
}
