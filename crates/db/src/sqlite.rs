//! SQLite-backed tenant handles.

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::error::{DbError, DbResult};
use crate::executor::{Executor, QueryOutput, Statement};
use crate::value::{Row, Value};

const MAX_CONNECTIONS: u32 = 10;

/// Database connection pool wrapper.
///
/// The pool is created lazily, so building a handle performs no I/O; the
/// first statement opens the first connection.
#[derive(Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    /// Create a lazily connected pool from a database URL.
    ///
    /// # Arguments
    /// * `url` - `sqlite://path`, `sqlite::memory:`, or a bare file path
    pub fn connect_lazy(url: &str) -> DbResult<Self> {
        let in_memory = is_in_memory(url);
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives only as long as its connection, so it
        // gets exactly one that is never recycled.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options.connect_lazy_with(options);
        info!(url = %redact(url), in_memory, "Created lazy SQLite pool");

        Ok(Self { pool })
    }

    /// Get a reference to the underlying SQLite pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Executor for SqliteExecutor {
    async fn execute(&self, statement: Statement) -> DbResult<QueryOutput> {
        debug!(sql = %statement.sql, args = statement.args.len(), "Executing statement");

        let mut query = sqlx::query(&statement.sql);
        for value in &statement.args {
            query = bind_value(query, value);
        }

        if returns_rows(&statement.sql) {
            let rows = query
                .fetch_all(&self.pool)
                .await?
                .iter()
                .map(decode_row)
                .collect::<DbResult<Vec<_>>>()?;
            Ok(QueryOutput {
                rows_affected: rows.len() as u64,
                rows,
            })
        } else {
            let done = query.execute(&self.pool).await?;
            Ok(QueryOutput {
                rows: Vec::new(),
                rows_affected: done.rows_affected(),
            })
        }
    }
}

/// Whether a statement yields a result set: queries, and mutations with a
/// `RETURNING` clause.
fn returns_rows(sql: &str) -> bool {
    let mut words = sql.split_ascii_whitespace();
    let leading = words.next().unwrap_or_default().to_ascii_uppercase();
    matches!(leading.as_str(), "SELECT" | "WITH" | "VALUES" | "PRAGMA")
        || words.any(|word| word.eq_ignore_ascii_case("RETURNING"))
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<i64>),
        Value::Integer(v) => query.bind(*v),
        Value::Real(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.clone()),
        Value::Blob(v) => query.bind(v.clone()),
        Value::Boolean(v) => query.bind(i64::from(*v)),
    }
}

fn decode_row(row: &SqliteRow) -> DbResult<Row> {
    let mut decoded = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(idx)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" | "BOOLEAN" => Value::Integer(row.try_get_unchecked::<i64, _>(idx)?),
                "REAL" => Value::Real(row.try_get_unchecked::<f64, _>(idx)?),
                "BLOB" => Value::Blob(row.try_get_unchecked::<Vec<u8>, _>(idx)?),
                _ => Value::Text(row.try_get_unchecked::<String, _>(idx)?),
            }
        };
        decoded.push(column.name(), value);
    }
    Ok(decoded)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Builds tenant handles from connection settings.
pub trait Connector: Send + Sync {
    fn connect(&self, tenant: &str, config: &ConnectionConfig) -> DbResult<Arc<dyn Executor>>;
}

/// Default connector: one lazily connected SQLite pool per tenant.
///
/// The auth token is only meaningful for hosted libSQL endpoints; local
/// SQLite files and in-memory databases do not consult it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteConnector;

impl Connector for SqliteConnector {
    fn connect(&self, tenant: &str, config: &ConnectionConfig) -> DbResult<Arc<dyn Executor>> {
        if config.url.starts_with("libsql://") || config.url.starts_with("https://") {
            return Err(DbError::config(format!(
                "tenant '{tenant}' points at a remote endpoint; the SQLite connector needs a local URL"
            )));
        }
        let executor = SqliteExecutor::connect_lazy(&config.url)?;
        Ok(Arc::new(executor))
    }
}
