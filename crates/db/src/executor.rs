//! The capability every tenant handle provides: run one statement.

use async_trait::async_trait;

use crate::error::DbResult;
use crate::value::{Row, Value};

/// A SQL string plus its positional (`?`) arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }
}

/// Rows plus the affected-row count reported for mutations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    pub rows: Vec<Row>,
    pub rows_affected: u64,
}

impl QueryOutput {
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn into_first(self) -> Option<Row> {
        self.rows.into_iter().next()
    }
}

/// Trait for tenant database handles.
///
/// The SQLite pool is the production implementation; tests swap in
/// recording doubles without touching the data-access code.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute a single statement and return its rows and affected-row count.
    async fn execute(&self, statement: Statement) -> DbResult<QueryOutput>;
}
