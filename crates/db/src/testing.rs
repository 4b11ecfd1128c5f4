//! Test doubles for the [`Executor`] and [`Connector`] seams.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::ConnectionConfig;
use crate::error::{DbError, DbResult};
use crate::executor::{Executor, QueryOutput, Statement};
use crate::sqlite::Connector;
use crate::value::Row;

/// Records every statement and answers with canned output.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    executed: Mutex<Vec<Statement>>,
    fail_on: Mutex<Option<String>>,
    rows: Mutex<Vec<Row>>,
    rows_affected: AtomicU64,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any statement whose SQL contains `fragment`.
    pub fn failing_on(fragment: &str) -> Self {
        let executor = Self::default();
        *executor.fail_on.lock().unwrap() = Some(fragment.to_string());
        executor
    }

    pub fn stop_failing(&self) {
        *self.fail_on.lock().unwrap() = None;
    }

    pub fn set_rows(&self, rows: Vec<Row>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub fn set_rows_affected(&self, count: u64) {
        self.rows_affected.store(count, Ordering::SeqCst);
    }

    pub fn executed(&self) -> Vec<Statement> {
        self.executed.lock().unwrap().clone()
    }

    pub fn statements(&self) -> Vec<String> {
        self.executed().into_iter().map(|s| s.sql).collect()
    }

    pub fn call_count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn execute(&self, statement: Statement) -> DbResult<QueryOutput> {
        let fail = self
            .fail_on
            .lock()
            .unwrap()
            .as_deref()
            .is_some_and(|fragment| statement.sql.contains(fragment));
        self.executed.lock().unwrap().push(statement);
        if fail {
            return Err(DbError::Sqlx(sqlx::Error::Protocol(
                "injected failure".to_string(),
            )));
        }
        Ok(QueryOutput {
            rows: self.rows.lock().unwrap().clone(),
            rows_affected: self.rows_affected.load(Ordering::SeqCst),
        })
    }
}

/// Hands out one shared [`RecordingExecutor`] and counts connections.
#[derive(Debug, Default)]
pub struct RecordingConnector {
    executor: Arc<RecordingExecutor>,
    connections: AtomicU64,
}

impl RecordingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executor(&self) -> Arc<RecordingExecutor> {
        Arc::clone(&self.executor)
    }

    pub fn connections(&self) -> u64 {
        self.connections.load(Ordering::SeqCst)
    }
}

impl Connector for RecordingConnector {
    fn connect(&self, _tenant: &str, _config: &ConnectionConfig) -> DbResult<Arc<dyn Executor>> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        Ok(self.executor.clone())
    }
}
