//! Table definitions and the once-per-context schema bootstrap.

use std::collections::HashSet;
use std::sync::Mutex;
use tracing::{info, warn};

use crate::error::DbResult;
use crate::executor::{Executor, Statement};
use crate::operations::TableOperations;

/// One table of a tenant: its DDL, indexes and mutation templates.
#[derive(Debug, Clone, Copy)]
pub struct TableDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub create: &'static str,
    pub indexes: &'static [&'static str],
    pub operations: Option<TableOperations>,
}

/// A logical database with its own credentials and table set.
#[derive(Debug, Clone, Copy)]
pub struct Tenant {
    pub name: &'static str,
    pub tables: &'static [TableDefinition],
}

/// Every CREATE TABLE statement, in declaration order.
pub fn table_statements(tables: &[TableDefinition]) -> Vec<&'static str> {
    tables.iter().map(|table| table.create).collect()
}

/// Every CREATE INDEX statement, in declaration order.
pub fn index_statements(tables: &[TableDefinition]) -> Vec<&'static str> {
    tables
        .iter()
        .flat_map(|table| table.indexes.iter().copied())
        .collect()
}

/// Tracks which tenants have had their schema created.
///
/// Two callers racing on a fresh tenant may both run the statements; they
/// are all `IF NOT EXISTS`, so the second pass is harmless.
#[derive(Debug, Default)]
pub struct SchemaBootstrapper {
    initialized: Mutex<HashSet<&'static str>>,
}

impl SchemaBootstrapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self, tenant: &Tenant) -> bool {
        self.lock().contains(tenant.name)
    }

    /// Create every table, then every index, unless already done.
    ///
    /// Returns `true` when statements were executed. On failure the tenant
    /// stays uninitialized and the next call starts over.
    pub async fn ensure(&self, tenant: &Tenant, executor: &dyn Executor) -> DbResult<bool> {
        if self.is_initialized(tenant) {
            return Ok(false);
        }

        info!(tenant = tenant.name, tables = tenant.tables.len(), "Bootstrapping schema");
        let statements = table_statements(tenant.tables)
            .into_iter()
            .chain(index_statements(tenant.tables));
        for sql in statements {
            if let Err(e) = executor.execute(Statement::new(sql)).await {
                warn!(tenant = tenant.name, error = %e, "Schema bootstrap failed");
                return Err(e);
            }
        }

        self.lock().insert(tenant.name);
        info!(tenant = tenant.name, "Schema bootstrap completed");
        Ok(true)
    }

    pub fn reset(&self, tenant: &Tenant) {
        self.lock().remove(tenant.name);
    }

    pub fn reset_all(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<&'static str>> {
        // The set stays consistent even if a holder panicked.
        self.initialized
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingExecutor;

    const TABLES: &[TableDefinition] = &[
        TableDefinition {
            name: "parents",
            description: "",
            create: "CREATE TABLE IF NOT EXISTS parents (id INTEGER PRIMARY KEY)",
            indexes: &[],
            operations: None,
        },
        TableDefinition {
            name: "children",
            description: "",
            create: "CREATE TABLE IF NOT EXISTS children (id INTEGER PRIMARY KEY, parent_id INTEGER)",
            indexes: &["CREATE INDEX IF NOT EXISTS idx_children_parent_id ON children(parent_id)"],
            operations: None,
        },
    ];

    const TENANT: Tenant = Tenant {
        name: "test",
        tables: TABLES,
    };

    #[tokio::test]
    async fn tables_run_before_indexes_and_only_once() {
        let executor = RecordingExecutor::new();
        let bootstrapper = SchemaBootstrapper::new();

        assert!(bootstrapper.ensure(&TENANT, &executor).await.unwrap());
        assert!(!bootstrapper.ensure(&TENANT, &executor).await.unwrap());

        let executed = executor.statements();
        assert_eq!(executed.len(), 3);
        assert!(executed[0].contains("parents"));
        assert!(executed[1].contains("children"));
        assert!(executed[2].starts_with("CREATE INDEX"));
    }

    #[tokio::test]
    async fn failure_leaves_tenant_uninitialized() {
        let executor = RecordingExecutor::failing_on("children");
        let bootstrapper = SchemaBootstrapper::new();

        assert!(bootstrapper.ensure(&TENANT, &executor).await.is_err());
        assert!(!bootstrapper.is_initialized(&TENANT));

        executor.stop_failing();
        assert!(bootstrapper.ensure(&TENANT, &executor).await.unwrap());
        // 2 statements from the failed pass, 3 from the retry
        assert_eq!(executor.call_count(), 5);
    }

    #[tokio::test]
    async fn reset_forces_another_bootstrap() {
        let executor = RecordingExecutor::new();
        let bootstrapper = SchemaBootstrapper::new();

        bootstrapper.ensure(&TENANT, &executor).await.unwrap();
        bootstrapper.reset(&TENANT);
        bootstrapper.ensure(&TENANT, &executor).await.unwrap();

        assert_eq!(executor.call_count(), 6);
    }
}
