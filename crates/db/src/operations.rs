//! Registry of per-table INSERT/UPDATE/DELETE templates.
//!
//! Insert templates wrap optional columns in `COALESCE(?, default)`; update
//! templates use `COALESCE(?, column)` so a `NULL` argument leaves the column
//! untouched. Both end in `RETURNING` so callers get the canonical row back.

use std::fmt;
use std::str::FromStr;

use crate::error::{DbError, DbResult};
use crate::executor::{Executor, Statement};
use crate::schema::TableDefinition;
use crate::value::{Row, Value};

/// The three mutation templates of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOperations {
    pub insert: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Insert,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Insert => "insert",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insert" => Ok(OperationKind::Insert),
            "update" => Ok(OperationKind::Update),
            "delete" => Ok(OperationKind::Delete),
            other => Err(DbError::UnknownOperation {
                table: String::new(),
                operation: other.to_string(),
            }),
        }
    }
}

impl TableOperations {
    pub fn get(&self, kind: OperationKind) -> &'static str {
        match kind {
            OperationKind::Insert => self.insert,
            OperationKind::Update => self.update,
            OperationKind::Delete => self.delete,
        }
    }
}

/// Find the template for `table`/`kind` in a tenant's table set.
pub fn lookup(
    tables: &[TableDefinition],
    table: &str,
    kind: OperationKind,
) -> DbResult<&'static str> {
    tables
        .iter()
        .find(|definition| definition.name == table)
        .and_then(|definition| definition.operations)
        .map(|operations| operations.get(kind))
        .ok_or_else(|| DbError::UnknownOperation {
            table: table.to_string(),
            operation: kind.to_string(),
        })
}

/// String-keyed variant of [`lookup`], for callers holding operation names.
pub fn lookup_by_name(
    tables: &[TableDefinition],
    table: &str,
    operation: &str,
) -> DbResult<&'static str> {
    let kind = operation
        .parse::<OperationKind>()
        .map_err(|_| DbError::UnknownOperation {
            table: table.to_string(),
            operation: operation.to_string(),
        })?;
    lookup(tables, table, kind)
}

/// Run the insert template and return the inserted row.
pub async fn insert_row(
    executor: &dyn Executor,
    tables: &[TableDefinition],
    table: &str,
    args: Vec<Value>,
) -> DbResult<Row> {
    let sql = lookup(tables, table, OperationKind::Insert)?;
    executor
        .execute(Statement::with_args(sql, args))
        .await?
        .into_first()
        .ok_or_else(|| DbError::mutation_integrity(table, "insert"))
}

/// Run the update template; the last argument is the row id.
pub async fn update_row(
    executor: &dyn Executor,
    tables: &[TableDefinition],
    table: &str,
    args: Vec<Value>,
) -> DbResult<Row> {
    let sql = lookup(tables, table, OperationKind::Update)?;
    executor
        .execute(Statement::with_args(sql, args))
        .await?
        .into_first()
        .ok_or_else(|| DbError::mutation_integrity(table, "update"))
}

/// Run the delete template; `true` when a row was removed.
pub async fn delete_row(
    executor: &dyn Executor,
    tables: &[TableDefinition],
    table: &str,
    id: Value,
) -> DbResult<bool> {
    let sql = lookup(tables, table, OperationKind::Delete)?;
    let output = executor.execute(Statement::with_args(sql, vec![id])).await?;
    Ok(output.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingExecutor;

    const TABLES: &[TableDefinition] = &[
        TableDefinition {
            name: "widgets",
            description: "",
            create: "",
            indexes: &[],
            operations: Some(TableOperations {
                insert: "INSERT INTO widgets (name) VALUES (?) RETURNING id, name",
                update: "UPDATE widgets SET name = COALESCE(?, name) WHERE id = ? RETURNING id, name",
                delete: "DELETE FROM widgets WHERE id = ?",
            }),
        },
        TableDefinition {
            name: "readonly",
            description: "",
            create: "",
            indexes: &[],
            operations: None,
        },
    ];

    #[test]
    fn lookup_finds_templates() {
        let sql = lookup(TABLES, "widgets", OperationKind::Delete).unwrap();
        assert_eq!(sql, "DELETE FROM widgets WHERE id = ?");
        assert!(lookup_by_name(TABLES, "widgets", "update")
            .unwrap()
            .starts_with("UPDATE"));
    }

    #[test]
    fn unknown_table_or_operation_fails_fast() {
        match lookup(TABLES, "gadgets", OperationKind::Insert) {
            Err(DbError::UnknownOperation { table, operation }) => {
                assert_eq!(table, "gadgets");
                assert_eq!(operation, "insert");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            lookup(TABLES, "readonly", OperationKind::Update),
            Err(DbError::UnknownOperation { .. })
        ));
        match lookup_by_name(TABLES, "widgets", "upsert") {
            Err(DbError::UnknownOperation { table, operation }) => {
                assert_eq!(table, "widgets");
                assert_eq!(operation, "upsert");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_returning_row_is_an_integrity_error() {
        let executor = RecordingExecutor::new();
        let err = insert_row(&executor, TABLES, "widgets", vec!["a".into()])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::MutationIntegrity { ref entity, operation: "insert" } if entity == "widgets"
        ));
        assert_eq!(executor.call_count(), 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let executor = RecordingExecutor::new();
        assert!(!delete_row(&executor, TABLES, "widgets", Value::Integer(1))
            .await
            .unwrap());

        executor.set_rows_affected(1);
        assert!(delete_row(&executor, TABLES, "widgets", Value::Integer(1))
            .await
            .unwrap());
    }
}
