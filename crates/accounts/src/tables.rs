//! Core tenant schema: users and their subscriptions.

use ansiversa_db::{TableDefinition, TableOperations, Tenant, CORE_TENANT};

pub const USERS: &str = "users";
pub const SUBSCRIPTIONS: &str = "subscriptions";

pub const CORE_TABLES: &[TableDefinition] = &[
    TableDefinition {
        name: USERS,
        description: "Global Ansiversa users (parent DB).",
        create: "CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    name TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)",
        indexes: &["CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)"],
        operations: Some(TableOperations {
            insert: "INSERT INTO users (id, email, name)
VALUES (?, ?, ?)
RETURNING id, email, name, created_at, updated_at",
            update: "UPDATE users
SET email = COALESCE(?, email),
    name = COALESCE(?, name),
    updated_at = CURRENT_TIMESTAMP
WHERE id = ?
RETURNING id, email, name, created_at, updated_at",
            delete: "DELETE FROM users WHERE id = ?",
        }),
    },
    TableDefinition {
        name: SUBSCRIPTIONS,
        description: "User subscriptions and plan status.",
        create: "CREATE TABLE IF NOT EXISTS subscriptions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    plan TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('active','cancelled','expired')),
    period_start TEXT,
    period_end TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE ON UPDATE CASCADE
)",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_subscriptions_user_id ON subscriptions(user_id)",
            "CREATE INDEX IF NOT EXISTS idx_subscriptions_status ON subscriptions(status)",
        ],
        operations: Some(TableOperations {
            insert: "INSERT INTO subscriptions (user_id, plan, status, period_start, period_end)
VALUES (?, ?, COALESCE(?, 'active'), ?, ?)
RETURNING id, user_id, plan, status, period_start, period_end, created_at, updated_at",
            update: "UPDATE subscriptions
SET plan = COALESCE(?, plan),
    status = COALESCE(?, status),
    period_start = COALESCE(?, period_start),
    period_end = COALESCE(?, period_end),
    updated_at = CURRENT_TIMESTAMP
WHERE id = ?
RETURNING id, user_id, plan, status, period_start, period_end, created_at, updated_at",
            delete: "DELETE FROM subscriptions WHERE id = ?",
        }),
    },
];

/// The core tenant.
pub const CORE: Tenant = Tenant {
    name: CORE_TENANT,
    tables: CORE_TABLES,
};

#[cfg(test)]
mod tests {
    use super::*;
    use ansiversa_db::operations::{lookup, OperationKind};

    #[test]
    fn users_precede_subscriptions() {
        let names: Vec<_> = CORE_TABLES.iter().map(|table| table.name).collect();
        assert_eq!(names, vec![USERS, SUBSCRIPTIONS]);
        assert_eq!(CORE.name, "core");
    }

    #[test]
    fn templates_take_id_last() {
        let update = lookup(CORE_TABLES, SUBSCRIPTIONS, OperationKind::Update).unwrap();
        assert_eq!(update.matches('?').count(), 5);
        assert!(update.contains("WHERE id = ?"));

        let insert = lookup(CORE_TABLES, USERS, OperationKind::Insert).unwrap();
        assert_eq!(insert.matches('?').count(), 3);
    }
}
