//! Context, registry and listing against a real in-memory SQLite pool.

#[cfg(test)]
mod tests {
    use ansiversa_db::coerce;
    use ansiversa_db::operations::{delete_row, insert_row, lookup_by_name, update_row};
    use ansiversa_db::query::{self, ListSpec};
    use ansiversa_db::{
        ConnectionConfig, DbConfig, DbContext, DbError, ListOptions, SortDirection,
        TableDefinition, TableOperations, Tenant, Value,
    };
    use ansiversa_telemetry::Metrics;

    const NOTES: &[TableDefinition] = &[TableDefinition {
        name: "notes",
        description: "Short notes.",
        create: "CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    pinned INTEGER NOT NULL DEFAULT 0
)",
        indexes: &["CREATE INDEX IF NOT EXISTS idx_notes_title ON notes(title)"],
        operations: Some(TableOperations {
            insert: "INSERT INTO notes (title, pinned) VALUES (?, COALESCE(?, 0)) RETURNING id, title, pinned",
            update: "UPDATE notes SET title = COALESCE(?, title), pinned = COALESCE(?, pinned) WHERE id = ? RETURNING id, title, pinned",
            delete: "DELETE FROM notes WHERE id = ?",
        }),
    }];

    const NOTEBOOK: Tenant = Tenant {
        name: "notebook",
        tables: NOTES,
    };

    const NOTE_LIST: ListSpec = ListSpec {
        table: "notes",
        select: "id, title, pinned",
        columns: &[("id", "id"), ("title", "title"), ("pinned", "pinned")],
        default_sort: "id",
        default_direction: SortDirection::Asc,
    };

    fn context() -> DbContext {
        let memory = ConnectionConfig::new("sqlite::memory:", "token");
        DbContext::new(DbConfig::new(memory.clone()).with_app("notebook", memory))
            .with_metrics(Metrics::new().unwrap())
    }

    #[tokio::test]
    async fn registry_mutations_round_trip() {
        let ctx = context();
        let db = ctx.prepare(&NOTEBOOK).await.unwrap();

        let row = insert_row(db.as_ref(), NOTES, "notes", vec!["groceries".into(), Value::Null])
            .await
            .unwrap();
        let id = coerce::int(&row, "id");
        assert!(!coerce::boolean(&row, "pinned"));

        let row = update_row(db.as_ref(), NOTES, "notes", vec![Value::Null, true.into(), id.into()])
            .await
            .unwrap();
        assert_eq!(coerce::text(&row, "title"), "groceries");
        assert!(coerce::boolean(&row, "pinned"));

        assert!(delete_row(db.as_ref(), NOTES, "notes", id.into()).await.unwrap());
        let err = update_row(db.as_ref(), NOTES, "notes", vec![Value::Null, Value::Null, id.into()])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::MutationIntegrity { .. }));
    }

    #[tokio::test]
    async fn listing_filters_sorts_and_counts() {
        let ctx = context();
        let db = ctx.prepare(&NOTEBOOK).await.unwrap();
        for (title, pinned) in [("alpha", true), ("beta", false), ("alpine", true), ("gamma", true)] {
            insert_row(db.as_ref(), NOTES, "notes", vec![title.into(), pinned.into()])
                .await
                .unwrap();
        }

        let options = ListOptions::new()
            .filter("title", "al%")
            .filter("pinned", true)
            .sort_by("title", SortDirection::Desc)
            .page_size(1.0);
        let page = query::list(db.as_ref(), &NOTE_LIST, &options, |row| coerce::text(row, "title"))
            .await
            .unwrap();
        assert_eq!(page.items, vec!["alpine".to_string()]);
        assert_eq!(page.total, 2);

        let beyond = query::list(
            db.as_ref(),
            &NOTE_LIST,
            &ListOptions::new().page(9.0),
            |row| coerce::int(row, "id"),
        )
        .await
        .unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 4);
    }

    #[tokio::test]
    async fn schema_and_statements_are_metered() {
        let ctx = context();
        ctx.prepare(&NOTEBOOK).await.unwrap();
        ctx.prepare(&NOTEBOOK).await.unwrap();

        let metrics = ctx.metrics().unwrap();
        assert_eq!(metrics.schema_bootstraps(), 1);
        // One table and one index.
        assert_eq!(metrics.statements("notebook"), 2);
    }

    #[tokio::test]
    async fn unknown_operation_names_are_rejected() {
        let err = lookup_by_name(NOTES, "notes", "upsert").unwrap_err();
        assert!(matches!(err, DbError::UnknownOperation { .. }));

        let err = lookup_by_name(NOTES, "tags", "insert").unwrap_err();
        assert!(matches!(err, DbError::UnknownOperation { .. }));
    }

    #[tokio::test]
    async fn unconfigured_context_fails_before_connecting() {
        let ctx = DbContext::uninitialized();
        assert!(matches!(
            ctx.prepare(&NOTEBOOK).await,
            Err(DbError::NotInitialized)
        ));
    }
}
