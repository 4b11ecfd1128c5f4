//! Filtered, sorted and paginated listing.
//!
//! Only logical keys present in a table's [`ColumnMap`] ever reach SQL;
//! caller input supplies values, never identifiers.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::coerce;
use crate::error::DbResult;
use crate::executor::{Executor, Statement};
use crate::value::{Row, Value};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Character that turns a text filter into a `LIKE` predicate.
pub const WILDCARD: char = '%';

/// Logical field name → physical column name.
pub type ColumnMap = &'static [(&'static str, &'static str)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Requested ordering. Both parts are optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortSpec {
    pub column: Option<String>,
    pub direction: Option<SortDirection>,
}

/// Caller-facing listing options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    pub filters: BTreeMap<String, Value>,
    pub sort: Option<SortSpec>,
    pub page: Option<f64>,
    pub page_size: Option<f64>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn sort_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec {
            column: Some(column.into()),
            direction: Some(direction),
        });
        self
    }

    pub fn page(mut self, page: f64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: f64) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Static description of one listable table.
#[derive(Debug, Clone, Copy)]
pub struct ListSpec {
    pub table: &'static str,
    /// Comma-separated select list.
    pub select: &'static str,
    pub columns: ColumnMap,
    /// Physical column used when no valid sort is requested.
    pub default_sort: &'static str,
    pub default_direction: SortDirection,
}

impl ListSpec {
    fn physical(&self, logical: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(key, _)| *key == logical)
            .map(|(_, column)| *column)
    }
}

/// A page of mapped rows plus the unwindowed total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u32,
}

/// The SELECT and COUNT statements for one listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub select: Statement,
    pub count: Statement,
    pub page: u64,
    pub page_size: u32,
}

/// `max(1, floor(page))`; missing or non-finite input is page 1.
pub fn normalize_page(page: Option<f64>) -> u64 {
    match page {
        Some(p) if p.is_finite() => p.floor().max(1.0) as u64,
        _ => 1,
    }
}

/// `clamp(floor(page_size), 1, 100)`; missing or non-finite input is 20.
pub fn normalize_page_size(page_size: Option<f64>) -> u32 {
    match page_size {
        Some(size) if size.is_finite() => {
            size.floor().clamp(1.0, f64::from(MAX_PAGE_SIZE)) as u32
        }
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// Build the WHERE clause (including the keyword) and its arguments.
pub fn where_clause(spec: &ListSpec, filters: &BTreeMap<String, Value>) -> (String, Vec<Value>) {
    let mut predicates = Vec::new();
    let mut args = Vec::new();

    for (key, value) in filters {
        let Some(column) = spec.physical(key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        match value.normalized() {
            Value::Text(text) if text.contains(WILDCARD) => {
                predicates.push(format!("{column} LIKE ?"));
                args.push(Value::Text(text));
            }
            other => {
                predicates.push(format!("{column} = ?"));
                args.push(other);
            }
        }
    }

    if predicates.is_empty() {
        (String::new(), args)
    } else {
        (format!(" WHERE {}", predicates.join(" AND ")), args)
    }
}

/// Resolve the ORDER BY column and direction.
///
/// An unknown column falls back to the default column and direction.
pub fn order_by(spec: &ListSpec, sort: Option<&SortSpec>) -> (&'static str, SortDirection) {
    let requested = sort.and_then(|sort| {
        let column = spec.physical(sort.column.as_deref()?)?;
        Some((column, sort.direction.unwrap_or(spec.default_direction)))
    });
    requested.unwrap_or((spec.default_sort, spec.default_direction))
}

/// Build the paged SELECT and the matching COUNT statement.
pub fn build_list_query(spec: &ListSpec, options: &ListOptions) -> ListQuery {
    let page = normalize_page(options.page);
    let page_size = normalize_page_size(options.page_size);
    let offset = (page - 1)
        .checked_mul(u64::from(page_size))
        .and_then(|offset| i64::try_from(offset).ok())
        .unwrap_or(i64::MAX);

    let (where_sql, args) = where_clause(spec, &options.filters);
    let (sort_column, direction) = order_by(spec, options.sort.as_ref());

    let count = Statement::with_args(
        format!("SELECT COUNT(*) AS total FROM {}{}", spec.table, where_sql),
        args.clone(),
    );

    let mut select_args = args;
    select_args.push(Value::Integer(i64::from(page_size)));
    select_args.push(Value::Integer(offset));
    let select = Statement::with_args(
        format!(
            "SELECT {} FROM {}{} ORDER BY {} {} LIMIT ? OFFSET ?",
            spec.select, spec.table, where_sql, sort_column, direction
        ),
        select_args,
    );

    ListQuery {
        select,
        count,
        page,
        page_size,
    }
}

/// Run the listing and count statements concurrently and map the rows.
///
/// Both run inside one future, so dropping it cancels both.
pub async fn paginate<T, F>(executor: &dyn Executor, query: ListQuery, map: F) -> DbResult<Page<T>>
where
    F: Fn(&Row) -> T,
{
    let ListQuery {
        select,
        count,
        page,
        page_size,
    } = query;

    let (rows, counted) = tokio::try_join!(executor.execute(select), executor.execute(count))?;
    let total = counted
        .first()
        .map(|row| coerce::int(row, "total").max(0) as u64)
        .unwrap_or(0);

    Ok(Page {
        items: rows.rows.iter().map(map).collect(),
        total,
        page,
        page_size,
    })
}

/// Fetch one row of the listed table by its `id` column.
pub async fn fetch_by_id(
    executor: &dyn Executor,
    spec: &ListSpec,
    id: impl Into<Value>,
) -> DbResult<Option<Row>> {
    let statement = Statement::new(format!(
        "SELECT {} FROM {} WHERE id = ? LIMIT 1",
        spec.select, spec.table
    ))
    .bind(id);
    Ok(executor.execute(statement).await?.into_first())
}

/// Build and run a listing in one step.
pub async fn list<T, F>(
    executor: &dyn Executor,
    spec: &ListSpec,
    options: &ListOptions,
    map: F,
) -> DbResult<Page<T>>
where
    F: Fn(&Row) -> T,
{
    paginate(executor, build_list_query(spec, options), map).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingExecutor;

    const QUESTIONS: ListSpec = ListSpec {
        table: "questions",
        select: "id, q",
        columns: &[
            ("id", "id"),
            ("topicId", "topic_id"),
            ("isActive", "is_active"),
            ("prompt", "q"),
        ],
        default_sort: "id",
        default_direction: SortDirection::Asc,
    };

    #[test]
    fn page_and_size_are_clamped() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some(f64::NAN)), 1);
        assert_eq!(normalize_page(Some(f64::INFINITY)), 1);
        assert_eq!(normalize_page(Some(-4.0)), 1);
        assert_eq!(normalize_page(Some(2.9)), 2);
        assert_eq!(normalize_page(Some(1e12)), 1_000_000_000_000);

        assert_eq!(normalize_page_size(None), 20);
        assert_eq!(normalize_page_size(Some(f64::NEG_INFINITY)), 20);
        assert_eq!(normalize_page_size(Some(0.0)), 1);
        assert_eq!(normalize_page_size(Some(10.7)), 10);
        assert_eq!(normalize_page_size(Some(500.0)), 100);
    }

    #[test]
    fn one_predicate_per_recognised_non_null_key() {
        let options = ListOptions::new()
            .filter("topicId", "7")
            .filter("isActive", true)
            .filter("unknown", 1)
            .filter("id", Value::Null);
        let (sql, args) = where_clause(&QUESTIONS, &options.filters);

        assert_eq!(sql, " WHERE is_active = ? AND topic_id = ?");
        assert_eq!(args, vec![Value::Integer(1), Value::Text("7".into())]);
    }

    #[test]
    fn wildcard_text_becomes_like() {
        let options = ListOptions::new().filter("prompt", "%capital%");
        let (sql, args) = where_clause(&QUESTIONS, &options.filters);
        assert_eq!(sql, " WHERE q LIKE ?");
        assert_eq!(args, vec![Value::Text("%capital%".into())]);
    }

    #[test]
    fn empty_filters_produce_no_where() {
        let (sql, args) = where_clause(&QUESTIONS, &BTreeMap::new());
        assert!(sql.is_empty());
        assert!(args.is_empty());
    }

    #[test]
    fn sort_falls_back_to_defaults() {
        assert_eq!(order_by(&QUESTIONS, None), ("id", SortDirection::Asc));

        let unknown = SortSpec {
            column: Some("drop table".into()),
            direction: Some(SortDirection::Desc),
        };
        assert_eq!(order_by(&QUESTIONS, Some(&unknown)), ("id", SortDirection::Asc));

        let no_direction = SortSpec {
            column: Some("topicId".into()),
            direction: None,
        };
        assert_eq!(
            order_by(&QUESTIONS, Some(&no_direction)),
            ("topic_id", SortDirection::Asc)
        );
    }

    #[test]
    fn select_and_count_share_the_filter() {
        let options = ListOptions::new()
            .filter("topicId", 7)
            .sort_by("prompt", SortDirection::Desc)
            .page(3.0)
            .page_size(10.0);
        let query = build_list_query(&QUESTIONS, &options);

        assert_eq!(
            query.select.sql,
            "SELECT id, q FROM questions WHERE topic_id = ? ORDER BY q DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            query.select.args,
            vec![Value::Integer(7), Value::Integer(10), Value::Integer(20)]
        );
        assert_eq!(
            query.count.sql,
            "SELECT COUNT(*) AS total FROM questions WHERE topic_id = ?"
        );
        assert_eq!(query.count.args, vec![Value::Integer(7)]);
        assert_eq!((query.page, query.page_size), (3, 10));
    }

    #[test]
    fn huge_pages_keep_their_number() {
        let query = build_list_query(&QUESTIONS, &ListOptions::new().page(1e12).page_size(10.0));
        assert_eq!(query.page, 1_000_000_000_000);
        assert_eq!(
            query.select.args,
            vec![Value::Integer(10), Value::Integer(9_999_999_999_990)]
        );

        let beyond = build_list_query(&QUESTIONS, &ListOptions::new().page(1e300));
        assert_eq!(beyond.select.args[1], Value::Integer(i64::MAX));
    }

    #[tokio::test]
    async fn paginate_combines_rows_and_total() {
        let executor = RecordingExecutor::new();
        executor.set_rows(vec![Row::new().with("id", 1).with("total", 1)]);

        let page = list(&executor, &QUESTIONS, &ListOptions::new(), |row| {
            coerce::int(row, "id")
        })
        .await
        .unwrap();

        assert_eq!(page.items, vec![1]);
        assert_eq!(page.total, 1);
        assert_eq!((page.page, page.page_size), (1, 20));
        assert_eq!(executor.call_count(), 2);
    }
}
