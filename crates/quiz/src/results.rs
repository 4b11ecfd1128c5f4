//! Quiz attempt results. Results are written once and never updated.

use ansiversa_db::operations::{delete_row, insert_row};
use ansiversa_db::query::{self, ListSpec};
use ansiversa_db::{DbContext, DbResult, ListOptions, Page, SortDirection, Statement, Value};

use crate::mappers::to_result;
use crate::models::{NewResult, QuizResult};
use crate::tables::{QUIZ, QUIZ_TABLES, RESULTS};

const RESULT_COLUMNS: &str =
    "id, user_id, platform_id, subject_id, topic_id, roadmap_id, level, responses, mark, created_at";

/// Listed newest first by id.
pub const RESULT_LIST: ListSpec = ListSpec {
    table: RESULTS,
    select: RESULT_COLUMNS,
    columns: &[
        ("id", "id"),
        ("userId", "user_id"),
        ("platformId", "platform_id"),
        ("subjectId", "subject_id"),
        ("topicId", "topic_id"),
        ("roadmapId", "roadmap_id"),
        ("level", "level"),
        ("mark", "mark"),
        ("createdAt", "created_at"),
    ],
    default_sort: "id",
    default_direction: SortDirection::Desc,
};

pub async fn insert_result(ctx: &DbContext, input: &NewResult) -> DbResult<QuizResult> {
    let db = ctx.prepare(&QUIZ).await?;
    let responses = serde_json::to_string(&input.responses)?;
    let args = vec![
        input.user_id.clone().into(),
        input.platform_id.into(),
        input.subject_id.into(),
        input.topic_id.into(),
        input.roadmap_id.into(),
        input.level.into(),
        responses.into(),
        input.mark.into(),
    ];
    let row = insert_row(db.as_ref(), QUIZ_TABLES, RESULTS, args).await?;
    Ok(to_result(&row))
}

pub async fn get_result(ctx: &DbContext, id: i64) -> DbResult<Option<QuizResult>> {
    let db = ctx.prepare(&QUIZ).await?;
    let row = query::fetch_by_id(db.as_ref(), &RESULT_LIST, id).await?;
    Ok(row.as_ref().map(to_result))
}

pub async fn list_results(ctx: &DbContext, options: &ListOptions) -> DbResult<Page<QuizResult>> {
    let db = ctx.prepare(&QUIZ).await?;
    query::list(db.as_ref(), &RESULT_LIST, options, to_result).await
}

/// Every result of one user, newest first, without pagination.
pub async fn list_results_for_user(ctx: &DbContext, user_id: &str) -> DbResult<Vec<QuizResult>> {
    let db = ctx.prepare(&QUIZ).await?;
    let statement = Statement::new(format!(
        "SELECT {RESULT_COLUMNS} FROM results WHERE user_id = ? ORDER BY id DESC"
    ))
    .bind(user_id);
    let output = db.execute(statement).await?;
    Ok(output.rows.iter().map(to_result).collect())
}

pub async fn delete_result(ctx: &DbContext, id: i64) -> DbResult<bool> {
    let db = ctx.prepare(&QUIZ).await?;
    delete_row(db.as_ref(), QUIZ_TABLES, RESULTS, Value::from(id)).await
}
