//! Question CRUD, listing and random selection.

use ansiversa_db::coerce;
use ansiversa_db::operations::{delete_row, insert_row, update_row};
use ansiversa_db::query::{self, ListSpec};
use ansiversa_db::{DbContext, DbResult, ListOptions, Page, SortDirection, Statement, Value};
use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::mappers::to_question;
use crate::models::{Difficulty, NewQuestion, Question, QuestionUpdate};
use crate::tables::{QUESTIONS, QUIZ, QUIZ_TABLES};

pub const MAX_RANDOM_QUESTIONS: u32 = 100;

const QUESTION_COLUMNS: &str =
    "id, platform_id, subject_id, topic_id, roadmap_id, q, o, a, e, l, is_active";

pub const QUESTION_LIST: ListSpec = ListSpec {
    table: QUESTIONS,
    select: QUESTION_COLUMNS,
    columns: &[
        ("id", "id"),
        ("platformId", "platform_id"),
        ("subjectId", "subject_id"),
        ("topicId", "topic_id"),
        ("roadmapId", "roadmap_id"),
        ("prompt", "q"),
        ("answer", "a"),
        ("level", "l"),
        ("isActive", "is_active"),
    ],
    default_sort: "id",
    default_direction: SortDirection::Asc,
};

/// Parameters for [`random_questions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomQuestions {
    pub roadmap_id: i64,
    pub level: Option<Difficulty>,
    pub limit: u32,
}

fn options_json(options: &Map<String, Json>) -> DbResult<String> {
    Ok(serde_json::to_string(options)?)
}

pub async fn list_questions(ctx: &DbContext, options: &ListOptions) -> DbResult<Page<Question>> {
    let db = ctx.prepare(&QUIZ).await?;
    query::list(db.as_ref(), &QUESTION_LIST, options, to_question).await
}

pub async fn get_question(ctx: &DbContext, id: i64) -> DbResult<Option<Question>> {
    let db = ctx.prepare(&QUIZ).await?;
    let row = query::fetch_by_id(db.as_ref(), &QUESTION_LIST, id).await?;
    Ok(row.as_ref().map(to_question))
}

pub async fn create_question(ctx: &DbContext, input: &NewQuestion) -> DbResult<Question> {
    let db = ctx.prepare(&QUIZ).await?;
    let args = vec![
        input.platform_id.into(),
        input.subject_id.into(),
        input.topic_id.into(),
        input.roadmap_id.into(),
        input.prompt.clone().into(),
        options_json(&input.options)?.into(),
        input.answer.clone().into(),
        input.explanation.clone().into(),
        input.level.into(),
        input.is_active.into(),
    ];
    let row = insert_row(db.as_ref(), QUIZ_TABLES, QUESTIONS, args).await?;
    Ok(to_question(&row))
}

pub async fn update_question(ctx: &DbContext, input: &QuestionUpdate) -> DbResult<Question> {
    let db = ctx.prepare(&QUIZ).await?;
    let options = input.options.as_ref().map(options_json).transpose()?;
    let args = vec![
        input.platform_id.into(),
        input.subject_id.into(),
        input.topic_id.into(),
        input.roadmap_id.into(),
        input.prompt.clone().into(),
        options.into(),
        input.answer.clone().into(),
        input.explanation.clone().into(),
        input.level.into(),
        input.is_active.into(),
        input.id.into(),
    ];
    let row = update_row(db.as_ref(), QUIZ_TABLES, QUESTIONS, args).await?;
    Ok(to_question(&row))
}

pub async fn delete_question(ctx: &DbContext, id: i64) -> DbResult<bool> {
    let db = ctx.prepare(&QUIZ).await?;
    delete_row(db.as_ref(), QUIZ_TABLES, QUESTIONS, Value::from(id)).await
}

/// Pick up to `limit` active questions of a roadmap in random order.
///
/// The limit is clamped to `1..=100`.
pub async fn random_questions(ctx: &DbContext, request: RandomQuestions) -> DbResult<Vec<Question>> {
    let db = ctx.prepare(&QUIZ).await?;
    let limit = request.limit.clamp(1, MAX_RANDOM_QUESTIONS);

    let mut sql =
        format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE roadmap_id = ? AND is_active = 1");
    let mut args = vec![Value::from(request.roadmap_id)];
    if let Some(level) = request.level {
        sql.push_str(" AND l = ?");
        args.push(level.into());
    }
    sql.push_str(" ORDER BY random() LIMIT ?");
    args.push(limit.into());

    let output = db.execute(Statement::with_args(sql, args)).await?;
    if output.rows.len() < limit as usize {
        debug!(
            roadmap_id = request.roadmap_id,
            requested = limit,
            found = output.rows.len(),
            "Roadmap has fewer active questions than requested"
        );
    }
    Ok(output.rows.iter().map(to_question).collect())
}

/// Number of active questions under a roadmap, for refreshing `q_count`.
pub async fn count_questions_for_roadmap(ctx: &DbContext, roadmap_id: i64) -> DbResult<i64> {
    let db = ctx.prepare(&QUIZ).await?;
    let statement = Statement::new(
        "SELECT COUNT(*) AS total FROM questions WHERE roadmap_id = ? AND is_active = 1",
    )
    .bind(roadmap_id);
    let output = db.execute(statement).await?;
    Ok(output
        .first()
        .map(|row| coerce::int(row, "total"))
        .unwrap_or(0))
}
