//! Platforms, subjects, topics and roadmaps.

use ansiversa_db::operations::{delete_row, insert_row, update_row};
use ansiversa_db::query::{self, ListSpec};
use ansiversa_db::{DbContext, DbResult, ListOptions, Page, SortDirection, Value};

use crate::mappers::{to_platform, to_roadmap, to_subject, to_topic};
use crate::models::{
    NewPlatform, NewRoadmap, NewSubject, NewTopic, Platform, PlatformUpdate, Roadmap,
    RoadmapUpdate, Subject, SubjectUpdate, Topic, TopicUpdate,
};
use crate::tables::{PLATFORMS, QUIZ, QUIZ_TABLES, ROADMAPS, SUBJECTS, TOPICS};

pub const PLATFORM_LIST: ListSpec = ListSpec {
    table: PLATFORMS,
    select: "id, name, description, is_active, icon, type, q_count",
    columns: &[
        ("id", "id"),
        ("name", "name"),
        ("isActive", "is_active"),
        ("type", "type"),
        ("qCount", "q_count"),
    ],
    default_sort: "name",
    default_direction: SortDirection::Asc,
};

pub const SUBJECT_LIST: ListSpec = ListSpec {
    table: SUBJECTS,
    select: "id, platform_id, name, is_active, q_count",
    columns: &[
        ("id", "id"),
        ("platformId", "platform_id"),
        ("name", "name"),
        ("isActive", "is_active"),
        ("qCount", "q_count"),
    ],
    default_sort: "name",
    default_direction: SortDirection::Asc,
};

pub const TOPIC_LIST: ListSpec = ListSpec {
    table: TOPICS,
    select: "id, platform_id, subject_id, name, is_active, q_count",
    columns: &[
        ("id", "id"),
        ("platformId", "platform_id"),
        ("subjectId", "subject_id"),
        ("name", "name"),
        ("isActive", "is_active"),
        ("qCount", "q_count"),
    ],
    default_sort: "name",
    default_direction: SortDirection::Asc,
};

pub const ROADMAP_LIST: ListSpec = ListSpec {
    table: ROADMAPS,
    select: "id, platform_id, subject_id, topic_id, name, is_active, q_count",
    columns: &[
        ("id", "id"),
        ("platformId", "platform_id"),
        ("subjectId", "subject_id"),
        ("topicId", "topic_id"),
        ("name", "name"),
        ("isActive", "is_active"),
        ("qCount", "q_count"),
    ],
    default_sort: "name",
    default_direction: SortDirection::Asc,
};

// Platforms

pub async fn list_platforms(ctx: &DbContext, options: &ListOptions) -> DbResult<Page<Platform>> {
    let db = ctx.prepare(&QUIZ).await?;
    query::list(db.as_ref(), &PLATFORM_LIST, options, to_platform).await
}

pub async fn get_platform(ctx: &DbContext, id: i64) -> DbResult<Option<Platform>> {
    let db = ctx.prepare(&QUIZ).await?;
    let row = query::fetch_by_id(db.as_ref(), &PLATFORM_LIST, id).await?;
    Ok(row.as_ref().map(to_platform))
}

pub async fn create_platform(ctx: &DbContext, input: &NewPlatform) -> DbResult<Platform> {
    let db = ctx.prepare(&QUIZ).await?;
    let args = vec![
        input.name.clone().into(),
        input.description.clone().into(),
        input.is_active.into(),
        input.icon.clone().into(),
        input.platform_type.clone().into(),
        input.q_count.into(),
    ];
    let row = insert_row(db.as_ref(), QUIZ_TABLES, PLATFORMS, args).await?;
    Ok(to_platform(&row))
}

/// Overwrite only the supplied fields and return the full updated row.
pub async fn update_platform(ctx: &DbContext, input: &PlatformUpdate) -> DbResult<Platform> {
    let db = ctx.prepare(&QUIZ).await?;
    let args = vec![
        input.name.clone().into(),
        input.description.clone().into(),
        input.is_active.into(),
        input.icon.clone().into(),
        input.platform_type.clone().into(),
        input.q_count.into(),
        input.id.into(),
    ];
    let row = update_row(db.as_ref(), QUIZ_TABLES, PLATFORMS, args).await?;
    Ok(to_platform(&row))
}

/// Delete a platform and, through the foreign keys, everything beneath it.
pub async fn delete_platform(ctx: &DbContext, id: i64) -> DbResult<bool> {
    let db = ctx.prepare(&QUIZ).await?;
    delete_row(db.as_ref(), QUIZ_TABLES, PLATFORMS, Value::from(id)).await
}

// Subjects

pub async fn list_subjects(ctx: &DbContext, options: &ListOptions) -> DbResult<Page<Subject>> {
    let db = ctx.prepare(&QUIZ).await?;
    query::list(db.as_ref(), &SUBJECT_LIST, options, to_subject).await
}

pub async fn get_subject(ctx: &DbContext, id: i64) -> DbResult<Option<Subject>> {
    let db = ctx.prepare(&QUIZ).await?;
    let row = query::fetch_by_id(db.as_ref(), &SUBJECT_LIST, id).await?;
    Ok(row.as_ref().map(to_subject))
}

pub async fn create_subject(ctx: &DbContext, input: &NewSubject) -> DbResult<Subject> {
    let db = ctx.prepare(&QUIZ).await?;
    let args = vec![
        input.id.into(),
        input.platform_id.into(),
        input.name.clone().into(),
        input.is_active.into(),
        input.q_count.into(),
    ];
    let row = insert_row(db.as_ref(), QUIZ_TABLES, SUBJECTS, args).await?;
    Ok(to_subject(&row))
}

pub async fn update_subject(ctx: &DbContext, input: &SubjectUpdate) -> DbResult<Subject> {
    let db = ctx.prepare(&QUIZ).await?;
    let args = vec![
        input.platform_id.into(),
        input.name.clone().into(),
        input.is_active.into(),
        input.q_count.into(),
        input.id.into(),
    ];
    let row = update_row(db.as_ref(), QUIZ_TABLES, SUBJECTS, args).await?;
    Ok(to_subject(&row))
}

pub async fn delete_subject(ctx: &DbContext, id: i64) -> DbResult<bool> {
    let db = ctx.prepare(&QUIZ).await?;
    delete_row(db.as_ref(), QUIZ_TABLES, SUBJECTS, Value::from(id)).await
}

// Topics

pub async fn list_topics(ctx: &DbContext, options: &ListOptions) -> DbResult<Page<Topic>> {
    let db = ctx.prepare(&QUIZ).await?;
    query::list(db.as_ref(), &TOPIC_LIST, options, to_topic).await
}

pub async fn get_topic(ctx: &DbContext, id: i64) -> DbResult<Option<Topic>> {
    let db = ctx.prepare(&QUIZ).await?;
    let row = query::fetch_by_id(db.as_ref(), &TOPIC_LIST, id).await?;
    Ok(row.as_ref().map(to_topic))
}

pub async fn create_topic(ctx: &DbContext, input: &NewTopic) -> DbResult<Topic> {
    let db = ctx.prepare(&QUIZ).await?;
    let args = vec![
        input.id.into(),
        input.platform_id.into(),
        input.subject_id.into(),
        input.name.clone().into(),
        input.is_active.into(),
        input.q_count.into(),
    ];
    let row = insert_row(db.as_ref(), QUIZ_TABLES, TOPICS, args).await?;
    Ok(to_topic(&row))
}

pub async fn update_topic(ctx: &DbContext, input: &TopicUpdate) -> DbResult<Topic> {
    let db = ctx.prepare(&QUIZ).await?;
    let args = vec![
        input.platform_id.into(),
        input.subject_id.into(),
        input.name.clone().into(),
        input.is_active.into(),
        input.q_count.into(),
        input.id.into(),
    ];
    let row = update_row(db.as_ref(), QUIZ_TABLES, TOPICS, args).await?;
    Ok(to_topic(&row))
}

pub async fn delete_topic(ctx: &DbContext, id: i64) -> DbResult<bool> {
    let db = ctx.prepare(&QUIZ).await?;
    delete_row(db.as_ref(), QUIZ_TABLES, TOPICS, Value::from(id)).await
}

// Roadmaps

pub async fn list_roadmaps(ctx: &DbContext, options: &ListOptions) -> DbResult<Page<Roadmap>> {
    let db = ctx.prepare(&QUIZ).await?;
    query::list(db.as_ref(), &ROADMAP_LIST, options, to_roadmap).await
}

pub async fn get_roadmap(ctx: &DbContext, id: i64) -> DbResult<Option<Roadmap>> {
    let db = ctx.prepare(&QUIZ).await?;
    let row = query::fetch_by_id(db.as_ref(), &ROADMAP_LIST, id).await?;
    Ok(row.as_ref().map(to_roadmap))
}

pub async fn create_roadmap(ctx: &DbContext, input: &NewRoadmap) -> DbResult<Roadmap> {
    let db = ctx.prepare(&QUIZ).await?;
    let args = vec![
        input.id.into(),
        input.platform_id.into(),
        input.subject_id.into(),
        input.topic_id.into(),
        input.name.clone().into(),
        input.is_active.into(),
        input.q_count.into(),
    ];
    let row = insert_row(db.as_ref(), QUIZ_TABLES, ROADMAPS, args).await?;
    Ok(to_roadmap(&row))
}

pub async fn update_roadmap(ctx: &DbContext, input: &RoadmapUpdate) -> DbResult<Roadmap> {
    let db = ctx.prepare(&QUIZ).await?;
    let args = vec![
        input.platform_id.into(),
        input.subject_id.into(),
        input.topic_id.into(),
        input.name.clone().into(),
        input.is_active.into(),
        input.q_count.into(),
        input.id.into(),
    ];
    let row = update_row(db.as_ref(), QUIZ_TABLES, ROADMAPS, args).await?;
    Ok(to_roadmap(&row))
}

pub async fn delete_roadmap(ctx: &DbContext, id: i64) -> DbResult<bool> {
    let db = ctx.prepare(&QUIZ).await?;
    delete_row(db.as_ref(), QUIZ_TABLES, ROADMAPS, Value::from(id)).await
}
