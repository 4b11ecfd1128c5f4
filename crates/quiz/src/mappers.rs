//! Row → record conversions for the quiz tables.

use ansiversa_db::coerce::{boolean, int, json_array, json_object, opt_text, text, timestamp};
use ansiversa_db::Row;

use crate::models::{
    Difficulty, Platform, Question, QuizResult, ResponseRecord, Roadmap, Subject, Topic,
};

pub fn to_platform(row: &Row) -> Platform {
    Platform {
        id: int(row, "id"),
        name: text(row, "name"),
        description: opt_text(row, "description"),
        is_active: boolean(row, "is_active"),
        icon: text(row, "icon"),
        platform_type: opt_text(row, "type"),
        q_count: int(row, "q_count"),
    }
}

pub fn to_subject(row: &Row) -> Subject {
    Subject {
        id: int(row, "id"),
        platform_id: int(row, "platform_id"),
        name: text(row, "name"),
        is_active: boolean(row, "is_active"),
        q_count: int(row, "q_count"),
    }
}

pub fn to_topic(row: &Row) -> Topic {
    Topic {
        id: int(row, "id"),
        platform_id: int(row, "platform_id"),
        subject_id: int(row, "subject_id"),
        name: text(row, "name"),
        is_active: boolean(row, "is_active"),
        q_count: int(row, "q_count"),
    }
}

pub fn to_roadmap(row: &Row) -> Roadmap {
    Roadmap {
        id: int(row, "id"),
        platform_id: int(row, "platform_id"),
        subject_id: int(row, "subject_id"),
        topic_id: int(row, "topic_id"),
        name: text(row, "name"),
        is_active: boolean(row, "is_active"),
        q_count: int(row, "q_count"),
    }
}

pub fn to_question(row: &Row) -> Question {
    Question {
        id: int(row, "id"),
        platform_id: int(row, "platform_id"),
        subject_id: int(row, "subject_id"),
        topic_id: int(row, "topic_id"),
        roadmap_id: int(row, "roadmap_id"),
        prompt: text(row, "q"),
        options: json_object(row, "o"),
        answer: text(row, "a"),
        explanation: opt_text(row, "e"),
        level: Difficulty::coerce(row.get("l")),
        is_active: boolean(row, "is_active"),
    }
}

pub fn to_result(row: &Row) -> QuizResult {
    QuizResult {
        id: int(row, "id"),
        user_id: text(row, "user_id"),
        platform_id: int(row, "platform_id"),
        subject_id: int(row, "subject_id"),
        topic_id: int(row, "topic_id"),
        roadmap_id: int(row, "roadmap_id"),
        level: Difficulty::coerce(row.get("level")),
        responses: responses(row),
        mark: int(row, "mark"),
        created_at: timestamp(row, "created_at"),
    }
}

// A malformed array, or any malformed entry, yields no responses.
fn responses(row: &Row) -> Vec<ResponseRecord> {
    serde_json::from_value(json_array(row, "responses").into()).unwrap_or_default()
}
