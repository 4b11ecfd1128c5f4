//! Quiz catalog records and their create/update inputs.

use ansiversa_db::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// Question and result difficulty, stored as a one-letter symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn symbol(&self) -> &'static str {
        match self {
            Difficulty::Easy => "E",
            Difficulty::Medium => "M",
            Difficulty::Hard => "D",
        }
    }

    /// Uppercase the input; anything other than `M` or `D` is `Easy`.
    pub fn from_symbol(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "M" => Difficulty::Medium,
            "D" => Difficulty::Hard,
            _ => Difficulty::Easy,
        }
    }

    pub fn coerce(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Text(raw)) => Self::from_symbol(raw),
            _ => Difficulty::Easy,
        }
    }
}

impl From<Difficulty> for Value {
    fn from(level: Difficulty) -> Self {
        Value::Text(level.symbol().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub icon: String,
    #[serde(rename = "type")]
    pub platform_type: Option<String>,
    pub q_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlatform {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub icon: String,
    #[serde(rename = "type")]
    pub platform_type: Option<String>,
    pub q_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformUpdate {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub platform_type: Option<String>,
    pub q_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    pub platform_id: i64,
    pub name: String,
    pub is_active: bool,
    pub q_count: i64,
}

/// `id` may be chosen by the caller; the store assigns one when omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubject {
    pub id: Option<i64>,
    pub platform_id: i64,
    pub name: String,
    pub is_active: Option<bool>,
    pub q_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectUpdate {
    pub id: i64,
    pub platform_id: Option<i64>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub q_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: i64,
    pub platform_id: i64,
    pub subject_id: i64,
    pub name: String,
    pub is_active: bool,
    pub q_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTopic {
    pub id: Option<i64>,
    pub platform_id: i64,
    pub subject_id: i64,
    pub name: String,
    pub is_active: Option<bool>,
    pub q_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicUpdate {
    pub id: i64,
    pub platform_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub q_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub id: i64,
    pub platform_id: i64,
    pub subject_id: i64,
    pub topic_id: i64,
    pub name: String,
    pub is_active: bool,
    pub q_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoadmap {
    pub id: Option<i64>,
    pub platform_id: i64,
    pub subject_id: i64,
    pub topic_id: i64,
    pub name: String,
    pub is_active: Option<bool>,
    pub q_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapUpdate {
    pub id: i64,
    pub platform_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub topic_id: Option<i64>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub q_count: Option<i64>,
}

/// A multiple-choice question. `options` maps choice keys to their text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub platform_id: i64,
    pub subject_id: i64,
    pub topic_id: i64,
    pub roadmap_id: i64,
    pub prompt: String,
    pub options: Map<String, Json>,
    pub answer: String,
    pub explanation: Option<String>,
    pub level: Difficulty,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub platform_id: i64,
    pub subject_id: i64,
    pub topic_id: i64,
    pub roadmap_id: i64,
    pub prompt: String,
    pub options: Map<String, Json>,
    pub answer: String,
    pub explanation: Option<String>,
    pub level: Difficulty,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpdate {
    pub id: i64,
    pub platform_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub topic_id: Option<i64>,
    pub roadmap_id: Option<i64>,
    pub prompt: Option<String>,
    pub options: Option<Map<String, Json>>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
    pub level: Option<Difficulty>,
    pub is_active: Option<bool>,
}

/// One answered question inside a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseRecord {
    pub question_id: i64,
    pub selected: String,
    pub correct: String,
    pub is_correct: bool,
}

/// A finished attempt against a roadmap. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: i64,
    pub user_id: String,
    pub platform_id: i64,
    pub subject_id: i64,
    pub topic_id: i64,
    pub roadmap_id: i64,
    pub level: Difficulty,
    pub responses: Vec<ResponseRecord>,
    pub mark: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResult {
    pub user_id: String,
    pub platform_id: i64,
    pub subject_id: i64,
    pub topic_id: i64,
    pub roadmap_id: i64,
    pub level: Difficulty,
    pub responses: Vec<ResponseRecord>,
    pub mark: Option<i64>,
}
