//! Quiz tenant: the content catalog, questions and attempt results.
//!
//! Every operation takes the caller's [`DbContext`](ansiversa_db::DbContext)
//! and bootstraps the quiz schema on first use.

pub mod catalog;
pub mod mappers;
pub mod models;
pub mod questions;
pub mod results;
pub mod tables;

pub use models::{
    Difficulty, NewPlatform, NewQuestion, NewResult, NewRoadmap, NewSubject, NewTopic, Platform,
    PlatformUpdate, Question, QuestionUpdate, QuizResult, ResponseRecord, Roadmap, RoadmapUpdate,
    Subject, SubjectUpdate, Topic, TopicUpdate,
};
pub use questions::RandomQuestions;
pub use tables::{QUIZ, QUIZ_TABLES};
