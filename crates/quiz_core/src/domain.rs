//! crates/quiz_core/src/domain.rs
//!
//! Defines the pure, core data structures for a test-taking session.
//! These structs are independent of any database or transport format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Which kind of question a response answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Mcq,
    ImageUpload,
}

/// Server-side record of one user's progress through a deck.
///
/// Created once per test run; `current_slide` and `is_completed` mirror the
/// client-side navigation state and are refreshed on every slide transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: Uuid,
    pub current_slide: usize,
    /// Free-form auxiliary answers keyed by the client (e.g. fun-break replies).
    pub answers: HashMap<String, serde_json::Value>,
    pub is_completed: bool,
    pub score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A shallow-merge update for a stored [`QuizSession`].
///
/// `None` fields retain their prior value; `updated_at` is always refreshed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionPatch {
    pub current_slide: Option<usize>,
    pub answers: Option<HashMap<String, serde_json::Value>>,
    pub is_completed: Option<bool>,
    pub score: Option<i32>,
}

/// A stored record of one answered question within a session.
///
/// Immutable after creation; a duplicate submission for the same question
/// creates an additional record rather than replacing this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_id: String,
    pub question_type: QuestionType,
    pub user_answer: Option<String>,
    /// Data URL of the graded upload, for image-upload responses.
    pub image_ref: Option<String>,
    /// 0 or 1 for MCQs, 0-5 for graded written answers.
    pub ai_score: Option<i32>,
    pub ai_feedback: Option<String>,
    pub is_correct: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// The fields required to create a [`QuestionResponse`].
///
/// The store allocates the id and `created_at` stamp.
#[derive(Debug, Clone)]
pub struct NewResponse {
    pub session_id: Uuid,
    pub question_id: String,
    pub question_type: QuestionType,
    pub user_answer: Option<String>,
    pub image_ref: Option<String>,
    pub ai_score: Option<i32>,
    pub ai_feedback: Option<String>,
    pub is_correct: Option<bool>,
}

/// Structured result of grading a handwritten-answer image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub is_correct: bool,
    /// 0-5 content-quality score.
    pub score: i32,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub suggestions: Vec<String>,
}
