//! services/api/src/adapters/db.rs
//!
//! This module contains the Postgres adapter, a concrete implementation of
//! the `SessionStore` port from the `core` crate, used when `DATABASE_URL`
//! is configured. It handles all interactions with the database using `sqlx`.
//!
//! Queries are bound at runtime so the crate builds without a database;
//! the schema lives in `services/api/migrations/`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::domain::{NewResponse, QuestionResponse, QuestionType, QuizSession, SessionPatch};
use quiz_core::ports::{PortError, PortResult, SessionStore};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `SessionStore` port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn question_type_to_db(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::Mcq => "mcq",
        QuestionType::ImageUpload => "image_upload",
    }
}

fn question_type_from_db(raw: &str) -> PortResult<QuestionType> {
    match raw {
        "mcq" => Ok(QuestionType::Mcq),
        "image_upload" => Ok(QuestionType::ImageUpload),
        other => Err(PortError::Unexpected(format!(
            "Unknown question_type '{}' in database",
            other
        ))),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct SessionRecord {
    id: Uuid,
    current_slide: i32,
    answers: Json<HashMap<String, serde_json::Value>>,
    is_completed: bool,
    score: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SessionRecord {
    fn to_domain(self) -> QuizSession {
        QuizSession {
            id: self.id,
            current_slide: self.current_slide.max(0) as usize,
            answers: self.answers.0,
            is_completed: self.is_completed,
            score: self.score,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ResponseRecord {
    id: Uuid,
    session_id: Uuid,
    question_id: String,
    question_type: String,
    user_answer: Option<String>,
    image_ref: Option<String>,
    ai_score: Option<i32>,
    ai_feedback: Option<String>,
    is_correct: Option<bool>,
    created_at: DateTime<Utc>,
}

impl ResponseRecord {
    fn to_domain(self) -> PortResult<QuestionResponse> {
        Ok(QuestionResponse {
            id: self.id,
            session_id: self.session_id,
            question_id: self.question_id,
            question_type: question_type_from_db(&self.question_type)?,
            user_answer: self.user_answer,
            image_ref: self.image_ref,
            ai_score: self.ai_score,
            ai_feedback: self.ai_feedback,
            is_correct: self.is_correct,
            created_at: self.created_at,
        })
    }
}

//=========================================================================================
// `SessionStore` Trait Implementation
//=========================================================================================

const SESSION_COLUMNS: &str =
    "id, current_slide, answers, is_completed, score, created_at, updated_at";
const RESPONSE_COLUMNS: &str = "id, session_id, question_id, question_type, user_answer, \
                                image_ref, ai_score, ai_feedback, is_correct, created_at";

#[async_trait]
impl SessionStore for PgStore {
    async fn create_session(&self) -> PortResult<QuizSession> {
        let sql = format!(
            "INSERT INTO quiz_sessions (id, current_slide, answers, is_completed) \
             VALUES ($1, 0, '{{}}'::jsonb, FALSE) RETURNING {SESSION_COLUMNS}"
        );
        let record = sqlx::query_as::<_, SessionRecord>(&sql)
            .bind(Uuid::new_v4())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(record.to_domain())
    }

    async fn get_session(&self, session_id: Uuid) -> PortResult<QuizSession> {
        let sql = format!("SELECT {SESSION_COLUMNS} FROM quiz_sessions WHERE id = $1");
        let record = sqlx::query_as::<_, SessionRecord>(&sql)
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    PortError::NotFound(format!("Session {} not found", session_id))
                }
                _ => PortError::Unexpected(e.to_string()),
            })?;
        Ok(record.to_domain())
    }

    async fn update_session(
        &self,
        session_id: Uuid,
        patch: SessionPatch,
    ) -> PortResult<QuizSession> {
        let sql = format!(
            "UPDATE quiz_sessions SET \
                 current_slide = COALESCE($2, current_slide), \
                 answers = COALESCE($3, answers), \
                 is_completed = COALESCE($4, is_completed), \
                 score = COALESCE($5, score), \
                 updated_at = now() \
             WHERE id = $1 RETURNING {SESSION_COLUMNS}"
        );
        let record = sqlx::query_as::<_, SessionRecord>(&sql)
            .bind(session_id)
            .bind(patch.current_slide.map(|s| s as i32))
            .bind(patch.answers.map(Json))
            .bind(patch.is_completed)
            .bind(patch.score)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    PortError::NotFound(format!("Session {} not found", session_id))
                }
                _ => PortError::Unexpected(e.to_string()),
            })?;
        Ok(record.to_domain())
    }

    async fn create_response(&self, new: NewResponse) -> PortResult<QuestionResponse> {
        super::validate_new_response(&new)?;
        let sql = format!(
            "INSERT INTO question_responses \
                 (id, session_id, question_id, question_type, user_answer, image_ref, \
                  ai_score, ai_feedback, is_correct) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {RESPONSE_COLUMNS}"
        );
        let record = sqlx::query_as::<_, ResponseRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.session_id)
            .bind(&new.question_id)
            .bind(question_type_to_db(new.question_type))
            .bind(&new.user_answer)
            .bind(&new.image_ref)
            .bind(new.ai_score)
            .bind(&new.ai_feedback)
            .bind(new.is_correct)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        record.to_domain()
    }

    async fn responses_for_session(&self, session_id: Uuid) -> PortResult<Vec<QuestionResponse>> {
        let sql = format!(
            "SELECT {RESPONSE_COLUMNS} FROM question_responses \
             WHERE session_id = $1 ORDER BY created_at ASC, id ASC"
        );
        let records = sqlx::query_as::<_, ResponseRecord>(&sql)
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }
}
