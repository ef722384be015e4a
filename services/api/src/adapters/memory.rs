//! services/api/src/adapters/memory.rs
//!
//! An in-memory implementation of the `SessionStore` port. The default
//! backend: one test run's state only has to outlive the process, and tests
//! get a store with no external dependencies.

use async_trait::async_trait;
use chrono::Utc;
use quiz_core::domain::{NewResponse, QuestionResponse, QuizSession, SessionPatch};
use quiz_core::ports::{PortError, PortResult, SessionStore};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A `SessionStore` backed by process-memory maps.
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<Uuid, QuizSession>>,
    /// Flat log; insertion order doubles as creation order.
    responses: RwLock<Vec<QuestionResponse>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self) -> PortResult<QuizSession> {
        let now = Utc::now();
        let session = QuizSession {
            id: Uuid::new_v4(),
            current_slide: 0,
            answers: HashMap::new(),
            is_completed: false,
            score: None,
            created_at: now,
            updated_at: now,
        };
        self.sessions.write().await.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get_session(&self, session_id: Uuid) -> PortResult<QuizSession> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Session {} not found", session_id)))
    }

    async fn update_session(
        &self,
        session_id: Uuid,
        patch: SessionPatch,
    ) -> PortResult<QuizSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| PortError::NotFound(format!("Session {} not found", session_id)))?;

        if let Some(current_slide) = patch.current_slide {
            session.current_slide = current_slide;
        }
        if let Some(answers) = patch.answers {
            session.answers = answers;
        }
        if let Some(is_completed) = patch.is_completed {
            session.is_completed = is_completed;
        }
        if let Some(score) = patch.score {
            session.score = Some(score);
        }
        session.updated_at = Utc::now();
        Ok(session.clone())
    }

    async fn create_response(&self, new: NewResponse) -> PortResult<QuestionResponse> {
        super::validate_new_response(&new)?;
        let response = QuestionResponse {
            id: Uuid::new_v4(),
            session_id: new.session_id,
            question_id: new.question_id,
            question_type: new.question_type,
            user_answer: new.user_answer,
            image_ref: new.image_ref,
            ai_score: new.ai_score,
            ai_feedback: new.ai_feedback,
            is_correct: new.is_correct,
            created_at: Utc::now(),
        };
        self.responses.write().await.push(response.clone());
        Ok(response)
    }

    async fn responses_for_session(&self, session_id: Uuid) -> PortResult<Vec<QuestionResponse>> {
        Ok(self
            .responses
            .read()
            .await
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect())
    }
}
