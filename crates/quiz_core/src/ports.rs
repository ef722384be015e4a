//! crates/quiz_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like databases
//! or the grading API.

use crate::catalog::MarkingScheme;
use crate::domain::{ImageAnalysis, NewResponse, QuestionResponse, QuizSession, SessionPatch};
use async_trait::async_trait;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("External service failure: {0}")]
    External(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Storage for quiz sessions and their question responses.
///
/// Each call is an independent, atomic request; no transaction spans calls.
/// Backed by an in-memory map by default and Postgres in production.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Allocates a fresh session at slide 0 with an empty answers map.
    async fn create_session(&self) -> PortResult<QuizSession>;

    async fn get_session(&self, session_id: Uuid) -> PortResult<QuizSession>;

    /// Shallow-merges `patch` into the stored session and refreshes its
    /// `updated_at`. `NotFound` if the id is unknown; nothing is created.
    async fn update_session(&self, session_id: Uuid, patch: SessionPatch)
        -> PortResult<QuizSession>;

    /// Stores one answered-question record. `Validation` if the required
    /// identifiers are missing; duplicates for the same question are allowed.
    async fn create_response(&self, new: NewResponse) -> PortResult<QuestionResponse>;

    /// All responses of a session in creation order. An unknown session
    /// yields an empty list, not an error.
    async fn responses_for_session(&self, session_id: Uuid) -> PortResult<Vec<QuestionResponse>>;
}

/// External AI grading of user answers. Callers must substitute the payloads
/// in [`crate::fallback`] when a call fails; grading errors never reach the
/// end user.
#[async_trait]
pub trait GradingService: Send + Sync {
    /// Short encouraging feedback for an MCQ answer.
    async fn grade_mcq(
        &self,
        user_answer: &str,
        correct_answer: &str,
        is_correct: bool,
        explanation: &str,
    ) -> PortResult<String>;

    /// Scores a handwritten-answer photo against the marking scheme.
    async fn grade_image(
        &self,
        image: &[u8],
        scheme: &MarkingScheme,
    ) -> PortResult<ImageAnalysis>;
}

/// Shrinks an uploaded image before grading. Infallible by contract:
/// implementations return the input unchanged when processing fails.
pub trait ImagePreprocessor: Send + Sync {
    fn compress(&self, image: &[u8]) -> Vec<u8>;
}
