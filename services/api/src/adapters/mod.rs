//! services/api/src/adapters/mod.rs
//!
//! Concrete implementations of the core's service ports: the two session
//! store backends, the AI grading adapter, and the image preprocessor.

pub mod db;
pub mod grader;
pub mod image;
pub mod memory;

use quiz_core::domain::NewResponse;
use quiz_core::ports::{PortError, PortResult};

/// Schema validation shared by both store backends: a response record must
/// reference a session and a question.
pub(crate) fn validate_new_response(new: &NewResponse) -> PortResult<()> {
    if new.session_id.is_nil() {
        return Err(PortError::Validation("sessionId is required".to_string()));
    }
    if new.question_id.trim().is_empty() {
        return Err(PortError::Validation("questionId is required".to_string()));
    }
    Ok(())
}
