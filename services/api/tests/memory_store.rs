//! Integration tests for the in-memory `SessionStore` backend: creation,
//! shallow-merge updates, response validation, and creation ordering.

use api_lib::adapters::memory::MemoryStore;
use quiz_core::domain::{NewResponse, QuestionType, SessionPatch};
use quiz_core::ports::{PortError, SessionStore};
use uuid::Uuid;

fn new_response(session_id: Uuid, question_id: &str) -> NewResponse {
    NewResponse {
        session_id,
        question_id: question_id.to_string(),
        question_type: QuestionType::Mcq,
        user_answer: Some("B".to_string()),
        image_ref: None,
        ai_score: Some(1),
        ai_feedback: Some("Nice.".to_string()),
        is_correct: Some(true),
    }
}

#[tokio::test]
async fn created_sessions_start_at_the_welcome_slide() {
    let store = MemoryStore::new();
    let session = store.create_session().await.unwrap();
    assert_eq!(session.current_slide, 0);
    assert!(!session.is_completed);
    assert!(session.answers.is_empty());
    assert_eq!(session.score, None);

    let fetched = store.get_session(session.id).await.unwrap();
    assert_eq!(fetched.id, session.id);
}

#[tokio::test]
async fn update_is_a_shallow_merge() {
    let store = MemoryStore::new();
    let session = store.create_session().await.unwrap();

    let updated = store
        .update_session(
            session.id,
            SessionPatch {
                current_slide: Some(7),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.current_slide, 7);
    assert!(!updated.is_completed, "unspecified fields keep prior values");
    assert!(updated.updated_at >= session.updated_at);

    let completed = store
        .update_session(
            session.id,
            SessionPatch {
                is_completed: Some(true),
                score: Some(85),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(completed.current_slide, 7, "earlier merge survives");
    assert!(completed.is_completed);
    assert_eq!(completed.score, Some(85));
}

#[tokio::test]
async fn updating_an_unknown_session_is_not_found_and_creates_nothing() {
    let store = MemoryStore::new();
    let ghost = Uuid::new_v4();
    let err = store
        .update_session(ghost, SessionPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
    assert!(matches!(
        store.get_session(ghost).await.unwrap_err(),
        PortError::NotFound(_)
    ));
}

#[tokio::test]
async fn response_creation_validates_required_ids() {
    let store = MemoryStore::new();
    let session = store.create_session().await.unwrap();

    let missing_session = NewResponse {
        session_id: Uuid::nil(),
        ..new_response(session.id, "mcq1")
    };
    assert!(matches!(
        store.create_response(missing_session).await.unwrap_err(),
        PortError::Validation(_)
    ));

    let missing_question = new_response(session.id, "  ");
    assert!(matches!(
        store.create_response(missing_question).await.unwrap_err(),
        PortError::Validation(_)
    ));

    // Nothing was stored by the failed attempts.
    assert!(store
        .responses_for_session(session.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn responses_come_back_in_creation_order_per_session() {
    let store = MemoryStore::new();
    let first = store.create_session().await.unwrap();
    let second = store.create_session().await.unwrap();

    store.create_response(new_response(first.id, "mcq1")).await.unwrap();
    store.create_response(new_response(second.id, "mcq9")).await.unwrap();
    store.create_response(new_response(first.id, "mcq2")).await.unwrap();
    store.create_response(new_response(first.id, "img1")).await.unwrap();

    let mine: Vec<String> = store
        .responses_for_session(first.id)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.question_id)
        .collect();
    assert_eq!(mine, vec!["mcq1", "mcq2", "img1"]);
}

#[tokio::test]
async fn duplicate_submissions_create_separate_records() {
    let store = MemoryStore::new();
    let session = store.create_session().await.unwrap();
    let a = store.create_response(new_response(session.id, "mcq1")).await.unwrap();
    let b = store.create_response(new_response(session.id, "mcq1")).await.unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(store.responses_for_session(session.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_session_lists_no_responses() {
    let store = MemoryStore::new();
    assert!(store
        .responses_for_session(Uuid::new_v4())
        .await
        .unwrap()
        .is_empty());
}
