//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use quiz_core::catalog::MarkingScheme;
use quiz_core::domain::{
    ImageAnalysis, NewResponse, QuestionResponse, QuestionType, QuizSession,
};
use quiz_core::ports::PortError;
use quiz_core::{fallback, scoring, Slide};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_session_handler,
        update_session_handler,
        submit_mcq_handler,
        submit_image_handler,
        list_responses_handler,
        session_summary_handler,
        deck_overview_handler,
    ),
    components(
        schemas(
            SessionDto,
            UpdateSessionRequest,
            McqSubmission,
            McqSubmissionResponse,
            ImageSubmissionResponse,
            ResponseDto,
            QuestionTypeDto,
            AnalysisDto,
            SummaryDto,
            DeckOverview,
        )
    ),
    tags(
        (name = "Practice Test API", description = "API endpoints for the AI-graded practice test.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A test session as returned to the client.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: Uuid,
    pub current_slide: usize,
    #[schema(value_type = Object)]
    pub answers: HashMap<String, serde_json::Value>,
    pub is_completed: bool,
    pub score: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<QuizSession> for SessionDto {
    fn from(session: QuizSession) -> Self {
        Self {
            id: session.id,
            current_slide: session.current_slide,
            answers: session.answers,
            is_completed: session.is_completed,
            score: session.score,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// Partial session update; omitted fields keep their stored values.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub current_slide: Option<usize>,
    #[schema(value_type = Object)]
    pub answers: Option<HashMap<String, serde_json::Value>>,
    pub is_completed: Option<bool>,
    pub score: Option<i32>,
}

impl From<UpdateSessionRequest> for quiz_core::domain::SessionPatch {
    fn from(body: UpdateSessionRequest) -> Self {
        Self {
            current_slide: body.current_slide,
            answers: body.answers,
            is_completed: body.is_completed,
            score: body.score,
        }
    }
}

/// An MCQ answer submission.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct McqSubmission {
    pub session_id: Uuid,
    pub question_id: String,
    /// The option id the user selected.
    pub answer: String,
    pub correct_answer: String,
    pub explanation: String,
}

/// A stored question response as returned to the client.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDto {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_id: String,
    pub question_type: QuestionTypeDto,
    pub user_answer: Option<String>,
    pub image_ref: Option<String>,
    pub ai_score: Option<i32>,
    pub ai_feedback: Option<String>,
    pub is_correct: Option<bool>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionTypeDto {
    Mcq,
    ImageUpload,
}

impl From<QuestionResponse> for ResponseDto {
    fn from(response: QuestionResponse) -> Self {
        Self {
            id: response.id,
            session_id: response.session_id,
            question_id: response.question_id,
            question_type: match response.question_type {
                QuestionType::Mcq => QuestionTypeDto::Mcq,
                QuestionType::ImageUpload => QuestionTypeDto::ImageUpload,
            },
            user_answer: response.user_answer,
            image_ref: response.image_ref,
            ai_score: response.ai_score,
            ai_feedback: response.ai_feedback,
            is_correct: response.is_correct,
            created_at: response.created_at,
        }
    }
}

/// The payload returned after grading an MCQ submission.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct McqSubmissionResponse {
    pub response: ResponseDto,
    pub feedback: String,
    pub is_correct: bool,
}

/// The grading breakdown for a handwritten answer.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDto {
    pub is_correct: bool,
    pub score: i32,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub suggestions: Vec<String>,
}

impl From<ImageAnalysis> for AnalysisDto {
    fn from(analysis: ImageAnalysis) -> Self {
        Self {
            is_correct: analysis.is_correct,
            score: analysis.score,
            feedback: analysis.feedback,
            strengths: analysis.strengths,
            improvements: analysis.improvements,
            suggestions: analysis.suggestions,
        }
    }
}

/// The payload returned after grading an image submission.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageSubmissionResponse {
    pub response: ResponseDto,
    pub analysis: AnalysisDto,
}

/// The aggregated performance summary for one session.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub overall_score: i32,
    pub mcq_correct: usize,
    pub mcq_total: usize,
    pub written_average: f64,
    pub subject_performance: BTreeMap<String, f64>,
    pub encouragement: String,
}

/// Shape of the deck served by this process.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeckOverview {
    pub total_slides: usize,
    pub total_questions: usize,
    pub mcq_count: usize,
    pub image_count: usize,
    pub question_ids: Vec<String>,
}

/// Maps a port error to the HTTP status the client should see.
fn port_error_response(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::External(msg) | PortError::Unexpected(msg) => {
            error!("Store/port failure: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create a new test session.
#[utoipa::path(
    post,
    path = "/api/sessions",
    responses(
        (status = 201, description = "Session created successfully", body = SessionDto),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_session_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = app_state
        .store
        .create_session()
        .await
        .map_err(port_error_response)?;
    Ok((StatusCode::CREATED, Json(SessionDto::from(session))))
}

/// Partially update a session (slide progress, completion flag, answers).
#[utoipa::path(
    patch,
    path = "/api/sessions/{id}",
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Session updated", body = SessionDto),
        (status = 404, description = "Session not found")
    ),
    params(("id" = Uuid, Path, description = "Session id"))
)]
pub async fn update_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateSessionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = app_state
        .store
        .update_session(id, body.into())
        .await
        .map_err(port_error_response)?;
    Ok(Json(SessionDto::from(session)))
}

/// Submit an MCQ answer: grades it, stores the response, returns AI feedback.
///
/// A grading-service failure is never surfaced; the response falls back to a
/// fixed encouraging message.
#[utoipa::path(
    post,
    path = "/api/questions/mcq",
    request_body = McqSubmission,
    responses(
        (status = 200, description = "Answer graded and stored", body = McqSubmissionResponse),
        (status = 400, description = "Missing session or question id")
    )
)]
pub async fn submit_mcq_handler(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<McqSubmission>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let is_correct = body.answer == body.correct_answer;

    let feedback = match app_state
        .grader
        .grade_mcq(&body.answer, &body.correct_answer, is_correct, &body.explanation)
        .await
    {
        Ok(feedback) => feedback,
        Err(e) => {
            warn!("MCQ grading degraded to fallback feedback: {}", e);
            fallback::mcq_feedback(is_correct)
        }
    };

    let response = app_state
        .store
        .create_response(NewResponse {
            session_id: body.session_id,
            question_id: body.question_id,
            question_type: QuestionType::Mcq,
            user_answer: Some(body.answer),
            image_ref: None,
            ai_score: Some(if is_correct { 1 } else { 0 }),
            ai_feedback: Some(feedback.clone()),
            is_correct: Some(is_correct),
        })
        .await
        .map_err(port_error_response)?;

    Ok(Json(McqSubmissionResponse {
        response: ResponseDto::from(response),
        feedback,
        is_correct,
    }))
}

/// Wire format of the `markingScheme` multipart field.
#[derive(Default, Deserialize)]
struct MarkingSchemeBody {
    #[serde(default, alias = "keyPoints")]
    key_points: Vec<String>,
    #[serde(default, alias = "fullMarksCriteria")]
    full_marks_criteria: Vec<String>,
}

impl From<MarkingSchemeBody> for MarkingScheme {
    fn from(body: MarkingSchemeBody) -> Self {
        Self {
            key_points: body.key_points,
            full_marks_criteria: body.full_marks_criteria,
        }
    }
}

const MAX_IMAGES_PER_SUBMISSION: usize = 5;

/// Submit a handwritten answer as one or more photos (multipart form).
///
/// Only the primary (first) image is graded. The upload is compressed before
/// grading; a grading failure degrades to a fixed benefit-of-the-doubt
/// analysis.
#[utoipa::path(
    post,
    path = "/api/questions/image",
    request_body(
        content_type = "multipart/form-data",
        description = "Fields: `images` (1-5 files), `sessionId`, `questionId`, optional `markingScheme` (JSON)."
    ),
    responses(
        (status = 200, description = "Answer graded and stored", body = ImageSubmissionResponse),
        (status = 400, description = "Bad request (no images, too many images, or missing ids)")
    )
)]
pub async fn submit_image_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut images: Vec<bytes::Bytes> = Vec::new();
    let mut session_id: Option<Uuid> = None;
    let mut question_id: Option<String> = None;
    let mut scheme = MarkingScheme::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        // `bytes`/`text` consume the field, so detach the name first.
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => {
                if images.len() == MAX_IMAGES_PER_SUBMISSION {
                    return Err((
                        StatusCode::BAD_REQUEST,
                        format!("At most {} images per submission", MAX_IMAGES_PER_SUBMISSION),
                    ));
                }
                let data = field.bytes().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read image bytes: {}", e),
                    )
                })?;
                images.push(data);
            }
            "sessionId" => {
                let raw = field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Bad sessionId field: {}", e))
                })?;
                let parsed = Uuid::parse_str(raw.trim()).map_err(|_| {
                    (StatusCode::BAD_REQUEST, "Invalid sessionId format".to_string())
                })?;
                session_id = Some(parsed);
            }
            "questionId" => {
                question_id = Some(field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Bad questionId field: {}", e))
                })?);
            }
            "markingScheme" => {
                let raw = field.text().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        format!("Bad markingScheme field: {}", e),
                    )
                })?;
                let body: MarkingSchemeBody = serde_json::from_str(&raw).map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        format!("markingScheme is not valid JSON: {}", e),
                    )
                })?;
                scheme = body.into();
            }
            _ => {}
        }
    }

    let session_id = session_id
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "sessionId is required".to_string()))?;
    let question_id = question_id
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "questionId is required".to_string()))?;
    let primary = images
        .first()
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "No images provided".to_string()))?;

    let compressed = app_state.preprocessor.compress(primary);

    let analysis = match app_state.grader.grade_image(&compressed, &scheme).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!("Image grading degraded to fallback analysis: {}", e);
            fallback::image_analysis()
        }
    };

    // 3/5 or above counts as correct; incorrect answers store zero marks.
    let is_correct = analysis.score >= 3;
    let final_score = if is_correct { analysis.score } else { 0 };
    let image_ref = format!("data:image/jpeg;base64,{}", BASE64.encode(&compressed));

    let response = app_state
        .store
        .create_response(NewResponse {
            session_id,
            question_id,
            question_type: QuestionType::ImageUpload,
            user_answer: None,
            image_ref: Some(image_ref),
            ai_score: Some(final_score),
            ai_feedback: Some(analysis.feedback.clone()),
            is_correct: Some(is_correct),
        })
        .await
        .map_err(port_error_response)?;

    Ok(Json(ImageSubmissionResponse {
        response: ResponseDto::from(response),
        analysis: AnalysisDto::from(analysis),
    }))
}

/// List a session's responses in creation order.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/responses",
    responses(
        (status = 200, description = "Responses in creation order (empty for unknown sessions)", body = [ResponseDto])
    ),
    params(("id" = Uuid, Path, description = "Session id"))
)]
pub async fn list_responses_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let responses = app_state
        .store
        .responses_for_session(id)
        .await
        .map_err(port_error_response)?;
    let dtos: Vec<ResponseDto> = responses.into_iter().map(ResponseDto::from).collect();
    Ok(Json(dtos))
}

/// Aggregate a session's responses into a performance summary.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/summary",
    responses(
        (status = 200, description = "Performance summary", body = SummaryDto),
        (status = 404, description = "Session not found"),
        (status = 422, description = "A response references an unknown question")
    ),
    params(("id" = Uuid, Path, description = "Session id"))
)]
pub async fn session_summary_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 404 for unknown sessions even though an empty response list would
    // aggregate cleanly.
    app_state
        .store
        .get_session(id)
        .await
        .map_err(port_error_response)?;
    let responses = app_state
        .store
        .responses_for_session(id)
        .await
        .map_err(port_error_response)?;

    let summary = scoring::summarize(&responses, &app_state.catalog)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let encouragement = scoring::encouragement_message(summary.overall_score).to_string();
    Ok(Json(SummaryDto {
        overall_score: summary.overall_score,
        mcq_correct: summary.mcq_correct,
        mcq_total: summary.mcq_total,
        written_average: summary.written_average,
        subject_performance: summary
            .subject_performance
            .into_iter()
            .map(|(subject, percent)| (subject.to_string(), percent))
            .collect(),
        encouragement,
    }))
}

/// Describe the deck served by this process (counts and question ids).
#[utoipa::path(
    get,
    path = "/api/questions",
    responses(
        (status = 200, description = "Deck shape", body = DeckOverview)
    )
)]
pub async fn deck_overview_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let deck = &app_state.deck;
    let mcq_count = deck.iter().filter(|s| matches!(s, Slide::Mcq(_))).count();
    let image_count = deck
        .iter()
        .filter(|s| matches!(s, Slide::ImageUpload(_)))
        .count();
    Json(DeckOverview {
        total_slides: deck.len(),
        total_questions: deck.question_count(),
        mcq_count,
        image_count,
        question_ids: deck
            .iter()
            .filter_map(|s| s.question_id().map(str::to_string))
            .collect(),
    })
}
