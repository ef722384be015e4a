//! services/api/src/adapters/grader.rs
//!
//! This module contains the adapter for the AI grading service.
//! It implements the `GradingService` port from the `core` crate using an
//! OpenAI-compatible LLM: plain chat completion for MCQ feedback, and a
//! vision request with a structured JSON reply for handwritten answers.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ImageUrlArgs,
        ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use quiz_core::{
    catalog::MarkingScheme,
    domain::ImageAnalysis,
    ports::{GradingService, PortError, PortResult},
};
use serde::Deserialize;

const MCQ_SYSTEM_PROMPT: &str = "You are a friendly AI learning companion for nursing students. \
Provide brief, encouraging feedback for multiple-choice answers. Respond in 2-3 sentences max \
using markdown: **bold** for key concepts, *italics* for emphasis. Keep it warm, focus on the \
main learning point, and close with a quick tip if space allows.";

const IMAGE_SYSTEM_PROMPT: &str = "You are a friendly AI learning companion grading a nursing \
student's handwritten answer from a photo. Read the handwriting, judge it against the marking \
scheme, and reply with a single JSON object containing exactly these fields: \
\"isCorrect\" (boolean, true if the answer shows basic understanding), \
\"score\" (integer 0-5 for content quality and completeness), \
\"feedback\" (encouraging paragraph with the overall assessment), \
\"strengths\" (array of up to 3 positive aspects), \
\"improvements\" (array of up to 3 specific areas needing work), \
\"suggestions\" (array of up to 3 actionable study tips). \
Be encouraging but provide honest, constructive feedback.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GradingService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiGraderAdapter {
    client: Client<OpenAIConfig>,
    grader_model: String,
    vision_model: String,
}

impl OpenAiGraderAdapter {
    /// Creates a new `OpenAiGraderAdapter`. `grader_model` handles the text
    /// feedback, `vision_model` the handwritten-image grading.
    pub fn new(client: Client<OpenAIConfig>, grader_model: String, vision_model: String) -> Self {
        Self {
            client,
            grader_model,
            vision_model,
        }
    }
}

/// The model's raw JSON reply; every field is optional so a sloppy reply
/// degrades to defaults instead of failing the whole grading call.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    is_correct: Option<bool>,
    score: Option<f64>,
    feedback: Option<String>,
    strengths: Option<Vec<String>>,
    improvements: Option<Vec<String>>,
    suggestions: Option<Vec<String>>,
}

impl RawAnalysis {
    fn into_analysis(self) -> ImageAnalysis {
        ImageAnalysis {
            is_correct: self.is_correct.unwrap_or(false),
            score: (self.score.unwrap_or(2.0) as i32).clamp(0, 5),
            feedback: self.feedback.unwrap_or_else(|| {
                "Your answer shows good effort. Keep working on including all the key points \
                 for full marks."
                    .to_string()
            }),
            strengths: self
                .strengths
                .unwrap_or_else(|| vec!["Shows understanding of basic concepts".to_string()]),
            improvements: self.improvements.unwrap_or_else(|| {
                vec![
                    "Include more specific details".to_string(),
                    "Cover all key points mentioned in the question".to_string(),
                ]
            }),
            suggestions: self.suggestions.unwrap_or_else(|| {
                vec![
                    "Review the marking scheme and ensure all points are addressed".to_string(),
                    "Practice writing more detailed explanations".to_string(),
                ]
            }),
        }
    }
}

//=========================================================================================
// `GradingService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GradingService for OpenAiGraderAdapter {
    /// Generates short encouraging feedback for a graded MCQ answer.
    async fn grade_mcq(
        &self,
        user_answer: &str,
        correct_answer: &str,
        is_correct: bool,
        explanation: &str,
    ) -> PortResult<String> {
        let user_input = format!(
            "Question details:\n\
             - User selected: Option {user_answer}\n\
             - Correct answer: Option {correct_answer}\n\
             - Result: {}\n\
             - Explanation: {explanation}\n\n\
             Format: brief celebration/encouragement + key concept explanation + quick tip.",
            if is_correct { "Correct" } else { "Incorrect" }
        );

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(MCQ_SYSTEM_PROMPT)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_input)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.grader_model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::External(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content)
            } else {
                Err(PortError::External(
                    "Grading LLM response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::External(
                "Grading LLM returned no choices in its response.".to_string(),
            ))
        }
    }

    /// Scores a handwritten-answer photo against the marking scheme.
    async fn grade_image(
        &self,
        image: &[u8],
        scheme: &MarkingScheme,
    ) -> PortResult<ImageAnalysis> {
        let data_url = format!("data:image/jpeg;base64,{}", BASE64.encode(image));

        let prompt = format!(
            "MARKING SCHEME:\n\
             Key Points to Cover: {}\n\
             Full Marks Criteria: {}\n\n\
             Grade the attached handwritten answer against this scheme. Consider correctness, \
             completeness, length, and presentation. Reply with the JSON object only.",
            scheme.key_points.join(", "),
            scheme.full_marks_criteria.join(", "),
        );

        let user_content = vec![
            ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestMessageContentPartImageArgs::default()
                .image_url(
                    ImageUrlArgs::default()
                        .url(data_url)
                        .build()
                        .map_err(|e| PortError::Unexpected(e.to_string()))?,
                )
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(IMAGE_SYSTEM_PROMPT)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_content)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.vision_model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::External(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::External("Vision LLM response contained no text content.".to_string())
            })?;

        let raw: RawAnalysis = serde_json::from_str(&content)
            .map_err(|e| PortError::External(format!("Unparseable grading reply: {}", e)))?;
        Ok(raw.into_analysis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sloppy_model_reply_degrades_to_defaults() {
        let raw: RawAnalysis = serde_json::from_str("{\"score\": 9.4}").unwrap();
        let analysis = raw.into_analysis();
        assert_eq!(analysis.score, 5); // clamped to the 0-5 scale
        assert!(!analysis.is_correct);
        assert!(!analysis.feedback.is_empty());
        assert!(!analysis.suggestions.is_empty());
    }

    #[test]
    fn complete_reply_passes_through() {
        let raw: RawAnalysis = serde_json::from_str(
            r#"{
                "isCorrect": true,
                "score": 4,
                "feedback": "Well structured.",
                "strengths": ["Covers the mechanism"],
                "improvements": ["Add contraindications"],
                "suggestions": ["Use headings"]
            }"#,
        )
        .unwrap();
        let analysis = raw.into_analysis();
        assert!(analysis.is_correct);
        assert_eq!(analysis.score, 4);
        assert_eq!(analysis.strengths, vec!["Covers the mechanism".to_string()]);
    }
}
