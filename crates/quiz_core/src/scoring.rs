//! crates/quiz_core/src/scoring.rs
//!
//! The scoring aggregator: derives an overall performance summary from the
//! accumulated question responses of one session. A purely derived read —
//! rerunning it over the same response set yields an identical summary.

use crate::catalog::{Catalog, Subject};
use crate::domain::{QuestionResponse, QuestionType};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScoringError {
    /// A response references a question id absent from the catalog. Failing
    /// here beats silently attributing the response to some default subject
    /// and skewing the per-subject breakdown.
    #[error("response references unknown question id '{0}'")]
    UnknownQuestion(String),
}

/// Aggregated result of one test run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    /// 0-100, rounded.
    pub overall_score: i32,
    pub mcq_correct: usize,
    pub mcq_total: usize,
    /// Mean written-answer score on the 0-5 scale.
    pub written_average: f64,
    /// Rounded percent per subject, for subjects that received answers.
    pub subject_performance: BTreeMap<Subject, f64>,
}

#[derive(Default)]
struct SubjectTally {
    mcq_correct: usize,
    mcq_total: usize,
    image_score_sum: i64,
    image_total: usize,
}

impl SubjectTally {
    fn percent(&self) -> f64 {
        let mcq = (self.mcq_total > 0)
            .then(|| self.mcq_correct as f64 / self.mcq_total as f64 * 100.0);
        // 0-5 written scale normalized to 0-100.
        let image = (self.image_total > 0)
            .then(|| self.image_score_sum as f64 / self.image_total as f64 * 20.0);
        match (mcq, image) {
            (Some(m), Some(i)) => ((m + i) / 2.0).round(),
            (Some(m), None) => m.round(),
            (None, Some(i)) => i.round(),
            (None, None) => 0.0,
        }
    }
}

/// Summarizes a session's responses against the catalog they were drawn from.
///
/// MCQ accuracy and the written average each contribute half of the overall
/// score when both question kinds were answered; with MCQs only, accuracy is
/// the whole score. Every response must resolve to a catalog question.
pub fn summarize(
    responses: &[QuestionResponse],
    catalog: &Catalog,
) -> Result<PerformanceSummary, ScoringError> {
    let mut mcq_correct = 0;
    let mut mcq_total = 0;
    let mut written_sum: i64 = 0;
    let mut written_total = 0;
    let mut tallies: BTreeMap<Subject, SubjectTally> = BTreeMap::new();

    for response in responses {
        let subject = catalog
            .subject_of(&response.question_id)
            .ok_or_else(|| ScoringError::UnknownQuestion(response.question_id.clone()))?;
        let tally = tallies.entry(subject).or_default();
        match response.question_type {
            QuestionType::Mcq => {
                mcq_total += 1;
                tally.mcq_total += 1;
                if response.is_correct == Some(true) {
                    mcq_correct += 1;
                    tally.mcq_correct += 1;
                }
            }
            QuestionType::ImageUpload => {
                let score = i64::from(response.ai_score.unwrap_or(0));
                written_total += 1;
                written_sum += score;
                tally.image_total += 1;
                tally.image_score_sum += score;
            }
        }
    }

    let written_average = if written_total > 0 {
        written_sum as f64 / written_total as f64
    } else {
        0.0
    };

    let overall_score = if mcq_total > 0 && written_total > 0 {
        (mcq_correct as f64 / mcq_total as f64 * 50.0 + written_average / 5.0 * 50.0).round() as i32
    } else if mcq_total > 0 {
        (mcq_correct as f64 / mcq_total as f64 * 100.0).round() as i32
    } else {
        0
    };

    let subject_performance = tallies
        .into_iter()
        .map(|(subject, tally)| (subject, tally.percent()))
        .collect();

    Ok(PerformanceSummary {
        overall_score,
        mcq_correct,
        mcq_total,
        written_average,
        subject_performance,
    })
}

/// Closing message shown with the summary, keyed off the overall score.
pub fn encouragement_message(overall_score: i32) -> &'static str {
    if overall_score >= 80 {
        "You're absolutely crushing it! 🌟 Your understanding of these concepts is excellent. \
         You're definitely ready for that retake! Keep up this fantastic momentum."
    } else if overall_score >= 70 {
        "You're stronger than you think! 💪 Your concepts are developing well, and you're on \
         the right track. Focus on the areas where you can improve, and you'll be ready to ace \
         that retake!"
    } else if overall_score >= 60 {
        "You're making good progress! 🌱 I can see your understanding growing. With some \
         focused practice on the key concepts, you'll see significant improvement. Don't give up!"
    } else {
        "Every expert was once a beginner! 🌟 You have great potential, and every attempt is a \
         step forward. Focus on understanding the fundamental concepts, and you'll be amazed at \
         your progress. Keep going!"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn response(question_id: &str, question_type: QuestionType) -> QuestionResponse {
        QuestionResponse {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            question_id: question_id.to_string(),
            question_type,
            user_answer: None,
            image_ref: None,
            ai_score: None,
            ai_feedback: None,
            is_correct: None,
            created_at: Utc::now(),
        }
    }

    fn mcq_response(question_id: &str, correct: bool) -> QuestionResponse {
        QuestionResponse {
            is_correct: Some(correct),
            ai_score: Some(if correct { 1 } else { 0 }),
            ..response(question_id, QuestionType::Mcq)
        }
    }

    fn image_response(question_id: &str, score: i32) -> QuestionResponse {
        QuestionResponse {
            ai_score: Some(score),
            is_correct: Some(score >= 3),
            ..response(question_id, QuestionType::ImageUpload)
        }
    }

    #[test]
    fn mixed_responses_split_the_overall_score() {
        let catalog = Catalog::builtin();
        let responses = vec![
            mcq_response("mcq1", true),
            mcq_response("mcq2", false),
            image_response("img1", 4),
            image_response("img2", 2),
        ];
        let summary = summarize(&responses, &catalog).unwrap();
        assert_eq!(summary.mcq_correct, 1);
        assert_eq!(summary.mcq_total, 2);
        assert!((summary.written_average - 3.0).abs() < 1e-9);
        // round(1/2 * 50 + 3/5 * 50) = 55
        assert_eq!(summary.overall_score, 55);
    }

    #[test]
    fn mcq_only_scales_to_one_hundred() {
        let catalog = Catalog::builtin();
        let responses = vec![
            mcq_response("mcq1", true),
            mcq_response("mcq2", true),
            mcq_response("mcq3", false),
        ];
        let summary = summarize(&responses, &catalog).unwrap();
        assert_eq!(summary.overall_score, 67);
        assert!((summary.written_average - 0.0).abs() < 1e-9);
    }

    #[test]
    fn no_responses_scores_zero() {
        let summary = summarize(&[], &Catalog::builtin()).unwrap();
        assert_eq!(summary.overall_score, 0);
        assert_eq!(summary.mcq_total, 0);
        assert!(summary.subject_performance.is_empty());
    }

    #[test]
    fn subject_breakdown_combines_mcq_and_written() {
        let catalog = Catalog::builtin();
        // Pharmacology: mcq1 correct (100%) + img1 score 5 (100%) -> 100.
        // Pathology: img2 score 2 -> 40. Genetics: mcq2 wrong -> 0.
        let responses = vec![
            mcq_response("mcq1", true),
            mcq_response("mcq2", false),
            image_response("img1", 5),
            image_response("img2", 2),
        ];
        let summary = summarize(&responses, &catalog).unwrap();
        assert_eq!(summary.subject_performance[&Subject::Pharmacology], 100.0);
        assert_eq!(summary.subject_performance[&Subject::Pathology], 40.0);
        assert_eq!(summary.subject_performance[&Subject::Genetics], 0.0);
    }

    #[test]
    fn missing_ai_score_counts_as_zero() {
        let catalog = Catalog::builtin();
        let responses = vec![
            image_response("img1", 4),
            response("img2", QuestionType::ImageUpload),
        ];
        let summary = summarize(&responses, &catalog).unwrap();
        assert!((summary.written_average - 2.0).abs() < 1e-9);
        // No MCQs answered: the overall score stays at zero.
        assert_eq!(summary.overall_score, 0);
    }

    #[test]
    fn unknown_question_id_fails_loudly() {
        let catalog = Catalog::builtin();
        let responses = vec![mcq_response("mcq1", true), mcq_response("ghost", true)];
        assert_eq!(
            summarize(&responses, &catalog),
            Err(ScoringError::UnknownQuestion("ghost".to_string()))
        );
    }

    #[test]
    fn summarize_is_idempotent() {
        let catalog = Catalog::builtin();
        let responses = vec![
            mcq_response("mcq1", true),
            mcq_response("mcq4", false),
            image_response("img3", 3),
        ];
        let first = summarize(&responses, &catalog).unwrap();
        let second = summarize(&responses, &catalog).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn encouragement_tiers() {
        assert!(encouragement_message(92).contains("crushing"));
        assert!(encouragement_message(75).contains("stronger"));
        assert!(encouragement_message(63).contains("progress"));
        assert!(encouragement_message(20).contains("beginner"));
    }
}
