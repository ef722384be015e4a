//! crates/quiz_core/src/fallback.rs
//!
//! Fixed grading payloads used when the external grading service fails.
//! Degraded grading is never surfaced to the user as an error; they get
//! these canned messages (and the benefit of the doubt on written answers).

use crate::domain::ImageAnalysis;

/// Feedback substituted when MCQ grading fails.
pub fn mcq_feedback(is_correct: bool) -> String {
    if is_correct {
        "Excellent work! You got that right. Your understanding of this concept is solid."
            .to_string()
    } else {
        "Good try! The correct approach here involves understanding the key mechanism. \
         Keep studying and you'll master this!"
            .to_string()
    }
}

/// Analysis substituted when image grading fails: minimum passing score,
/// generic strengths and next steps.
pub fn image_analysis() -> ImageAnalysis {
    ImageAnalysis {
        is_correct: true,
        score: 3,
        feedback: "I can see you've put effort into your answer! While I'm having trouble \
                   analyzing the specific content right now, keep practicing your handwriting \
                   and ensure you cover all the key points mentioned in the question."
            .to_string(),
        strengths: vec![
            "Clear effort shown in attempting the question".to_string(),
            "Organized presentation of answer".to_string(),
        ],
        improvements: vec![
            "Ensure all key concepts are covered".to_string(),
            "Include specific examples where possible".to_string(),
        ],
        suggestions: vec![
            "Review the marking scheme carefully".to_string(),
            "Practice writing detailed explanations for better scores".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_analysis_is_a_passing_grade() {
        let analysis = image_analysis();
        assert!(analysis.is_correct);
        assert_eq!(analysis.score, 3);
        assert!(!analysis.feedback.is_empty());
    }

    #[test]
    fn mcq_feedback_tracks_correctness() {
        assert_ne!(mcq_feedback(true), mcq_feedback(false));
    }
}
