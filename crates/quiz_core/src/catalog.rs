//! crates/quiz_core/src/catalog.rs
//!
//! The static content catalog: the ordered pools of multiple-choice
//! questions, handwritten-answer (image upload) questions, and the
//! interstitial "fun break" items the sequencer interleaves between them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The exam subjects this catalog covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subject {
    Pharmacology,
    Pathology,
    Genetics,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Pharmacology => write!(f, "Pharmacology"),
            Subject::Pathology => write!(f, "Pathology"),
            Subject::Genetics => write!(f, "Genetics"),
        }
    }
}

/// One selectable option of a multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McqOption {
    pub id: String,
    pub text: String,
}

/// A multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McqQuestion {
    pub id: String,
    pub subject: Subject,
    pub text: String,
    pub options: Vec<McqOption>,
    /// Option id of the correct answer.
    pub correct_answer: String,
    pub explanation: String,
}

/// What a full-marks handwritten answer must contain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkingScheme {
    pub key_points: Vec<String>,
    pub full_marks_criteria: Vec<String>,
}

/// A question answered by uploading a photo of a handwritten answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageQuestion {
    pub id: String,
    pub subject: Subject,
    pub text: String,
    pub marks: u32,
    pub marking_scheme: MarkingScheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakKind {
    Meme,
    Question,
}

/// Display payload of a fun break. Which fields are set depends on the kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakContent {
    pub emoji: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub meme_text: Option<String>,
    pub question: Option<String>,
    pub placeholder: Option<String>,
}

/// A light interstitial slide shown between question runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunBreak {
    pub id: String,
    pub kind: BreakKind,
    pub content: BreakContent,
}

/// The ordered content pools a deck is built from.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub mcq_pool: Vec<McqQuestion>,
    pub image_pool: Vec<ImageQuestion>,
    pub break_pool: Vec<FunBreak>,
}

impl Catalog {
    /// Resolves a question id (MCQ or image) back to its subject.
    pub fn subject_of(&self, question_id: &str) -> Option<Subject> {
        self.mcq_pool
            .iter()
            .find(|q| q.id == question_id)
            .map(|q| q.subject)
            .or_else(|| {
                self.image_pool
                    .iter()
                    .find(|q| q.id == question_id)
                    .map(|q| q.subject)
            })
    }

    /// The built-in nursing practice-test catalog served by the app binary.
    pub fn builtin() -> Catalog {
        Catalog {
            mcq_pool: builtin_mcq_pool(),
            image_pool: builtin_image_pool(),
            break_pool: builtin_break_pool(),
        }
    }
}

fn mcq(
    id: &str,
    subject: Subject,
    text: &str,
    options: [(&str, &str); 4],
    correct: &str,
    explanation: &str,
) -> McqQuestion {
    McqQuestion {
        id: id.to_string(),
        subject,
        text: text.to_string(),
        options: options
            .iter()
            .map(|(id, text)| McqOption {
                id: id.to_string(),
                text: text.to_string(),
            })
            .collect(),
        correct_answer: correct.to_string(),
        explanation: explanation.to_string(),
    }
}

fn builtin_mcq_pool() -> Vec<McqQuestion> {
    vec![
        mcq(
            "mcq1",
            Subject::Pharmacology,
            "Which of the following is a beta-blocker used in hypertension?",
            [("A", "Atropine"), ("B", "Propranolol"), ("C", "Captopril"), ("D", "Amlodipine")],
            "B",
            "Propranolol is a non-selective beta-blocker used to manage hypertension by \
             decreasing heart rate and cardiac output.",
        ),
        mcq(
            "mcq2",
            Subject::Genetics,
            "Which cell is mainly responsible for producing antibodies?",
            [("A", "T cells"), ("B", "B cells"), ("C", "Platelets"), ("D", "Macrophages")],
            "B",
            "B cells differentiate into plasma cells which produce antibodies to fight antigens.",
        ),
        mcq(
            "mcq3",
            Subject::Pharmacology,
            "Penicillin inhibits bacterial growth by interfering with:",
            [
                ("A", "DNA replication"),
                ("B", "Cell wall synthesis"),
                ("C", "Protein synthesis"),
                ("D", "RNA synthesis"),
            ],
            "B",
            "Penicillin disrupts the synthesis of bacterial cell walls, leading to lysis of \
             the bacteria.",
        ),
        mcq(
            "mcq4",
            Subject::Genetics,
            "Hemophilia is an example of:",
            [
                ("A", "Autosomal dominant"),
                ("B", "Autosomal recessive"),
                ("C", "X-linked recessive"),
                ("D", "Mitochondrial disorder"),
            ],
            "C",
            "Hemophilia is inherited in an X-linked recessive pattern, mostly affecting males.",
        ),
        mcq(
            "mcq5",
            Subject::Pathology,
            "The first phase of acute inflammation is:",
            [("A", "Vasodilation"), ("B", "Margination"), ("C", "Chemotaxis"), ("D", "Phagocytosis")],
            "A",
            "Vasodilation increases blood flow and is the initial vascular response in acute \
             inflammation.",
        ),
        mcq(
            "mcq6",
            Subject::Pharmacology,
            "Drug half-life refers to:",
            [
                ("A", "Time for maximum effect"),
                ("B", "Time to excrete drug"),
                ("C", "Time for 50% elimination"),
                ("D", "Time to metabolize drug"),
            ],
            "C",
            "Half-life is the time taken for the plasma concentration of a drug to reduce by 50%.",
        ),
        mcq(
            "mcq7",
            Subject::Genetics,
            "Oncogenes are:",
            [
                ("A", "Tumor suppressor genes"),
                ("B", "Genes for inflammation"),
                ("C", "Normal genes"),
                ("D", "Cancer-causing genes"),
            ],
            "D",
            "Oncogenes are mutated forms of proto-oncogenes that can cause uncontrolled cell \
             division.",
        ),
        mcq(
            "mcq8",
            Subject::Pharmacology,
            "Which one is a loop diuretic?",
            [("A", "Spironolactone"), ("B", "Furosemide"), ("C", "Thiazide"), ("D", "Mannitol")],
            "B",
            "Furosemide is a potent loop diuretic that acts on the thick ascending limb of the \
             loop of Henle.",
        ),
        mcq(
            "mcq9",
            Subject::Pharmacology,
            "Reye's syndrome is associated with:",
            [
                ("A", "Paracetamol"),
                ("B", "Aspirin in children"),
                ("C", "Ibuprofen overdose"),
                ("D", "Vitamin D toxicity"),
            ],
            "B",
            "Reye's syndrome is a rare but serious condition that can occur in children given \
             aspirin during viral infections.",
        ),
        mcq(
            "mcq10",
            Subject::Pathology,
            "Which phase of the cell cycle is most radiosensitive?",
            [("A", "G0 phase"), ("B", "G1 phase"), ("C", "S phase"), ("D", "M phase")],
            "D",
            "M phase is the most radiosensitive as the chromatin is condensed and more \
             susceptible to radiation damage.",
        ),
    ]
}

fn builtin_image_pool() -> Vec<ImageQuestion> {
    vec![
        ImageQuestion {
            id: "img1".to_string(),
            subject: Subject::Pharmacology,
            text: "Describe the mechanism of action, therapeutic uses, adverse effects, and \
                   contraindications of NSAIDs."
                .to_string(),
            marks: 10,
            marking_scheme: MarkingScheme {
                key_points: vec![
                    "Mechanism: COX inhibition".to_string(),
                    "Uses: Pain, fever, inflammation".to_string(),
                    "Adverse effects: GI, renal, bleeding".to_string(),
                    "Contraindications: Peptic ulcer, asthma, renal disease".to_string(),
                ],
                full_marks_criteria: vec![
                    "Each section explained clearly".to_string(),
                    "Correct examples of NSAIDs given".to_string(),
                    "Common side effects accurately described".to_string(),
                    "At least 3 contraindications listed".to_string(),
                ],
            },
        },
        ImageQuestion {
            id: "img2".to_string(),
            subject: Subject::Pathology,
            text: "Differentiate between benign and malignant tumors.".to_string(),
            marks: 5,
            marking_scheme: MarkingScheme {
                key_points: vec![
                    "Definition of both".to_string(),
                    "Growth rate".to_string(),
                    "Invasion/metastasis".to_string(),
                    "Examples of each".to_string(),
                ],
                full_marks_criteria: vec![
                    "Clear comparison".to_string(),
                    "All features mentioned".to_string(),
                    "Logical presentation".to_string(),
                    "At least one example each".to_string(),
                ],
            },
        },
        ImageQuestion {
            id: "img3".to_string(),
            subject: Subject::Genetics,
            text: "Define autosomal dominant inheritance with an example.".to_string(),
            marks: 5,
            marking_scheme: MarkingScheme {
                key_points: vec![
                    "Definition of autosomal dominant".to_string(),
                    "One parent passes the gene".to_string(),
                    "No skipping of generations".to_string(),
                    "Example such as Marfan syndrome".to_string(),
                ],
                full_marks_criteria: vec![
                    "Clear and concise definition".to_string(),
                    "Example relevant and correct".to_string(),
                    "Correct explanation of inheritance pattern".to_string(),
                ],
            },
        },
    ]
}

fn builtin_break_pool() -> Vec<FunBreak> {
    vec![
        FunBreak {
            id: "break1".to_string(),
            kind: BreakKind::Meme,
            content: BreakContent {
                emoji: Some("📚😴".to_string()),
                title: "Time for a Break!".to_string(),
                description: Some("You're doing great! Let's lighten up a bit 😊".to_string()),
                meme_text: Some(
                    "\"When you realize pharmacology has more names than a Bollywood family \
                     drama\""
                        .to_string(),
                ),
                question: None,
                placeholder: None,
            },
        },
        FunBreak {
            id: "break2".to_string(),
            kind: BreakKind::Question,
            content: BreakContent {
                emoji: Some("☕".to_string()),
                title: "Quick Coffee Break!".to_string(),
                description: Some("I bet it's the place with the best gossip too! 😄".to_string()),
                meme_text: None,
                question: Some("What's your favorite chai spot in college?".to_string()),
                placeholder: Some("Share your go-to chai place...".to_string()),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_unique_question_ids() {
        let catalog = Catalog::builtin();
        let mut ids: Vec<&str> = catalog
            .mcq_pool
            .iter()
            .map(|q| q.id.as_str())
            .chain(catalog.image_pool.iter().map(|q| q.id.as_str()))
            .collect();
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(before, ids.len());
    }

    #[test]
    fn builtin_mcqs_have_four_options_and_a_valid_answer() {
        for q in Catalog::builtin().mcq_pool {
            assert_eq!(q.options.len(), 4, "{}", q.id);
            assert!(q.options.iter().any(|o| o.id == q.correct_answer), "{}", q.id);
        }
    }

    #[test]
    fn subject_lookup_covers_both_pools() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.subject_of("mcq5"), Some(Subject::Pathology));
        assert_eq!(catalog.subject_of("img3"), Some(Subject::Genetics));
        assert_eq!(catalog.subject_of("nope"), None);
    }
}
