//! crates/quiz_core/src/deck.rs
//!
//! The slide sequencer: linearizes the content catalog into one ordered,
//! immutable deck of slides for a test run.

use crate::catalog::{Catalog, FunBreak, ImageQuestion, McqQuestion};

/// One unit of displayed content.
#[derive(Debug, Clone)]
pub enum Slide {
    Welcome,
    Mcq(McqQuestion),
    ImageUpload(ImageQuestion),
    FunBreak(FunBreak),
    Summary,
}

impl Slide {
    /// The question id, for question slides.
    pub fn question_id(&self) -> Option<&str> {
        match self {
            Slide::Mcq(q) => Some(&q.id),
            Slide::ImageUpload(q) => Some(&q.id),
            _ => None,
        }
    }
}

/// The fully ordered sequence of slides for one run.
///
/// Built once per catalog and immutable afterwards; navigation only ever
/// reads its length and indexes into it.
#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<Slide>,
}

impl Deck {
    /// Builds the deck from the catalog pools.
    ///
    /// Layout: Welcome, then the MCQ run with a fun break appended after
    /// every 4th question (while break items remain), then every image
    /// question, then any breaks the MCQ run did not consume, then Summary.
    /// Deterministic: the same catalog always yields the same deck.
    pub fn build(catalog: &Catalog) -> Deck {
        let mut slides = Vec::with_capacity(
            2 + catalog.mcq_pool.len() + catalog.image_pool.len() + catalog.break_pool.len(),
        );
        slides.push(Slide::Welcome);

        let mut breaks_used = 0;
        for (i, question) in catalog.mcq_pool.iter().enumerate() {
            slides.push(Slide::Mcq(question.clone()));
            if (i + 1) % 4 == 0 {
                // Boundary k = (i+1)/4 consumes break_pool[k-1]; since breaks
                // are taken in order this is the next unused item, if any.
                if let Some(fun_break) = catalog.break_pool.get(breaks_used) {
                    slides.push(Slide::FunBreak(fun_break.clone()));
                    breaks_used += 1;
                }
            }
        }

        for question in &catalog.image_pool {
            slides.push(Slide::ImageUpload(question.clone()));
        }
        for fun_break in &catalog.break_pool[breaks_used..] {
            slides.push(Slide::FunBreak(fun_break.clone()));
        }

        slides.push(Slide::Summary);
        Deck { slides }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Never true for a built deck; it always carries Welcome and Summary.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.slides.iter()
    }

    /// Number of question slides, i.e. the "question X of N" total shown to
    /// the user (deck length minus the structural slides).
    pub fn question_count(&self) -> usize {
        self.slides
            .iter()
            .filter(|s| matches!(s, Slide::Mcq(_) | Slide::ImageUpload(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BreakContent, BreakKind, FunBreak, McqOption, McqQuestion, Subject};

    fn mcq(id: &str) -> McqQuestion {
        McqQuestion {
            id: id.to_string(),
            subject: Subject::Pharmacology,
            text: format!("question {id}"),
            options: vec![
                McqOption { id: "A".into(), text: "a".into() },
                McqOption { id: "B".into(), text: "b".into() },
                McqOption { id: "C".into(), text: "c".into() },
                McqOption { id: "D".into(), text: "d".into() },
            ],
            correct_answer: "A".to_string(),
            explanation: String::new(),
        }
    }

    fn fun_break(id: &str) -> FunBreak {
        FunBreak {
            id: id.to_string(),
            kind: BreakKind::Meme,
            content: BreakContent { title: "break".into(), ..Default::default() },
        }
    }

    fn catalog(mcqs: usize, breaks: usize) -> Catalog {
        Catalog {
            mcq_pool: (0..mcqs).map(|i| mcq(&format!("mcq{i}"))).collect(),
            image_pool: Vec::new(),
            break_pool: (0..breaks).map(|i| fun_break(&format!("break{i}"))).collect(),
        }
    }

    #[test]
    fn welcome_first_summary_last() {
        let deck = Deck::build(&Catalog::builtin());
        assert!(matches!(deck.get(0), Some(Slide::Welcome)));
        assert!(matches!(deck.get(deck.len() - 1), Some(Slide::Summary)));
        assert_eq!(
            deck.iter().filter(|s| matches!(s, Slide::Welcome)).count(),
            1
        );
        assert_eq!(
            deck.iter().filter(|s| matches!(s, Slide::Summary)).count(),
            1
        );
    }

    #[test]
    fn empty_catalog_still_yields_welcome_and_summary() {
        let deck = Deck::build(&Catalog::default());
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.question_count(), 0);
    }

    #[test]
    fn builtin_catalog_layout() {
        // 10 MCQs + 3 images + 2 breaks: breaks land after the 4th and 8th
        // MCQ, none are left over, so 1 + 10 + 2 + 3 + 1 = 17 slides.
        let deck = Deck::build(&Catalog::builtin());
        assert_eq!(deck.len(), 17);
        assert_eq!(deck.question_count(), 13);
        assert!(matches!(deck.get(5), Some(Slide::FunBreak(b)) if b.id == "break1"));
        assert!(matches!(deck.get(10), Some(Slide::FunBreak(b)) if b.id == "break2"));
    }

    #[test]
    fn breaks_only_on_four_question_boundaries() {
        let deck = Deck::build(&catalog(10, 5));
        let break_positions: Vec<usize> = deck
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Slide::FunBreak(_)))
            .map(|(i, _)| i)
            .collect();
        // Two breaks interleaved (after the 4th and 8th MCQ), the remaining
        // three appended after the (empty) image run, before the summary.
        assert_eq!(break_positions, vec![5, 10, 13, 14, 15]);
    }

    #[test]
    fn short_break_pool_skips_later_boundaries() {
        let deck = Deck::build(&catalog(12, 1));
        let inserted = deck.iter().filter(|s| matches!(s, Slide::FunBreak(_))).count();
        assert_eq!(inserted, 1);
        // 1 welcome + 12 mcq + 1 break + 1 summary
        assert_eq!(deck.len(), 15);
        assert!(matches!(deck.get(5), Some(Slide::FunBreak(_))));
    }

    #[test]
    fn each_break_inserted_at_most_once() {
        let deck = Deck::build(&catalog(20, 3));
        let mut ids: Vec<&str> = deck
            .iter()
            .filter_map(|s| match s {
                Slide::FunBreak(b) => Some(b.id.as_str()),
                _ => None,
            })
            .collect();
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(before, ids.len());
        assert_eq!(before, 3);
    }

    #[test]
    fn deterministic_for_equal_catalogs() {
        let catalog = Catalog::builtin();
        let a = Deck::build(&catalog);
        let b = Deck::build(&catalog);
        assert_eq!(a.len(), b.len());
        let ids_a: Vec<Option<&str>> = a.iter().map(|s| s.question_id()).collect();
        let ids_b: Vec<Option<&str>> = b.iter().map(|s| s.question_id()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn length_accounting() {
        for (mcqs, breaks) in [(0usize, 0usize), (3, 2), (4, 1), (8, 1), (16, 2), (9, 9)] {
            let deck = Deck::build(&catalog(mcqs, breaks));
            let inserted = deck.iter().filter(|s| matches!(s, Slide::FunBreak(_))).count();
            // Leftover breaks are appended after the image run, so every
            // break item ends up in the deck exactly once.
            assert_eq!(inserted, breaks);
            assert_eq!(deck.len(), 1 + mcqs + inserted + 1);
        }
    }
}
