pub mod catalog;
pub mod deck;
pub mod domain;
pub mod fallback;
pub mod navigation;
pub mod ports;
pub mod scoring;

pub use catalog::{Catalog, FunBreak, ImageQuestion, MarkingScheme, McqQuestion, Subject};
pub use deck::{Deck, Slide};
pub use domain::{
    ImageAnalysis, NewResponse, QuestionResponse, QuestionType, QuizSession, SessionPatch,
};
pub use navigation::{SlideChange, SlideNavigator};
pub use ports::{GradingService, ImagePreprocessor, PortError, PortResult, SessionStore};
pub use scoring::{summarize, PerformanceSummary, ScoringError};
