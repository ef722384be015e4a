//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use quiz_core::catalog::Catalog;
use quiz_core::deck::Deck;
use quiz_core::ports::{GradingService, ImagePreprocessor, SessionStore};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub grader: Arc<dyn GradingService>,
    pub preprocessor: Arc<dyn ImagePreprocessor>,
    /// Content the deck was built from; the aggregator resolves question
    /// subjects against it.
    pub catalog: Arc<Catalog>,
    /// The deck served for this process lifetime. Built once; immutable.
    pub deck: Arc<Deck>,
    pub config: Arc<Config>,
}
