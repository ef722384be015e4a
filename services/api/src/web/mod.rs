pub mod progress;
pub mod rest;
pub mod state;

// Re-export the handlers so the binary that builds the web server router
// can reach them without spelling out the module path.
pub use rest::{
    create_session_handler, deck_overview_handler, list_responses_handler,
    session_summary_handler, submit_image_handler, submit_mcq_handler, update_session_handler,
};
