//! services/api/src/web/progress.rs
//!
//! Bridges the client-side navigation state machine to the session store:
//! every slide transition is forwarded over a channel to a background task
//! that patches the session record. The update is best-effort — a store
//! failure is logged and the navigation is never blocked or reverted.

use quiz_core::domain::SessionPatch;
use quiz_core::navigation::{SlideChange, SlideNavigator};
use quiz_core::ports::SessionStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

/// Spawns the background task that mirrors slide changes into the store and
/// returns the channel sender feeding it.
pub fn spawn_progress_sync(
    store: Arc<dyn SessionStore>,
    session_id: Uuid,
) -> mpsc::UnboundedSender<SlideChange> {
    let (tx, mut rx) = mpsc::unbounded_channel::<SlideChange>();
    tokio::spawn(async move {
        while let Some(change) = rx.recv().await {
            let patch = SessionPatch {
                current_slide: Some(change.index),
                is_completed: Some(change.is_last),
                ..Default::default()
            };
            if let Err(e) = store.update_session(session_id, patch).await {
                warn!(
                    "Best-effort progress update for session {} failed: {}",
                    session_id, e
                );
            }
        }
    });
    tx
}

/// Builds a navigator whose transitions are mirrored into the store for
/// `session_id`. `deck_len` is the slide count of the deck being walked.
pub fn session_navigator(
    store: Arc<dyn SessionStore>,
    session_id: Uuid,
    deck_len: usize,
) -> SlideNavigator {
    let tx = spawn_progress_sync(store, session_id);
    SlideNavigator::with_observer(deck_len, move |change| {
        // Receiver gone means the process is shutting down; nothing to do.
        let _ = tx.send(change);
    })
}
