// src/play/feedback.rs

use crate::play::session::SessionEvent;

/// Receives the observable events of a play session (the cues a client turns
/// into sounds and toasts). Called outside the session lock; must not block.
pub trait FeedbackSink: Send + Sync {
    fn emit(&self, session_id: &str, event: &SessionEvent);
}

/// Default sink for the server: records every event in the log.
#[derive(Debug, Default, Clone)]
pub struct TracingFeedback;

impl FeedbackSink for TracingFeedback {
    fn emit(&self, session_id: &str, event: &SessionEvent) {
        match event {
            SessionEvent::Streak { streak } => {
                tracing::info!(session = %session_id, streak, "Streak bonus");
            }
            SessionEvent::GameCompleted { score, accuracy } => {
                tracing::info!(session = %session_id, score, accuracy, "Game completed");
            }
            other => tracing::debug!(session = %session_id, event = ?other, "Session event"),
        }
    }
}
