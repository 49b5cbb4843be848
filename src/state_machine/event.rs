//! Events that drive a user's conversation

use crate::store::Submission;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    /// The user asked for a fresh form
    BeginSubmission,
    /// Any text that is not a recognized command
    Text { text: String },

    // Store events
    SubmissionPersisted { submission: Submission },
    PersistFailed { message: String },
}

impl Event {
    pub fn text(text: impl Into<String>) -> Self {
        Event::Text { text: text.into() }
    }
}
