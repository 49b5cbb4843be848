//! Effects produced by state transitions

use crate::store::NewSubmission;
use crate::transport::ReplyMarkup;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a message back to the user's chat
    Reply {
        text: String,
        markup: Option<ReplyMarkup>,
    },

    /// Write the finished form; answers with a store event
    PersistSubmission { submission: NewSubmission },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply {
            text: text.into(),
            markup: None,
        }
    }

    pub fn reply_with(text: impl Into<String>, markup: ReplyMarkup) -> Self {
        Effect::Reply {
            text: text.into(),
            markup: Some(markup),
        }
    }
}
