//! Platform-neutral message types

use crate::state_machine::DeleteTarget;
use crate::store::UserId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageId(pub i64);

/// Who sent an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub user_id: UserId,
    pub display_name: String,
}

/// Something a user did in a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Message {
        chat_id: ChatId,
        sender: Sender,
        text: String,
    },
    /// An inline button press
    Callback {
        callback_id: String,
        chat_id: ChatId,
        /// The message carrying the button, when the platform still has it
        message_id: Option<MessageId>,
        sender: Sender,
        payload: String,
    },
}

impl Inbound {
    pub fn sender(&self) -> &Sender {
        match self {
            Inbound::Message { sender, .. } | Inbound::Callback { sender, .. } => sender,
        }
    }
}

/// Keyboards attached to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyMarkup {
    /// One button per game mode
    GameModes,
    YesNo,
    /// Hide whatever reply keyboard is showing
    RemoveKeyboard,
    /// Inline buttons under the order list
    OperatorMenu,
    /// Inline confirm/cancel buttons for a pending deletion
    ConfirmDelete(DeleteTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub markup: Option<ReplyMarkup>,
}

impl OutboundMessage {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            markup: None,
        }
    }

    pub fn with_markup(mut self, markup: Option<ReplyMarkup>) -> Self {
        self.markup = markup;
        self
    }
}
