//! Chat transport abstraction
//!
//! The runtime only talks to users through the [`Transport`] trait, so the
//! conversation and operator logic can be driven by tests without a network.

mod error;
mod telegram;
mod types;

pub use error::TransportError;
pub use telegram::TelegramTransport;
pub use types::{ChatId, Inbound, MessageId, OutboundMessage, ReplyMarkup, Sender};

use async_trait::async_trait;
use std::sync::Arc;

/// A chat platform the bot can receive from and reply through
#[async_trait]
pub trait Transport: Send + Sync {
    /// Wait for the next batch of inbound messages and button presses.
    /// An empty batch means the wait timed out.
    async fn poll(&self) -> Result<Vec<Inbound>, TransportError>;

    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;

    /// Replace the text and keyboard of a message the bot already sent
    async fn edit(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        markup: Option<&ReplyMarkup>,
    ) -> Result<(), TransportError>;

    /// Stop the client-side spinner on a pressed inline button
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn poll(&self) -> Result<Vec<Inbound>, TransportError> {
        (**self).poll().await
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        (**self).send(message).await
    }

    async fn edit(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        markup: Option<&ReplyMarkup>,
    ) -> Result<(), TransportError> {
        (**self).edit(chat_id, message_id, text, markup).await
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        (**self).answer_callback(callback_id).await
    }
}
