//! Telegram Bot API transport
//!
//! Long-polls `getUpdates` and answers through `sendMessage`,
//! `editMessageText` and `answerCallbackQuery`.

use super::types::*;
use super::{Transport, TransportError};
use crate::command::CallbackAction;
use crate::store::{GameMode, UserId};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Extra time on top of the long-poll window before the HTTP client gives up
const CLIENT_TIMEOUT_SLACK: Duration = Duration::from_secs(15);

const ALLOWED_UPDATES: [&str; 2] = ["message", "callback_query"];

pub struct TelegramTransport {
    client: Client,
    /// `{api_url}/bot{token}`; never logged
    base_url: String,
    poll_timeout: Duration,
    /// Next update id to ask for
    offset: AtomicI64,
}

impl TelegramTransport {
    pub fn new(
        api_url: &str,
        token: &str,
        poll_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(poll_timeout + CLIENT_TIMEOUT_SLACK)
            .build()
            .map_err(|e| TransportError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
            poll_timeout,
            offset: AtomicI64::new(0),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &impl Serialize,
    ) -> Result<T, TransportError> {
        let url = format!("{}/{method}", self.base_url);

        // The URL embeds the bot token, so strip it from any reqwest error
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::network(format!("{method}: {}", e.without_url())))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::network(format!("{method}: {}", e.without_url())))?;

        let envelope: ApiResponse<T> = serde_json::from_str(&text).map_err(|e| {
            TransportError::decode(format!("{method}: HTTP {status}: unreadable response: {e}"))
        })?;

        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| "no description".to_string());
            return Err(TransportError::api(format!(
                "{method}: HTTP {status}: {description}"
            )));
        }

        envelope
            .result
            .ok_or_else(|| TransportError::decode(format!("{method}: missing result")))
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn poll(&self) -> Result<Vec<Inbound>, TransportError> {
        let request = GetUpdates {
            offset: self.offset.load(Ordering::SeqCst),
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: &ALLOWED_UPDATES,
        };
        let updates: Vec<Update> = self.call("getUpdates", &request).await?;

        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.offset.store(last + 1, Ordering::SeqCst);
        }

        let inbound: Vec<Inbound> = updates.into_iter().filter_map(Update::into_inbound).collect();
        tracing::debug!(count = inbound.len(), "Polled updates");
        Ok(inbound)
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let request = SendMessage {
            chat_id: message.chat_id.0,
            text: &message.text,
            reply_markup: message.markup.as_ref().map(render_markup),
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    async fn edit(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        markup: Option<&ReplyMarkup>,
    ) -> Result<(), TransportError> {
        let request = EditMessageText {
            chat_id: chat_id.0,
            message_id: message_id.0,
            text,
            reply_markup: markup.map(render_markup),
        };
        let _: serde_json::Value = self.call("editMessageText", &request).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        let request = AnswerCallbackQuery {
            callback_query_id: callback_id,
        };
        let _: bool = self.call("answerCallbackQuery", &request).await?;
        Ok(())
    }
}

// ============================================================================
// Markup rendering
// ============================================================================

fn render_markup(markup: &ReplyMarkup) -> WireMarkup {
    match markup {
        ReplyMarkup::GameModes => reply_keyboard(GameMode::ALL.iter().map(|m| m.as_str())),
        ReplyMarkup::YesNo => reply_keyboard(["Yes", "No"]),
        ReplyMarkup::RemoveKeyboard => WireMarkup::Remove {
            remove_keyboard: true,
        },
        ReplyMarkup::OperatorMenu => inline_keyboard(&[
            ("❌ Delete all", CallbackAction::RequestDeleteAll),
            ("📋 List", CallbackAction::ListSubmissions),
        ]),
        ReplyMarkup::ConfirmDelete(target) => inline_keyboard(&[
            ("✅ Yes, delete", CallbackAction::Confirm(*target)),
            ("❌ No, cancel", CallbackAction::Cancel),
        ]),
    }
}

fn reply_keyboard<'a>(labels: impl IntoIterator<Item = &'a str>) -> WireMarkup {
    let row = labels
        .into_iter()
        .map(|text| KeyboardButton {
            text: text.to_string(),
        })
        .collect();
    WireMarkup::Reply {
        keyboard: vec![row],
        resize_keyboard: true,
    }
}

fn inline_keyboard(buttons: &[(&str, CallbackAction)]) -> WireMarkup {
    let row = buttons
        .iter()
        .map(|(text, action)| InlineButton {
            text: (*text).to_string(),
            callback_data: action.payload(),
        })
        .collect();
    WireMarkup::Inline {
        inline_keyboard: vec![row],
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
enum WireMarkup {
    Reply {
        keyboard: Vec<Vec<KeyboardButton>>,
        resize_keyboard: bool,
    },
    Remove {
        remove_keyboard: bool,
    },
    Inline {
        inline_keyboard: Vec<Vec<InlineButton>>,
    },
}

#[derive(Debug, Serialize, PartialEq)]
struct KeyboardButton {
    text: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct InlineButton {
    text: String,
    callback_data: String,
}

// ============================================================================
// Bot API wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdates<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<WireMarkup>,
}

#[derive(Debug, Serialize)]
struct EditMessageText<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<WireMarkup>,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackQuery<'a> {
    callback_query_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<WireMessage>,
    callback_query: Option<WireCallbackQuery>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    message_id: i64,
    chat: WireChat,
    from: Option<WireUser>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: i64,
    first_name: String,
    last_name: Option<String>,
    username: Option<String>,
}

impl WireUser {
    fn into_sender(self) -> Sender {
        let display_name = match self.username {
            Some(username) => format!("@{username}"),
            None => match self.last_name {
                Some(last) => format!("{} {last}", self.first_name),
                None => self.first_name,
            },
        };
        Sender {
            user_id: UserId(self.id),
            display_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireCallbackQuery {
    id: String,
    from: WireUser,
    message: Option<WireMessage>,
    data: Option<String>,
}

impl Update {
    /// Non-text messages, anonymous senders and buttons without a chat are skipped
    fn into_inbound(self) -> Option<Inbound> {
        if let Some(query) = self.callback_query {
            let message = query.message?;
            return Some(Inbound::Callback {
                callback_id: query.id,
                chat_id: ChatId(message.chat.id),
                message_id: Some(MessageId(message.message_id)),
                sender: query.from.into_sender(),
                payload: query.data.unwrap_or_default(),
            });
        }

        let message = self.message?;
        Some(Inbound::Message {
            chat_id: ChatId(message.chat.id),
            sender: message.from?.into_sender(),
            text: message.text?,
        })
    }
}
