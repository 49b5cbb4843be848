//! Inbound event dispatch
//!
//! While a form field is pending, text goes to the form first. Two commands
//! still cut in: operator commands from operators, and `/neworder`, which
//! starts the form over. Operator commands from anyone outside the allow-list
//! are plain text, and their button presses are dropped without a reply.

use super::{BotRuntime, DispatchError};
use crate::command::{parse_command, CallbackAction, Command};
use crate::replies;
use crate::state_machine::{DeleteTarget, Event, SubmitterContext};
use crate::store::{StoreError, SubmissionStore, UserId};
use crate::transport::{ChatId, Inbound, MessageId, ReplyMarkup, Sender, Transport};

impl<S, T> BotRuntime<S, T>
where
    S: SubmissionStore + 'static,
    T: Transport + 'static,
{
    /// Handle one inbound event to completion
    pub async fn handle(&self, inbound: Inbound) -> Result<(), DispatchError> {
        match inbound {
            Inbound::Message {
                chat_id,
                sender,
                text,
            } => self.handle_message(chat_id, sender, text).await,
            Inbound::Callback {
                callback_id,
                chat_id,
                message_id,
                sender,
                payload,
            } => {
                self.handle_callback(&callback_id, chat_id, message_id, &sender, &payload)
                    .await
            }
        }
    }

    async fn handle_message(
        &self,
        chat_id: ChatId,
        sender: Sender,
        text: String,
    ) -> Result<(), DispatchError> {
        let is_operator = self.operators.contains(sender.user_id);
        let context = SubmitterContext::new(sender.user_id, sender.display_name);

        let command =
            parse_command(&text).filter(|command| is_operator || !command.is_operator_only());
        let command = match command {
            Some(command) if command.is_operator_only() || command == Command::NewOrder => {
                Some(command)
            }
            // A pending field takes the text as its answer, slash or not
            Some(_) if !self.sessions.conversation(context.user_id).await.is_idle() => None,
            other => other,
        };
        let Some(command) = command else {
            return self
                .drive_conversation(chat_id, &context, Event::Text { text })
                .await;
        };

        tracing::debug!(user_id = %context.user_id, command = %command, "Command received");

        match command {
            Command::Start => {
                self.send(chat_id, replies::GREETING, Some(ReplyMarkup::RemoveKeyboard))
                    .await?;
            }
            Command::Help => {
                self.send(chat_id, replies::user_help(is_operator), None)
                    .await?;
            }
            Command::NewOrder => {
                return self
                    .drive_conversation(chat_id, &context, Event::BeginSubmission)
                    .await;
            }
            Command::OperatorHelp => {
                self.send(chat_id, replies::OPERATOR_HELP, None).await?;
            }
            Command::Orders => {
                let text = self.submission_list_text().await;
                self.send(chat_id, text, Some(ReplyMarkup::OperatorMenu))
                    .await?;
            }
            Command::Stats => {
                let text = match self.store.stats().await {
                    Ok(stats) => replies::stats(&stats),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to compute statistics");
                        replies::stats_failed(&e.to_string())
                    }
                };
                self.send(chat_id, text, None).await?;
            }
            Command::DeleteAll => {
                self.request_delete_all(chat_id, context.user_id).await?;
            }
            Command::DeleteOrder { argument } => {
                self.request_delete_one(chat_id, context.user_id, argument.as_deref())
                    .await?;
            }
        }

        Ok(())
    }

    async fn handle_callback(
        &self,
        callback_id: &str,
        chat_id: ChatId,
        message_id: Option<MessageId>,
        sender: &Sender,
        payload: &str,
    ) -> Result<(), DispatchError> {
        let user_id = sender.user_id;
        if !self.operators.contains(user_id) {
            tracing::debug!(user_id = %user_id, payload, "Ignoring callback from non-operator");
            return Ok(());
        }

        let action = CallbackAction::parse(payload);
        let outcome = self
            .run_callback(chat_id, message_id, user_id, action)
            .await;

        // Stop the button spinner even when the action failed
        let acknowledged = self.transport.answer_callback(callback_id).await;
        outcome?;
        acknowledged?;
        Ok(())
    }

    async fn run_callback(
        &self,
        chat_id: ChatId,
        message_id: Option<MessageId>,
        user_id: UserId,
        action: CallbackAction,
    ) -> Result<(), DispatchError> {
        // Any button press settles whatever deletion was awaiting confirmation
        let pending = self.sessions.take_pending_delete(user_id).await;

        match action {
            CallbackAction::ListSubmissions => {
                let text = self.submission_list_text().await;
                match message_id {
                    Some(message_id) => {
                        self.transport
                            .edit(chat_id, message_id, &text, Some(&ReplyMarkup::OperatorMenu))
                            .await?;
                    }
                    None => {
                        self.send(chat_id, text, Some(ReplyMarkup::OperatorMenu))
                            .await?;
                    }
                }
            }
            CallbackAction::RequestDeleteAll => {
                self.request_delete_all(chat_id, user_id).await?;
            }
            CallbackAction::Confirm(target) => {
                if pending != Some(target) {
                    tracing::debug!(user_id = %user_id, ?target, ?pending, "Confirmation does not match a pending deletion");
                    self.send(chat_id, replies::CONFIRMATION_EXPIRED, None)
                        .await?;
                    return Ok(());
                }
                let text = self.delete(user_id, target).await;
                self.send(chat_id, text, None).await?;
            }
            CallbackAction::Cancel => {
                self.send(chat_id, replies::DELETE_CANCELLED, None).await?;
            }
            CallbackAction::Unknown(raw) => {
                tracing::warn!(user_id = %user_id, payload = %raw, "Unknown callback payload");
                self.send(chat_id, replies::UNKNOWN_ACTION, None).await?;
            }
        }

        Ok(())
    }

    async fn submission_list_text(&self) -> String {
        match self.store.list_all().await {
            Ok(records) => replies::submission_list(&records),
            Err(e) => {
                tracing::error!(error = %e, "Failed to list submissions");
                replies::list_failed(&e.to_string())
            }
        }
    }

    async fn request_delete_all(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<(), DispatchError> {
        self.sessions
            .set_pending_delete(user_id, Some(DeleteTarget::All))
            .await;
        self.send(
            chat_id,
            replies::CONFIRM_DELETE_ALL,
            Some(ReplyMarkup::ConfirmDelete(DeleteTarget::All)),
        )
        .await?;
        Ok(())
    }

    /// Validate a 1-based order number and ask for confirmation
    async fn request_delete_one(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        argument: Option<&str>,
    ) -> Result<(), DispatchError> {
        let Some(raw) = argument else {
            self.send(chat_id, replies::DELETE_ONE_USAGE, None).await?;
            return Ok(());
        };

        let number = match raw.parse::<usize>() {
            Ok(number) if number >= 1 => number,
            _ => {
                self.send(chat_id, replies::INVALID_ORDER_NUMBER, None)
                    .await?;
                return Ok(());
            }
        };

        let records = match self.store.list_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list submissions");
                self.send(chat_id, replies::list_failed(&e.to_string()), None)
                    .await?;
                return Ok(());
            }
        };

        let Some(record) = records.get(number - 1) else {
            self.send(chat_id, replies::order_missing(number), None)
                .await?;
            return Ok(());
        };

        let target = DeleteTarget::One {
            position: number - 1,
        };
        self.sessions.set_pending_delete(user_id, Some(target)).await;
        self.send(
            chat_id,
            replies::confirm_delete_one(number, record),
            Some(ReplyMarkup::ConfirmDelete(target)),
        )
        .await?;
        Ok(())
    }

    /// Run a confirmed deletion and describe the outcome
    async fn delete(&self, user_id: UserId, target: DeleteTarget) -> String {
        match target {
            DeleteTarget::All => match self.store.delete_all().await {
                Ok(()) => {
                    tracing::info!(operator = %user_id, "Operator deleted all submissions");
                    replies::DELETED_ALL.to_string()
                }
                Err(e) => {
                    tracing::error!(operator = %user_id, error = %e, "Failed to delete all submissions");
                    replies::delete_failed(&e.to_string())
                }
            },
            DeleteTarget::One { position } => match self.store.delete_at(position).await {
                Ok(_) => {
                    tracing::info!(operator = %user_id, position, "Operator deleted a submission");
                    replies::deleted_one(position + 1)
                }
                // The list shrank between the prompt and the confirmation
                Err(StoreError::OutOfRange { .. }) => replies::order_missing(position + 1),
                Err(e) => {
                    tracing::error!(operator = %user_id, error = %e, "Failed to delete submission");
                    replies::delete_failed(&e.to_string())
                }
            },
        }
    }
}
