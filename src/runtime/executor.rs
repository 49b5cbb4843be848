//! Receive loop and effect execution

use super::SessionRegistry;
use crate::config::OperatorAllowList;
use crate::replies;
use crate::state_machine::{transition, Effect, Event, SubmitterContext, TransitionError};
use crate::store::SubmissionStore;
use crate::transport::{ChatId, OutboundMessage, ReplyMarkup, Transport, TransportError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Pause after a failed poll before asking again
pub const POLL_FAILURE_PAUSE: Duration = Duration::from_secs(3);

/// Why handling one inbound event failed; never stops the receive loop
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Generic bot runtime that can work with any store and transport
pub struct BotRuntime<S, T>
where
    S: SubmissionStore + 'static,
    T: Transport + 'static,
{
    pub(super) store: Arc<S>,
    pub(super) transport: Arc<T>,
    pub(super) sessions: SessionRegistry,
    pub(super) operators: OperatorAllowList,
    poll_failure_pause: Duration,
}

impl<S, T> BotRuntime<S, T>
where
    S: SubmissionStore + 'static,
    T: Transport + 'static,
{
    pub fn new(store: Arc<S>, transport: Arc<T>, operators: OperatorAllowList) -> Self {
        Self {
            store,
            transport,
            sessions: SessionRegistry::new(),
            operators,
            poll_failure_pause: POLL_FAILURE_PAUSE,
        }
    }

    pub fn with_poll_failure_pause(mut self, pause: Duration) -> Self {
        self.poll_failure_pause = pause;
        self
    }

    /// Poll and handle events one at a time until `shutdown` fires
    pub async fn run(&self, shutdown: CancellationToken) {
        tracing::info!(operators = self.operators.len(), "Starting receive loop");

        loop {
            let polled = tokio::select! {
                () = shutdown.cancelled() => break,
                polled = self.transport.poll() => polled,
            };

            match polled {
                Ok(batch) => {
                    for inbound in batch {
                        let user_id = inbound.sender().user_id;
                        if let Err(e) = self.handle(inbound).await {
                            tracing::error!(user_id = %user_id, error = %e, "Error handling event");
                        }
                    }
                    let active_sessions = self.sessions.len().await;
                    tracing::debug!(active_sessions, "Batch handled");
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        retryable = e.kind.is_retryable(),
                        "Poll failed, pausing"
                    );
                    tokio::select! {
                        () = shutdown.cancelled() => break,
                        () = tokio::time::sleep(self.poll_failure_pause) => {}
                    }
                }
            }
        }

        tracing::info!("Receive loop stopped");
    }

    /// Feed one event through the user's conversation, following up with any
    /// events the effects produce
    pub(super) async fn drive_conversation(
        &self,
        chat_id: ChatId,
        context: &SubmitterContext,
        event: Event,
    ) -> Result<(), DispatchError> {
        let user_id = context.user_id;
        let mut pending = vec![event];

        while let Some(event) = pending.pop() {
            let state = self.sessions.conversation(user_id).await;

            let result = match transition(&state, context, event) {
                Ok(result) => result,
                Err(TransitionError::UnknownState(detail)) => {
                    tracing::warn!(user_id = %user_id, detail = %detail, "Session in unknown state, resetting");
                    self.sessions.reset(user_id).await;
                    self.send(
                        chat_id,
                        replies::RESTART_REQUIRED,
                        Some(ReplyMarkup::RemoveKeyboard),
                    )
                    .await?;
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            self.sessions.set_conversation(user_id, result.new_state).await;

            for effect in result.effects {
                if let Some(follow_up) = self.execute_effect(chat_id, context, effect).await? {
                    pending.push(follow_up);
                }
            }
        }

        Ok(())
    }

    async fn execute_effect(
        &self,
        chat_id: ChatId,
        context: &SubmitterContext,
        effect: Effect,
    ) -> Result<Option<Event>, DispatchError> {
        match effect {
            Effect::Reply { text, markup } => {
                self.send(chat_id, text, markup).await?;
                Ok(None)
            }

            Effect::PersistSubmission { submission } => {
                match self.store.upsert(submission).await {
                    Ok(saved) => Ok(Some(Event::SubmissionPersisted { submission: saved })),
                    Err(e) => {
                        tracing::error!(user_id = %context.user_id, error = %e, "Failed to persist submission");
                        Ok(Some(Event::PersistFailed {
                            message: e.to_string(),
                        }))
                    }
                }
            }
        }
    }

    pub(super) async fn send(
        &self,
        chat_id: ChatId,
        text: impl Into<String>,
        markup: Option<ReplyMarkup>,
    ) -> Result<(), TransportError> {
        let message = OutboundMessage::new(chat_id, text).with_markup(markup);
        self.transport.send(&message).await
    }
}

