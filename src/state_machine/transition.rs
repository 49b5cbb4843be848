//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! new state and effects. Store writes and outbound messages happen in the
//! runtime, which feeds store outcomes back in as events.

use super::state::{ConvState, Draft, PendingField, SubmitterContext};
use super::{Effect, Event};
use crate::replies;
use crate::transport::ReplyMarkup;
use crate::validation::{self, is_game_mode_token};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The session does not hold what its current step requires
    #[error("Unknown conversation state: {0}")]
    UnknownState(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(
    state: &ConvState,
    context: &SubmitterContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Starting over
        // ============================================================

        // Any state + BeginSubmission -> fresh form; an unfinished one is dropped
        (_, Event::BeginSubmission) => Ok(TransitionResult::new(ConvState::collecting(
            PendingField::GameMode,
            Draft::default(),
        ))
        .with_effect(Effect::reply_with(
            replies::CHOOSE_GAME_MODE,
            ReplyMarkup::GameModes,
        ))),

        // ============================================================
        // No form in progress
        // ============================================================
        (ConvState::Idle, Event::Text { text }) => {
            let reply = if is_game_mode_token(&text) {
                Effect::reply(replies::START_WITH_NEW_ORDER)
            } else {
                Effect::reply(replies::echo(&text))
            };
            Ok(TransitionResult::new(ConvState::Idle).with_effect(reply))
        }

        // ============================================================
        // Collecting fields
        // ============================================================
        (ConvState::Collecting { field, draft }, Event::Text { text }) => {
            collect(*field, draft, &text, context)
        }

        // ============================================================
        // Store outcomes
        // ============================================================

        // Saved -> form finished, session discarded
        (
            ConvState::Collecting {
                field: PendingField::ContactHandle,
                ..
            },
            Event::SubmissionPersisted { submission },
        ) => Ok(TransitionResult::new(ConvState::Idle).with_effect(Effect::reply_with(
            replies::saved(&submission),
            ReplyMarkup::RemoveKeyboard,
        ))),

        // Save failed -> keep everything so resending the handle retries
        (
            ConvState::Collecting {
                field: PendingField::ContactHandle,
                ..
            },
            Event::PersistFailed { message },
        ) => Ok(TransitionResult::new(state.clone())
            .with_effect(Effect::reply(replies::save_failed(&message)))),

        (state, Event::SubmissionPersisted { .. } | Event::PersistFailed { .. }) => {
            Err(TransitionError::InvalidTransition(format!(
                "store outcome arrived while {}",
                describe(state)
            )))
        }
    }
}

/// Handle text while a field is pending
fn collect(
    field: PendingField,
    draft: &Draft,
    text: &str,
    context: &SubmitterContext,
) -> Result<TransitionResult, TransitionError> {
    let unchanged = || ConvState::collecting(field, draft.clone());

    // A mode token outside the mode step never advances anything
    if field != PendingField::GameMode && is_game_mode_token(text) {
        return Ok(TransitionResult::new(unchanged())
            .with_effect(Effect::reply(replies::START_WITH_NEW_ORDER)));
    }

    let result = match field {
        PendingField::GameMode => match validation::parse_game_mode(text) {
            Ok(mode) => {
                let draft = Draft {
                    game_mode: Some(mode),
                    ..draft.clone()
                };
                TransitionResult::new(ConvState::collecting(PendingField::ArtifactChange, draft))
                    .with_effect(Effect::reply_with(
                        replies::ASK_ARTIFACT_CHANGE,
                        ReplyMarkup::YesNo,
                    ))
            }
            Err(_) => TransitionResult::new(unchanged()).with_effect(Effect::reply_with(
                replies::CHOOSE_GAME_MODE_AGAIN,
                ReplyMarkup::GameModes,
            )),
        },

        PendingField::ArtifactChange => match validation::parse_artifact_choice(text) {
            Ok(choice) => {
                let draft = Draft {
                    artifact_change: Some(choice),
                    ..draft.clone()
                };
                TransitionResult::new(ConvState::collecting(PendingField::Login, draft))
                    .with_effect(Effect::reply_with(
                        replies::ASK_LOGIN,
                        ReplyMarkup::RemoveKeyboard,
                    ))
            }
            Err(_) => TransitionResult::new(unchanged()).with_effect(Effect::reply_with(
                replies::ASK_ARTIFACT_CHANGE_AGAIN,
                ReplyMarkup::YesNo,
            )),
        },

        PendingField::Login => match validation::require_text(text) {
            Ok(login) => {
                let draft = Draft {
                    login: Some(login.to_string()),
                    ..draft.clone()
                };
                TransitionResult::new(ConvState::collecting(PendingField::Password, draft))
                    .with_effect(Effect::reply(replies::ASK_PASSWORD))
            }
            Err(_) => TransitionResult::new(unchanged())
                .with_effect(Effect::reply(replies::ASK_LOGIN_AGAIN)),
        },

        PendingField::Password => match validation::require_text(text) {
            Ok(password) => {
                let draft = Draft {
                    password: Some(password.to_string()),
                    ..draft.clone()
                };
                TransitionResult::new(ConvState::collecting(PendingField::ContactHandle, draft))
                    .with_effect(Effect::reply(replies::ASK_CONTACT_HANDLE))
            }
            Err(_) => TransitionResult::new(unchanged())
                .with_effect(Effect::reply(replies::ASK_PASSWORD_AGAIN)),
        },

        PendingField::ContactHandle => {
            if !validation::is_valid_contact_handle(text) {
                return Ok(TransitionResult::new(unchanged())
                    .with_effect(Effect::reply(replies::INVALID_CONTACT_HANDLE)));
            }

            let draft = Draft {
                contact_handle: Some(text.to_string()),
                ..draft.clone()
            };
            let submission = draft.complete(context).map_err(|missing| {
                TransitionError::UnknownState(format!(
                    "draft has no {} at the contact_handle step",
                    missing.name()
                ))
            })?;

            // Stay on this step until the store answers
            TransitionResult::new(ConvState::collecting(PendingField::ContactHandle, draft))
                .with_effect(Effect::PersistSubmission { submission })
        }
    };

    Ok(result)
}

fn describe(state: &ConvState) -> String {
    match state.pending_field() {
        Some(field) => format!("awaiting {}", field.name()),
        None => "idle".to_string(),
    }
}
