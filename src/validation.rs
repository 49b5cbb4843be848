//! Input validation for the intake form
//!
//! Every failure here is recoverable: the caller re-prompts and keeps
//! whatever has already been confirmed.

use crate::state_machine::state::ArtifactChoice;
use crate::store::GameMode;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

pub const CONTACT_HANDLE_SIGIL: char = '@';
const HANDLE_MIN_LEN: usize = 4;
const HANDLE_MAX_LEN: usize = 31;

static HANDLE_BODY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("handle regex is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown game mode: {0:?}")]
    UnknownGameMode(String),
    #[error("expected Yes or No, got {0:?}")]
    NotYesNo(String),
    #[error("value must not be empty")]
    Empty,
    #[error("contact handle must start with '@'")]
    MissingSigil,
    #[error("contact handle needs 4 to 31 characters after '@', got {0}")]
    BadLength(usize),
    #[error("contact handle may only contain letters, digits and underscores")]
    BadCharacter,
}

pub fn parse_game_mode(text: &str) -> Result<GameMode, ValidationError> {
    GameMode::from_token(text.trim())
        .ok_or_else(|| ValidationError::UnknownGameMode(text.to_string()))
}

/// True when the text is one of the game-mode tokens, whatever step the user is on
pub fn is_game_mode_token(text: &str) -> bool {
    GameMode::from_token(text.trim()).is_some()
}

pub fn parse_artifact_choice(text: &str) -> Result<ArtifactChoice, ValidationError> {
    match text.trim() {
        "Yes" => Ok(ArtifactChoice::Yes),
        "No" => Ok(ArtifactChoice::No),
        _ => Err(ValidationError::NotYesNo(text.to_string())),
    }
}

/// Accepts any non-empty text, returned verbatim
pub fn require_text(text: &str) -> Result<&str, ValidationError> {
    if text.is_empty() {
        Err(ValidationError::Empty)
    } else {
        Ok(text)
    }
}

/// `@` followed by 4 to 31 ASCII letters, digits or underscores
pub fn validate_contact_handle(text: &str) -> Result<(), ValidationError> {
    let body = text
        .strip_prefix(CONTACT_HANDLE_SIGIL)
        .ok_or(ValidationError::MissingSigil)?;

    let len = body.chars().count();
    if !(HANDLE_MIN_LEN..=HANDLE_MAX_LEN).contains(&len) {
        return Err(ValidationError::BadLength(len));
    }

    if !HANDLE_BODY_REGEX.is_match(body) {
        return Err(ValidationError::BadCharacter);
    }

    Ok(())
}

pub fn is_valid_contact_handle(text: &str) -> bool {
    validate_contact_handle(text).is_ok()
}
