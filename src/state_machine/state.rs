//! Per-user conversation state types

use crate::store::{GameMode, NewSubmission, UserId};

// ============================================================================
// Form fields
// ============================================================================

/// Which answer the conversation is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingField {
    GameMode,
    ArtifactChange,
    Login,
    Password,
    ContactHandle,
}

impl PendingField {
    pub fn name(self) -> &'static str {
        match self {
            PendingField::GameMode => "game_mode",
            PendingField::ArtifactChange => "artifact_change",
            PendingField::Login => "login",
            PendingField::Password => "password",
            PendingField::ContactHandle => "contact_handle",
        }
    }
}

/// Answer to "may artifacts be swapped on characters?"
///
/// Collected on the draft only; the stored submission does not carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactChoice {
    Yes,
    No,
}

/// Partially filled submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub game_mode: Option<GameMode>,
    pub artifact_change: Option<ArtifactChoice>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub contact_handle: Option<String>,
}

impl Draft {
    /// Assemble the record to store, or name the first field that is missing
    pub fn complete(&self, context: &SubmitterContext) -> Result<NewSubmission, PendingField> {
        let game_mode = self.game_mode.ok_or(PendingField::GameMode)?;
        self.artifact_change.ok_or(PendingField::ArtifactChange)?;
        let login = self.login.clone().ok_or(PendingField::Login)?;
        let password = self.password.clone().ok_or(PendingField::Password)?;
        let contact_handle = self
            .contact_handle
            .clone()
            .ok_or(PendingField::ContactHandle)?;

        Ok(NewSubmission {
            user_id: context.user_id,
            game_mode,
            login,
            password,
            contact_handle,
            submitter_display_name: context.display_name.clone(),
        })
    }
}

// ============================================================================
// Conversation State
// ============================================================================

/// Where a user is in the intake flow
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConvState {
    /// No form in progress
    #[default]
    Idle,

    /// Form in progress, waiting for `field`
    Collecting { field: PendingField, draft: Draft },
}

impl ConvState {
    pub fn collecting(field: PendingField, draft: Draft) -> Self {
        ConvState::Collecting { field, draft }
    }

    pub fn pending_field(&self) -> Option<PendingField> {
        match self {
            ConvState::Idle => None,
            ConvState::Collecting { field, .. } => Some(*field),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ConvState::Idle)
    }
}

// ============================================================================
// Operator deletion
// ============================================================================

/// What a destructive operator action would remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    All,
    /// 0-based position in the store
    One { position: usize },
}

/// Everything the bot remembers about one user between messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub conversation: ConvState,
    /// Destructive action awaiting its confirm callback
    pub pending_delete: Option<DeleteTarget>,
}

impl Session {
    /// A session with nothing in flight does not need to be kept
    pub fn is_empty(&self) -> bool {
        self.conversation.is_idle() && self.pending_delete.is_none()
    }
}

/// Who sent the event being handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitterContext {
    pub user_id: UserId,
    pub display_name: String,
}

impl SubmitterContext {
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
        }
    }
}
