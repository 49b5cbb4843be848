//! Submission record types

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a chat user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game modes a submission can be filed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "MOC")]
    Moc,
    #[serde(rename = "PF")]
    Pf,
    #[serde(rename = "APOC")]
    Apoc,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Moc, GameMode::Pf, GameMode::Apoc];

    /// The token users type (or tap) to pick this mode
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Moc => "MOC",
            GameMode::Pf => "PF",
            GameMode::Apoc => "APOC",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == token)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed form that has not been written yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub user_id: UserId,
    pub game_mode: GameMode,
    pub login: String,
    pub password: String,
    pub contact_handle: String,
    pub submitter_display_name: String,
}

impl NewSubmission {
    pub fn stamped(self, created_at: DateTime<FixedOffset>) -> Submission {
        Submission {
            user_id: self.user_id,
            game_mode: self.game_mode,
            login: self.login,
            password: self.password,
            contact_handle: self.contact_handle,
            submitter_display_name: self.submitter_display_name,
            created_at,
        }
    }
}

/// A stored submission, as it appears in the persisted file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub user_id: UserId,
    pub game_mode: GameMode,
    pub login: String,
    pub password: String,
    pub contact_handle: String,
    #[serde(default)]
    pub submitter_display_name: String,
    pub created_at: DateTime<FixedOffset>,
}

/// Aggregate view over the whole store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionStats {
    pub total: usize,
    /// Counts per mode, in `GameMode::ALL` order, modes with no records omitted
    pub by_mode: Vec<(GameMode, usize)>,
    pub latest: Option<DateTime<FixedOffset>>,
}

impl SubmissionStats {
    pub fn from_records(records: &[Submission]) -> Self {
        let by_mode = GameMode::ALL
            .into_iter()
            .map(|mode| {
                let count = records.iter().filter(|r| r.game_mode == mode).count();
                (mode, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();

        Self {
            total: records.len(),
            by_mode,
            latest: records.iter().map(|r| r.created_at).max(),
        }
    }
}
