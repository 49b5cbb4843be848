//! Bot configuration loaded from the environment

use crate::store::UserId;
use chrono::FixedOffset;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_STORE_PATH: &str = "users.json";
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 3;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name}={value:?} is invalid: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Users allowed to run operator commands and press operator buttons
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorAllowList(HashSet<UserId>);

impl OperatorAllowList {
    pub fn new(ids: impl IntoIterator<Item = UserId>) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.0.contains(&user)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub telegram_api_url: String,
    pub store_path: PathBuf,
    pub operators: OperatorAllowList,
    /// Offset creation times are recorded and shown in
    pub display_offset: FixedOffset,
    /// Long-poll window for `getUpdates`
    pub poll_timeout: Duration,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let telegram_token = lookup("TELEGRAM_APITOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("TELEGRAM_APITOKEN"))?;

        let telegram_api_url =
            lookup("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let store_path = lookup("INTAKE_STORE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from);

        let operators = match lookup("INTAKE_OPERATOR_IDS") {
            Some(raw) => parse_operator_ids(&raw)?,
            None => OperatorAllowList::default(),
        };

        let offset_hours = match lookup("INTAKE_UTC_OFFSET_HOURS") {
            Some(raw) => parse_number::<i32>("INTAKE_UTC_OFFSET_HOURS", &raw)?,
            None => DEFAULT_UTC_OFFSET_HOURS,
        };
        let display_offset = offset_from_hours(offset_hours).ok_or_else(|| ConfigError::Invalid {
            name: "INTAKE_UTC_OFFSET_HOURS",
            value: offset_hours.to_string(),
            reason: "must be between -23 and 23".to_string(),
        })?;

        let poll_secs = match lookup("INTAKE_POLL_TIMEOUT_SECS") {
            Some(raw) => parse_number::<u64>("INTAKE_POLL_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_POLL_TIMEOUT_SECS,
        };

        Ok(Self {
            telegram_token,
            telegram_api_url,
            store_path,
            operators,
            display_offset,
            poll_timeout: Duration::from_secs(poll_secs),
        })
    }
}

fn parse_operator_ids(raw: &str) -> Result<OperatorAllowList, ConfigError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_number::<i64>("INTAKE_OPERATOR_IDS", entry).map(UserId))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(OperatorAllowList::new(ids))
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    if !(-23..=23).contains(&hours) {
        return None;
    }
    FixedOffset::east_opt(hours * 3600)
}
