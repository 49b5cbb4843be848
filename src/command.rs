//! Slash-command and inline-button payload parsing

use crate::state_machine::DeleteTarget;
use std::fmt;

/// A recognized slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// Begin (or restart) the intake form
    NewOrder,
    /// List every stored submission
    Orders,
    Stats,
    /// Request deletion of every submission
    DeleteAll,
    /// Request deletion of one submission; the argument is the raw 1-based number
    DeleteOrder { argument: Option<String> },
    OperatorHelp,
}

impl Command {
    /// Operator commands are only honored for allow-listed users
    pub fn is_operator_only(&self) -> bool {
        matches!(
            self,
            Command::Orders
                | Command::Stats
                | Command::DeleteAll
                | Command::DeleteOrder { .. }
                | Command::OperatorHelp
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Start => write!(f, "/start"),
            Command::Help => write!(f, "/help"),
            Command::NewOrder => write!(f, "/neworder"),
            Command::Orders => write!(f, "/orders"),
            Command::Stats => write!(f, "/stats"),
            Command::DeleteAll => write!(f, "/delete"),
            Command::DeleteOrder { .. } => write!(f, "/deleteorder"),
            Command::OperatorHelp => write!(f, "/adminhelp"),
        }
    }
}

/// Parse a message body as a slash command
///
/// The first whitespace-separated token must start with `/`. A `@botname`
/// suffix on that token is ignored and matching is case-insensitive. Returns
/// None for plain text and for unknown commands, which the caller treats as
/// ordinary conversation input.
pub fn parse_command(text: &str) -> Option<Command> {
    let mut tokens = text.split_whitespace();
    let head = tokens.next()?.strip_prefix('/')?;
    let name = head.split_once('@').map_or(head, |(name, _)| name);

    let command = match name.to_ascii_lowercase().as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "neworder" => Command::NewOrder,
        "orders" => Command::Orders,
        "stats" => Command::Stats,
        "delete" => Command::DeleteAll,
        "deleteorder" => Command::DeleteOrder {
            argument: tokens.next().map(str::to_string),
        },
        "adminhelp" => Command::OperatorHelp,
        _ => return None,
    };
    Some(command)
}

const LIST_PAYLOAD: &str = "list_orders";
const DELETE_ALL_PAYLOAD: &str = "delete_all";
const CANCEL_PAYLOAD: &str = "cancel_delete";
const CONFIRM_ALL_PREFIX: &str = "confirm_all_";
const CONFIRM_ORDER_PREFIX: &str = "confirm_order_";

/// What an inline button press asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    ListSubmissions,
    RequestDeleteAll,
    Confirm(DeleteTarget),
    Cancel,
    Unknown(String),
}

impl CallbackAction {
    pub fn parse(payload: &str) -> Self {
        match payload {
            LIST_PAYLOAD => return Self::ListSubmissions,
            DELETE_ALL_PAYLOAD => return Self::RequestDeleteAll,
            CANCEL_PAYLOAD => return Self::Cancel,
            _ => {}
        }

        if payload.starts_with(CONFIRM_ALL_PREFIX) {
            return Self::Confirm(DeleteTarget::All);
        }
        if let Some(position) = payload
            .strip_prefix(CONFIRM_ORDER_PREFIX)
            .and_then(|raw| raw.parse::<usize>().ok())
        {
            return Self::Confirm(DeleteTarget::One { position });
        }
        Self::Unknown(payload.to_string())
    }

    /// The payload carried by the button for this action
    pub fn payload(&self) -> String {
        match self {
            Self::ListSubmissions => LIST_PAYLOAD.to_string(),
            Self::RequestDeleteAll => DELETE_ALL_PAYLOAD.to_string(),
            Self::Confirm(DeleteTarget::All) => format!("{CONFIRM_ALL_PREFIX}-1"),
            Self::Confirm(DeleteTarget::One { position }) => {
                format!("{CONFIRM_ORDER_PREFIX}{position}")
            }
            Self::Cancel => CANCEL_PAYLOAD.to_string(),
            Self::Unknown(raw) => raw.clone(),
        }
    }
}
