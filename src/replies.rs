//! User-facing message texts
//!
//! Everything the bot says lives here so the state machine and the router
//! only decide *which* message to send.

use crate::store::{Submission, SubmissionStats};
use chrono::{DateTime, FixedOffset};
use std::fmt::Write;

/// Shown in place of the password in every confirmation
pub const PASSWORD_MASK: &str = "********";

const SEPARATOR: &str = "────────────────────";

// ============================================================================
// General
// ============================================================================

pub const GREETING: &str = "🚀 Welcome!\n\nUse /help to see the available commands.";

pub const OPERATOR_HELP: &str = "🛠️ Operator commands:

/orders - Show all orders
/stats - Order statistics
/delete - Delete ALL orders
/deleteorder <number> - Delete a single order
/adminhelp - Operator command help";

pub fn user_help(is_operator: bool) -> String {
    let mut text = String::from(
        "📋 Available commands:

/start - Start working with the bot
/help - Show commands
/neworder - Create a new order",
    );
    if is_operator {
        text.push_str("\n\n🛠️ Operator commands are listed in /adminhelp");
    }
    text
}

pub fn echo(text: &str) -> String {
    format!("🤖 I received your message: \"{text}\"\n\nUse /help to see the commands.")
}

// ============================================================================
// Intake flow
// ============================================================================

pub const CHOOSE_GAME_MODE: &str = "🎮 Choose a game mode:";
pub const CHOOSE_GAME_MODE_AGAIN: &str = "Please pick a game mode on the keyboard:";
pub const ASK_ARTIFACT_CHANGE: &str = "May artifacts be swapped on your characters?";
pub const ASK_ARTIFACT_CHANGE_AGAIN: &str = "Please choose 'Yes' or 'No' on the keyboard:";
pub const ASK_LOGIN: &str = "Enter your login:";
pub const ASK_LOGIN_AGAIN: &str = "The login cannot be empty. Enter your login:";
pub const ASK_PASSWORD: &str = "Enter your password:";
pub const ASK_PASSWORD_AGAIN: &str = "The password cannot be empty. Enter your password:";
pub const ASK_CONTACT_HANDLE: &str = "Enter your Telegram username (in the form @example):";
pub const INVALID_CONTACT_HANDLE: &str = "❌ Invalid username format!

The username must start with @ and contain only letters, digits and underscores.
Example: @example_user

Please enter your username again:";
pub const START_WITH_NEW_ORDER: &str = "Please start the process with /neworder";
pub const RESTART_REQUIRED: &str = "Unknown state. Start over with /neworder";

pub fn saved(submission: &Submission) -> String {
    format!(
        "✅ Your data has been saved!\n\n\
         Game mode: {}\n\
         Login: {}\n\
         Password: {PASSWORD_MASK}\n\
         Telegram: {}\n\
         🕐 Order created: {}",
        submission.game_mode,
        submission.login,
        submission.contact_handle,
        display_time(&submission.created_at),
    )
}

pub fn save_failed(error: &str) -> String {
    format!("Failed to save your data: {error}\n\nSend your username again to retry.")
}

// ============================================================================
// Operator flows
// ============================================================================

pub const CONFIRM_DELETE_ALL: &str =
    "⚠️ Are you sure you want to delete ALL orders?\n\nThis cannot be undone!";
pub const DELETE_ONE_USAGE: &str = "Usage: /deleteorder <order number>";
pub const INVALID_ORDER_NUMBER: &str = "Invalid order number";
pub const DELETED_ALL: &str = "✅ All orders deleted!";
pub const DELETE_CANCELLED: &str = "❌ Deletion cancelled";
pub const CONFIRMATION_EXPIRED: &str =
    "⚠️ This confirmation is no longer valid. Request the deletion again.";
pub const UNKNOWN_ACTION: &str = "Unknown command";

/// One block listing every submission, numbered from 1
pub fn submission_list(submissions: &[Submission]) -> String {
    if submissions.is_empty() {
        return "📭 No active orders".to_string();
    }

    let mut text = format!("📋 All orders ({}):\n\n", submissions.len());
    for (index, s) in submissions.iter().enumerate() {
        let _ = writeln!(text, "🔢 #{}", index + 1);
        let _ = writeln!(text, "👤 User ID: {}", s.user_id);
        let _ = writeln!(text, "📱 Telegram: {}", s.contact_handle);
        let _ = writeln!(text, "🙂 Name: {}", s.submitter_display_name);
        let _ = writeln!(text, "🎮 Mode: {}", s.game_mode);
        let _ = writeln!(text, "🔑 Login: {}", s.login);
        let _ = writeln!(text, "🔒 Password: {}", s.password);
        let _ = writeln!(text, "🕐 Created: {}", full_time(&s.created_at));
        let _ = writeln!(text, "{SEPARATOR}");
    }
    text
}

pub fn stats(stats: &SubmissionStats) -> String {
    let mut text = format!("📊 Order statistics:\n📦 Total orders: {}", stats.total);
    for (mode, count) in &stats.by_mode {
        let _ = write!(text, "\n🎮 {mode}: {count}");
    }
    if let Some(latest) = &stats.latest {
        let _ = write!(text, "\n⏰ Latest order: {}", display_time(latest));
    }
    text
}

/// Prompt before removing one order; never shows the password
pub fn confirm_delete_one(number: usize, submission: &Submission) -> String {
    format!(
        "⚠️ Are you sure you want to delete order #{number}?\n\n\
         👤 User ID: {}\n\
         📱 Telegram: {}\n\
         🎮 Mode: {}\n\
         🔑 Login: {}\n\
         🕐 Created: {}\n\n\
         This cannot be undone!",
        submission.user_id,
        submission.contact_handle,
        submission.game_mode,
        submission.login,
        full_time(&submission.created_at),
    )
}

pub fn order_missing(number: usize) -> String {
    format!("Order #{number} does not exist")
}

pub fn deleted_one(number: usize) -> String {
    format!("✅ Order #{number} deleted!")
}

pub fn delete_failed(error: &str) -> String {
    format!("❌ Failed to delete: {error}")
}

pub fn list_failed(error: &str) -> String {
    format!("❌ Failed to read orders: {error}")
}

pub fn stats_failed(error: &str) -> String {
    format!("❌ Failed to compute statistics: {error}")
}

// ============================================================================
// Time formatting
// ============================================================================

/// Short form, e.g. `01.03.2026 at 15:04`
pub fn display_time(at: &DateTime<FixedOffset>) -> String {
    at.format("%d.%m.%Y at %H:%M").to_string()
}

/// Full form, e.g. `01.03.2026 15:04:05 (UTC+03:00)`
pub fn full_time(at: &DateTime<FixedOffset>) -> String {
    at.format("%d.%m.%Y %H:%M:%S (UTC%:z)").to_string()
}
