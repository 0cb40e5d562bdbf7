//! User-facing command failures.
//!
//! None of these abort the interpreter: each one is rendered into the status
//! message of a `CommandOutcome`. Only storage failures travel as `anyhow::Error`.

use thiserror::Error;

/// Where a handler looked for an existing reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetScope {
    /// Incomplete reminders from the start of today onwards (change).
    Upcoming,
    /// Reminders scheduled today (cancel).
    Today,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Please specify a time.")]
    MissingTime,

    #[error("Couldn't understand that time.")]
    InvalidTime(String),

    #[error("{}", describe_missing(.label, .scope))]
    NoTargetFound { label: String, scope: TargetScope },

    #[error("Sorry, I didn't understand that command.")]
    NotUnderstood,
}

fn describe_missing(label: &str, scope: &TargetScope) -> String {
    match scope {
        TargetScope::Upcoming => format!("Couldn't find upcoming \"{label}\" to change."),
        TargetScope::Today => format!("No {label} found for today."),
    }
}
