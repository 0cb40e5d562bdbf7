//! Utterance dispatch: an ordered rule table, first match wins.
//!
//! The order of `RULES` is part of the interpreter's contract. Exact phrases
//! come before verbs, cancel verbs before change verbs, and change verbs before
//! the catch-all create rule (which also fires on a bare time token).

use anyhow::Result;
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use tracing::{debug, info};

use crate::clock::extract_time_token;
use crate::commands::{cancel, change, create, queries};
use crate::error::CommandError;
use crate::intent::{CANCEL_RE, CHANGE_RE, CREATE_RE};
use crate::store::ReminderStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Stats,
    Calendar,
    Settings,
    Today,
}

impl Page {
    pub fn id(self) -> &'static str {
        match self {
            Page::Stats => "stats-page",
            Page::Calendar => "calendar-page",
            Page::Settings => "settings-page",
            Page::Today => "today-page",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Page::Stats => "stats",
            Page::Calendar => "calendar",
            Page::Settings => "settings",
            Page::Today => "today",
        }
    }
}

/// Side effects the caller applies after a command; the core never performs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Navigate(Page),
    SetNotificationsMuted(bool),
    /// The collection was replaced; re-render and re-sync notifications.
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Navigate,
    Mute,
    Unmute,
    GymCheckIn,
    StreakQuery,
    TodayQuery,
    SupplementQuery,
    CancelToday,
    CancelUnsupported,
    Change,
    Create,
    NotUnderstood,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub intent: Intent,
    pub message: String,
    pub error: Option<CommandError>,
    pub created: Vec<i64>,
    pub changed: Vec<i64>,
    pub removed: Vec<i64>,
    pub effects: Vec<Effect>,
}

impl CommandOutcome {
    pub fn say(intent: Intent, message: impl Into<String>) -> Self {
        Self {
            intent,
            message: message.into(),
            error: None,
            created: Vec::new(),
            changed: Vec::new(),
            removed: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn rejected(intent: Intent, err: CommandError) -> Self {
        let mut out = Self::say(intent, err.to_string());
        out.error = Some(err);
        out
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_created(mut self, ids: Vec<i64>) -> Self {
        self.created = ids;
        self
    }

    pub fn with_changed(mut self, ids: Vec<i64>) -> Self {
        self.changed = ids;
        self
    }

    pub fn with_removed(mut self, ids: Vec<i64>) -> Self {
        self.removed = ids;
        self
    }

    /// Ids to highlight: created first, then changed.
    pub fn highlighted(&self) -> Vec<i64> {
        self.created.iter().chain(&self.changed).copied().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Same-label reminders closer than this are duplicates.
    pub dedup_window: Duration,
    /// Labels listed by the today's-tasks query before eliding.
    pub today_preview_limit: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            dedup_window: Duration::seconds(60),
            today_preview_limit: 3,
        }
    }
}

/// Everything a handler sees for one utterance.
pub struct CommandContext<'a> {
    /// Trimmed original text, case preserved.
    pub original: &'a str,
    /// `original`, lowercased.
    pub lower: &'a str,
    pub now: DateTime<Tz>,
    pub config: &'a InterpreterConfig,
    pub store: &'a mut dyn ReminderStore,
}

type Handler = fn(&mut CommandContext<'_>) -> Result<CommandOutcome>;

struct Rule {
    name: &'static str,
    matches: fn(&str) -> bool,
    handle: Handler,
}

const RULES: &[Rule] = &[
    Rule {
        name: "navigate",
        matches: is_navigation,
        handle: navigate,
    },
    Rule {
        name: "mute",
        matches: is_mute,
        handle: mute,
    },
    Rule {
        name: "unmute",
        matches: is_unmute,
        handle: unmute,
    },
    Rule {
        name: "gym-check-in",
        matches: is_gym_check_in,
        handle: queries::gym_check_in,
    },
    Rule {
        name: "streak",
        matches: is_streak_query,
        handle: queries::streak,
    },
    Rule {
        name: "today",
        matches: is_today_query,
        handle: queries::today,
    },
    Rule {
        name: "supplements",
        matches: is_supplement_query,
        handle: queries::supplements,
    },
    Rule {
        name: "cancel-gym-today",
        matches: is_cancel_gym_today,
        handle: cancel::gym_today,
    },
    Rule {
        name: "cancel-protein-today",
        matches: is_cancel_protein_today,
        handle: cancel::protein_today,
    },
    Rule {
        name: "cancel",
        matches: is_cancel,
        handle: cancel::unsupported,
    },
    Rule {
        name: "change",
        matches: is_change,
        handle: change::change_by_filters,
    },
    Rule {
        name: "create",
        matches: is_create,
        handle: create::create_by_command,
    },
];

const GYM_CHECK_IN: &[&str] = &[
    "i went to the gym today",
    "i did gym today",
    "yes i went to gym",
    "mark gym done",
];
const STREAK_QUERIES: &[&str] = &["what's my streak", "whats my streak", "what is my streak"];
const TODAY_QUERIES: &[&str] = &[
    "what are today's tasks",
    "what are todays tasks",
    "what do i have today",
];
const SUPPLEMENT_QUERIES: &[&str] = &["did i take supplements", "did i take my supplements"];

fn navigation_target(lower: &str) -> Option<Page> {
    match lower {
        "open stats" | "show my progress" | "stats" => Some(Page::Stats),
        "open calendar" | "show calendar" | "calendar" => Some(Page::Calendar),
        "open settings" | "settings" | "open profile" => Some(Page::Settings),
        "open today" | "today" | "go to today" => Some(Page::Today),
        _ => None,
    }
}

fn is_navigation(lower: &str) -> bool {
    navigation_target(lower).is_some()
}

fn is_mute(lower: &str) -> bool {
    lower == "mute notifications"
}

fn is_unmute(lower: &str) -> bool {
    lower == "unmute notifications"
}

fn is_gym_check_in(lower: &str) -> bool {
    GYM_CHECK_IN.contains(&lower)
}

fn is_streak_query(lower: &str) -> bool {
    STREAK_QUERIES.contains(&lower)
}

fn is_today_query(lower: &str) -> bool {
    TODAY_QUERIES.contains(&lower)
}

fn is_supplement_query(lower: &str) -> bool {
    SUPPLEMENT_QUERIES.contains(&lower)
}

fn is_cancel_gym_today(lower: &str) -> bool {
    lower.starts_with("cancel gym today") || lower.starts_with("cancle gym today")
}

fn is_cancel_protein_today(lower: &str) -> bool {
    lower.starts_with("cancel protein today")
}

fn is_cancel(lower: &str) -> bool {
    CANCEL_RE.is_match(lower)
}

fn is_change(lower: &str) -> bool {
    CHANGE_RE.is_match(lower)
}

fn is_create(lower: &str) -> bool {
    CREATE_RE.is_match(lower) || extract_time_token(lower).is_some()
}

fn navigate(ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
    let page = navigation_target(ctx.lower).unwrap_or(Page::Today);
    let message = format!("Opening {}.", page.display_name());
    Ok(CommandOutcome::say(Intent::Navigate, message).with_effect(Effect::Navigate(page)))
}

fn mute(_ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
    Ok(CommandOutcome::say(Intent::Mute, "Notifications muted.")
        .with_effect(Effect::SetNotificationsMuted(true)))
}

fn unmute(_ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
    Ok(CommandOutcome::say(Intent::Unmute, "Notifications unmuted.")
        .with_effect(Effect::SetNotificationsMuted(false)))
}

/// Name of the rule that would handle `text`, if any.
pub fn matching_rule(text: &str) -> Option<&'static str> {
    let lower = text.trim().to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&lower))
        .map(|rule| rule.name)
}

/// The command interpreter. Stateless apart from its configuration.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    config: InterpreterConfig,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Route one utterance to exactly one handler.
    ///
    /// Command-level failures come back inside the outcome; `Err` means the
    /// store could not be read or written.
    pub fn process(
        &self,
        text: &str,
        store: &mut dyn ReminderStore,
        now: DateTime<Tz>,
    ) -> Result<CommandOutcome> {
        let original = text.trim();
        let lower = original.to_lowercase();
        let mut ctx = CommandContext {
            original,
            lower: &lower,
            now,
            config: &self.config,
            store,
        };

        let Some(rule) = RULES.iter().find(|rule| (rule.matches)(&lower)) else {
            debug!(utterance = %original, "no rule matched");
            return Ok(CommandOutcome::rejected(Intent::NotUnderstood, CommandError::NotUnderstood));
        };

        debug!(rule = rule.name, utterance = %original, "rule matched");
        let outcome = (rule.handle)(&mut ctx)?;
        info!(
            rule = rule.name,
            created = outcome.created.len(),
            changed = outcome.changed.len(),
            removed = outcome.removed.len(),
            "{}",
            outcome.message
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Tz> {
        chrono_tz::America::Chicago
            .with_ymd_and_hms(2026, 2, 16, 10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_rule_precedence() {
        assert_eq!(matching_rule("  Open Stats "), Some("navigate"));
        assert_eq!(matching_rule("today"), Some("navigate"));
        assert_eq!(matching_rule("mute notifications"), Some("mute"));
        assert_eq!(matching_rule("I went to the gym today"), Some("gym-check-in"));
        assert_eq!(matching_rule("whats my streak"), Some("streak"));
        assert_eq!(matching_rule("what do i have today"), Some("today"));
        assert_eq!(matching_rule("did i take my supplements"), Some("supplements"));
        assert_eq!(matching_rule("cancel gym today please"), Some("cancel-gym-today"));
        assert_eq!(matching_rule("cancle gym today"), Some("cancel-gym-today"));
        assert_eq!(matching_rule("cancel protein today"), Some("cancel-protein-today"));
        // Cancel beats change and create even when both verbs appear.
        assert_eq!(matching_rule("cancel and reschedule gym at 6"), Some("cancel"));
        assert_eq!(matching_rule("move gym to 7pm"), Some("change"));
        assert_eq!(matching_rule("remind me to stretch"), Some("create"));
        assert_eq!(matching_rule("gym at 6am"), Some("create"));
        assert_eq!(matching_rule("hello there"), None);
    }

    #[test]
    fn test_not_understood() {
        let mut store = MemoryStore::new();
        let out = Interpreter::default()
            .process("hello there", &mut store, now())
            .unwrap();
        assert_eq!(out.intent, Intent::NotUnderstood);
        assert_eq!(out.error, Some(CommandError::NotUnderstood));
        assert_eq!(out.message, "Sorry, I didn't understand that command.");
    }

    #[test]
    fn test_navigation_and_mute_emit_effects() {
        let mut store = MemoryStore::new();
        let interp = Interpreter::default();

        let out = interp.process("show calendar", &mut store, now()).unwrap();
        assert_eq!(out.effects, vec![Effect::Navigate(Page::Calendar)]);
        assert_eq!(out.message, "Opening calendar.");

        let out = interp.process("show my progress", &mut store, now()).unwrap();
        assert_eq!(out.message, "Opening stats.");

        let out = interp.process("Unmute notifications", &mut store, now()).unwrap();
        assert_eq!(out.effects, vec![Effect::SetNotificationsMuted(false)]);
        assert_eq!(out.message, "Notifications unmuted.");
    }

    #[test]
    fn test_generic_cancel_does_not_guess() {
        let mut store = MemoryStore::new();
        let out = Interpreter::default()
            .process("delete my creatine reminder", &mut store, now())
            .unwrap();
        assert_eq!(out.intent, Intent::CancelUnsupported);
        assert!(out.removed.is_empty());
    }
}
