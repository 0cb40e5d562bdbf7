//! Title/intent normalization: map a text fragment to a reminder kind + label.
//!
//! Keyword-driven and deterministic: vocabulary lists checked in a fixed
//! order, first hit wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::reminders::ReminderKind;

pub static CANCEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(cancel|cancle|delete|drop|remove|nix|get rid of)\b")
        .expect("cancel pattern")
});
pub static CHANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(change|update|reschedule|move|modify|edit)\b").expect("change pattern")
});
/// No leading word boundary: trigger phrases may be glued to a preceding word.
pub static CREATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(?:schedule a|schedule|remind me to|remind me|make a|create a|add a|add|",
        r"set a|set|book a|book|put|new)\b"
    ))
    .expect("create pattern")
});

static LEADING_TO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^to\s+").expect("leading to pattern"));
static TRAILING_CLAUSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" at | on | for | with ").expect("trailing clause pattern"));

pub const SUPPLEMENTS: &[&str] = &[
    "protein",
    "creatine",
    "pre workout",
    "pre-workout",
    "preworkout",
];

pub const WORKOUT_KEYWORDS: &[&str] = &[
    "cardio", "run", "jog", "lift", "exercise", "push day", "pull day", "leg day", "legs", "chest",
    "back", "arms", "shoulders", "workout",
];

const STOP_TITLES: &[&str] = &["my", "schedule", "reminder"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleIntent {
    pub kind: ReminderKind,
    pub label: String,
}

impl TitleIntent {
    fn new(kind: ReminderKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
        }
    }
}

/// Classify a title fragment.
///
/// Order: workout vocabulary > "gym" > supplements (Protein > Creatine >
/// Pre-Workout) > the cleaned-up text itself > "Reminder".
pub fn normalize_title_intent(text: &str) -> TitleIntent {
    let lower = text.to_lowercase();
    let t = LEADING_TO_RE.replace(&lower, "");
    let t = t.trim();

    if let Some(kw) = WORKOUT_KEYWORDS.iter().find(|kw| t.contains(**kw)) {
        return TitleIntent::new(ReminderKind::Workout, capitalize(kw));
    }
    if t.contains("gym") {
        return TitleIntent::new(ReminderKind::Gym, "Gym");
    }
    if SUPPLEMENTS.iter().any(|s| t.contains(*s)) {
        let label = if t.contains("protein") {
            "Protein"
        } else if t.contains("creatine") {
            "Creatine"
        } else {
            "Pre-Workout"
        };
        return TitleIntent::new(ReminderKind::Supplement, label);
    }

    let stripped = CREATE_RE.replace(text, "");
    let stripped = CHANGE_RE.replace(&stripped, "");
    let clean = TRAILING_CLAUSE_RE
        .split(&stripped)
        .next()
        .unwrap_or_default()
        .trim();

    if !clean.is_empty() && !STOP_TITLES.contains(&clean.to_lowercase().as_str()) {
        return TitleIntent::new(ReminderKind::Generic, capitalize(clean));
    }
    TitleIntent::new(ReminderKind::Generic, "Reminder")
}

/// Uppercase the first character only.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether a label names a supplement.
pub fn is_supplement_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    SUPPLEMENTS.iter().any(|s| lower.contains(*s))
}
