//! Create: one reminder, or one per weekday in a weekday set.

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::clock::{extract_time_token, parse_time_of_day};
use crate::dates::{next_occurrence, resolve_date};
use crate::dispatch::{CommandContext, CommandOutcome, Effect, Intent};
use crate::error::CommandError;
use crate::intent::{normalize_title_intent, CHANGE_RE, CREATE_RE};
use crate::reminders::{allocate_id, is_duplicate, Reminder};
use crate::weekday::parse_weekday_set;

static FOR_CLAUSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bfor\s+(.*)$").expect("for clause pattern"));
static WITH_CLAUSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bwith\s+(.*)$").expect("with clause pattern"));

const TITLE_SPLITS: &[&str] = &[" on ", " at ", " for ", " with "];

/// Title text of a create utterance, case preserved.
///
/// Cuts at the last trailing clause marker, then drops the first create and
/// change trigger phrase. Falls back to the whole utterance when nothing is left.
pub fn title_for_command(original: &str) -> String {
    // ASCII lowering keeps byte offsets valid for slicing `original`.
    let lowered = original.to_ascii_lowercase();
    let head = TITLE_SPLITS
        .iter()
        .filter_map(|marker| lowered.rfind(marker))
        .max()
        .map_or(original, |idx| &original[..idx]);

    let title = CREATE_RE.replace(head, "");
    let title = CHANGE_RE.replace(&title, "");
    let title = title.trim();
    if title.is_empty() {
        original.to_string()
    } else {
        title.to_string()
    }
}

/// Trailing "for ..." clause, else "with ...".
pub fn extract_details(lower: &str) -> Option<String> {
    FOR_CLAUSE_RE
        .captures(lower)
        .or_else(|| WITH_CLAUSE_RE.captures(lower))
        .map(|caps| caps[1].trim().to_string())
        .filter(|d| !d.is_empty())
}

pub fn create_by_command(ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
    let intent = normalize_title_intent(&title_for_command(ctx.original));
    let details = extract_details(ctx.lower);

    let Some(token) = extract_time_token(ctx.lower) else {
        return Ok(CommandOutcome::rejected(Intent::Create, CommandError::MissingTime));
    };
    let time = match parse_time_of_day(&token) {
        Ok(t) => t,
        Err(err) => return Ok(CommandOutcome::rejected(Intent::Create, err)),
    };

    let candidates: Vec<DateTime<Tz>> = match parse_weekday_set(ctx.lower) {
        Some(days) => days
            .into_iter()
            .map(|day| next_occurrence(day, time, &ctx.now))
            .collect(),
        None => vec![resolve_date(ctx.lower, time, &ctx.now)],
    };

    let mut all = ctx.store.load()?;
    let created_at = ctx.now.with_timezone(&Utc);
    let mut created = Vec::new();
    for when in candidates {
        let at = when.with_timezone(&Utc);
        if is_duplicate(&all, &intent.label, at, ctx.config.dedup_window) {
            debug!(label = %intent.label, %at, "skipping duplicate");
            continue;
        }
        let id = allocate_id(&all, created_at, created.len() as i64);
        all.push(
            Reminder::new(id, intent.label.clone(), intent.kind, at).with_details(details.clone()),
        );
        created.push(id);
    }

    if created.is_empty() {
        return Ok(CommandOutcome::say(
            Intent::Create,
            "Reminder already exists at that time.",
        ));
    }

    ctx.store.replace(all)?;
    Ok(CommandOutcome::say(
        Intent::Create,
        format!("Added {} reminder(s).", created.len()),
    )
    .with_created(created)
    .with_effect(Effect::Refresh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Interpreter;
    use crate::reminders::ReminderKind;
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, TimeZone, Timelike};
    use chrono_tz::America::Chicago;

    // 2026-02-16 is a Monday.
    fn now() -> DateTime<Tz> {
        Chicago.with_ymd_and_hms(2026, 2, 16, 10, 0, 0).unwrap()
    }

    fn run(store: &mut MemoryStore, text: &str) -> CommandOutcome {
        Interpreter::default().process(text, store, now()).unwrap()
    }

    #[test]
    fn test_title_for_command() {
        assert_eq!(title_for_command("Remind me to Call Mom at 5pm"), "Call Mom");
        assert_eq!(title_for_command("schedule gym at 7pm with legs"), "gym at 7pm");
        assert_eq!(title_for_command("add"), "add");
    }

    #[test]
    fn test_extract_details_prefers_for() {
        assert_eq!(extract_details("gym with legs for 1 hour"), Some("1 hour".to_string()));
        assert_eq!(extract_details("gym at 7 with legs"), Some("legs".to_string()));
        assert_eq!(extract_details("gym at 7"), None);
    }

    #[test]
    fn test_create_single_supplement() {
        let mut store = MemoryStore::new();
        let out = run(&mut store, "remind me to take creatine at 8pm");
        assert_eq!(out.message, "Added 1 reminder(s).");
        assert_eq!(out.created.len(), 1);

        let r = &store.items()[0];
        assert_eq!(r.label, "Creatine");
        assert_eq!(r.kind, ReminderKind::Supplement);
        let local = r.local_time(Chicago).unwrap();
        assert_eq!(local.date_naive(), now().date_naive());
        assert_eq!((local.hour(), local.minute()), (20, 0));
    }

    #[test]
    fn test_create_weekday_set() {
        let mut store = MemoryStore::new();
        let out = run(&mut store, "gym on mon, wed and fri at 6pm");
        assert_eq!(out.message, "Added 3 reminder(s).");

        let dates: Vec<NaiveDate> = store
            .items()
            .iter()
            .map(|r| r.local_time(Chicago).unwrap().date_naive())
            .collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 2, 16).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 18).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(),
            ]
        );
        let ids = &out.created;
        assert_eq!(ids[1], ids[0] + 1);
        assert!(store.items().iter().all(|r| r.label == "Gym"));
    }

    #[test]
    fn test_create_dedups_within_window() {
        let mut store = MemoryStore::new();
        assert_eq!(run(&mut store, "gym at 6am").created.len(), 1);
        let again = run(&mut store, "gym at 6am");
        assert_eq!(again.message, "Reminder already exists at that time.");
        assert!(again.created.is_empty());
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_create_keeps_details() {
        let mut store = MemoryStore::new();
        run(&mut store, "schedule gym at 7pm with legs and core");
        assert_eq!(store.items()[0].details.as_deref(), Some("legs and core"));
        assert_eq!(store.items()[0].label, "Gym");
    }

    #[test]
    fn test_create_time_errors() {
        let mut store = MemoryStore::new();
        let out = run(&mut store, "remind me to stretch");
        assert_eq!(out.error, Some(CommandError::MissingTime));
        assert_eq!(out.message, "Please specify a time.");

        let out = run(&mut store, "gym at 25pm");
        assert_eq!(out.error, Some(CommandError::InvalidTime("25pm".to_string())));
        assert_eq!(out.message, "Couldn't understand that time.");
        assert!(store.items().is_empty());
    }
}
