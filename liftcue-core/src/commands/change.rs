//! Change: find which upcoming reminder(s) an edit refers to, then apply a new
//! time and/or a new label.
//!
//! The words right after the change verb name the target ("change *leg day* to
//! 6pm") unless they read as a date qualifier ("move *tomorrow's* gym"), in
//! which case the text before the verb names it instead.

use anyhow::Result;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::clock::{extract_time_token, parse_time_of_day};
use crate::dates::{find_iso_date, mentions_today, mentions_tomorrow};
use crate::dispatch::{CommandContext, CommandOutcome, Effect, Intent};
use crate::error::{CommandError, TargetScope};
use crate::intent::{normalize_title_intent, TitleIntent, CHANGE_RE};
use crate::reminders::{Reminder, ReminderKind};
use crate::time::{at_time, start_of_today, DayWindow};
use crate::weekday::{parse_next_weekday, parse_weekday_set, ByDay};

static QUALIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btoday\b|\btomorrow\b|^\d{1,2}").expect("date qualifier pattern"));

fn is_date_qualifier(words: &str) -> bool {
    QUALIFIER_RE.is_match(words)
        || parse_weekday_set(words).is_some()
        || parse_next_weekday(words).is_some()
}

/// Lowercased text naming the target.
pub fn target_context(original: &str) -> String {
    let Some(verb) = CHANGE_RE.find(original) else {
        return original.to_lowercase();
    };
    let before = original[..verb.start()].trim().to_lowercase();
    let after = original[verb.end()..].trim().to_lowercase();
    let first_words = after.split(' ').take(2).collect::<Vec<_>>().join(" ");

    if first_words.is_empty() || is_date_qualifier(&first_words) {
        before
    } else {
        first_words
    }
}

/// Incomplete reminders from the start of today onwards that match `target`,
/// earliest first, as indices into `items`.
fn upcoming_matches(
    items: &[Reminder],
    target: &TitleIntent,
    ctx: &CommandContext<'_>,
) -> Vec<usize> {
    let start = start_of_today(&ctx.now);
    let wanted = target.label.to_lowercase();
    let any_workout = wanted == "workout" || wanted == "exercise";

    let mut found: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.completed && r.time.is_some_and(|t| t >= start))
        .filter(|(_, r)| {
            if any_workout {
                r.kind == ReminderKind::Workout
            } else {
                r.label.to_lowercase() == wanted
            }
        })
        .map(|(i, _)| i)
        .collect();
    found.sort_by_key(|&i| items[i].time);
    found
}

/// Narrow candidates by the date filter in the utterance.
///
/// Weekday set: the first occurrence per requested day. ISO date, "today" or
/// "tomorrow": the first candidate on that day. Otherwise the soonest one.
fn narrow(items: &[Reminder], candidates: Vec<usize>, ctx: &CommandContext<'_>) -> Vec<usize> {
    let tz = ctx.now.timezone();
    let local_date = |i: usize| items[i].local_time(tz).map(|t| t.date_naive());

    if let Some(days) = parse_weekday_set(ctx.lower) {
        let mut seen: Vec<ByDay> = Vec::new();
        return candidates
            .into_iter()
            .filter(|&i| {
                let Some(day) = local_date(i).map(ByDay::of_date) else {
                    return false;
                };
                if days.contains(&day) && !seen.contains(&day) {
                    seen.push(day);
                    true
                } else {
                    false
                }
            })
            .collect();
    }

    let window = if let Some(date) = find_iso_date(ctx.lower) {
        Some(DayWindow::for_date(tz, date))
    } else if mentions_tomorrow(ctx.lower) {
        Some(DayWindow::tomorrow(&ctx.now))
    } else if mentions_today(ctx.lower) {
        Some(DayWindow::today(&ctx.now))
    } else {
        None
    };

    let first = match window {
        Some(window) => candidates.into_iter().find(|&i| items[i].is_within(&window)),
        None => candidates.into_iter().next(),
    };
    first.into_iter().collect()
}

pub fn change_by_filters(ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
    let original = ctx.original;
    let new_time = extract_time_token(ctx.lower)
        .and_then(|t| parse_time_of_day(&t).ok());
    let after_verb = CHANGE_RE
        .find(original)
        .map_or("", |m| original[m.end()..].trim());
    let new_intent = normalize_title_intent(after_verb);
    let target = normalize_title_intent(&target_context(original));

    let mut all = ctx.store.load()?;
    let candidates = upcoming_matches(&all, &target, ctx);
    let selected = narrow(&all, candidates, ctx);
    debug!(target = %target.label, selected = selected.len(), "change targets resolved");

    if selected.is_empty() {
        return Ok(CommandOutcome::rejected(
            Intent::Change,
            CommandError::NoTargetFound {
                label: target.label,
                scope: TargetScope::Upcoming,
            },
        ));
    }

    let tz = ctx.now.timezone();
    let rename = new_intent.kind != ReminderKind::Generic && new_intent.label != target.label;
    let mut changed = Vec::new();
    for i in selected {
        let item = &mut all[i];
        let mut touched = false;
        if let (Some(time), Some(local)) = (new_time, item.local_time(tz)) {
            let moved = at_time(tz, local.date_naive(), time);
            item.time = Some(moved.with_timezone(&Utc));
            touched = true;
        }
        if rename {
            item.label = new_intent.label.clone();
            item.kind = new_intent.kind;
            touched = true;
        }
        if touched {
            changed.push(item.id);
        }
    }

    if changed.is_empty() {
        return Ok(CommandOutcome::say(
            Intent::Change,
            "Didn't find anything specific to change.",
        ));
    }

    ctx.store.replace(all)?;
    Ok(CommandOutcome::say(
        Intent::Change,
        format!("Updated {} reminder(s).", changed.len()),
    )
    .with_changed(changed)
    .with_effect(Effect::Refresh))
}
