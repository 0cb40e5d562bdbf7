//! Weekday-keyed recurring gym sessions.
//!
//! A recurring session is an ordinary reminder carrying `meta.byday`. At most
//! one exists per `(label, byday)`; upserts look that pair up before deciding
//! to create or update. Each session holds only its next occurrence and is
//! moved forward in place rather than recreated.

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::dates::next_occurrence;
use crate::reminders::{allocate_id, merge_unique, RecurrenceMeta, Reminder, ReminderKind};
use crate::store::ReminderStore;
use crate::weekday::{parse_weekday_set, ByDay};

pub const GYM_LABEL: &str = "Gym";

/// Which weekdays an upsert covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaySelection {
    Daily,
    Days(Vec<ByDay>),
}

impl DaySelection {
    /// `DAILY`, comma-separated codes (`MO,WE,FR`) or a phrase like "mon-fri".
    pub fn parse(s: &str) -> Option<DaySelection> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("daily") {
            return Some(DaySelection::Daily);
        }
        let codes: Option<Vec<ByDay>> = s
            .split(',')
            .map(|c| ByDay::from_code(c.trim()))
            .collect();
        match codes {
            Some(days) if !days.is_empty() => Some(DaySelection::Days(days)),
            _ => parse_weekday_set(&s.to_lowercase()).map(DaySelection::Days),
        }
    }

    /// Concrete days; `Daily` expands Monday first.
    pub fn expand(&self) -> Vec<ByDay> {
        match self {
            DaySelection::Daily => ByDay::WEEK.to_vec(),
            DaySelection::Days(days) => days.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipDay {
    Today,
    Tomorrow,
}

pub fn rrule_for(day: ByDay, at: &DateTime<Tz>) -> String {
    format!(
        "FREQ=WEEKLY;BYDAY={};BYHOUR={};BYMINUTE={}",
        day.code(),
        at.hour(),
        at.minute()
    )
}

fn schedule(item: &mut Reminder, day: ByDay, when: &DateTime<Tz>) {
    item.time = Some(when.with_timezone(&Utc));
    item.meta = Some(RecurrenceMeta {
        byday: day,
        rrule: rrule_for(day, when),
    });
}

/// Create or move the gym session for every selected day.
///
/// New sessions start at the next occurrence of `time`. Existing ones move to
/// it, merge `workouts` into their tags and reopen.
pub fn upsert_gym_sessions(
    store: &mut dyn ReminderStore,
    selection: &DaySelection,
    time: NaiveTime,
    workouts: &[String],
    now: &DateTime<Tz>,
) -> Result<Vec<Reminder>> {
    let mut all = store.load()?;
    let mut out = Vec::new();
    let mut created = 0;

    for day in selection.expand() {
        let when = next_occurrence(day, time, now);
        match all.iter_mut().find(|r| r.is_recurring_on(GYM_LABEL, day)) {
            Some(item) => {
                schedule(item, day, &when);
                if !workouts.is_empty() {
                    let merged = merge_unique(&item.workout_tags(), workouts);
                    item.set_workout_tags(merged);
                }
                item.completed = false;
                out.push(item.clone());
            }
            None => {
                let id = allocate_id(&all, now.with_timezone(&Utc), created);
                let mut item =
                    Reminder::new(id, GYM_LABEL, ReminderKind::Gym, when.with_timezone(&Utc));
                schedule(&mut item, day, &when);
                item.set_workout_tags(merge_unique(&[], workouts));
                created += 1;
                all.push(item.clone());
                out.push(item);
            }
        }
    }

    debug!(sessions = out.len(), created, "gym sessions upserted");
    store.replace(all)?;
    Ok(out)
}

/// Apply `edit` to every session `(label, byday)`; writes once if any matched.
fn edit_sessions(
    store: &mut dyn ReminderStore,
    label: &str,
    byday: ByDay,
    mut edit: impl FnMut(&mut Reminder),
) -> Result<Vec<Reminder>> {
    let mut all = store.load()?;
    let mut changed = Vec::new();
    for item in all.iter_mut().filter(|r| r.is_recurring_on(label, byday)) {
        edit(item);
        changed.push(item.clone());
    }
    if !changed.is_empty() {
        store.replace(all)?;
    }
    Ok(changed)
}

pub fn replace_workouts_for_day(
    store: &mut dyn ReminderStore,
    label: &str,
    byday: ByDay,
    workouts: &[String],
) -> Result<Vec<Reminder>> {
    let tags = merge_unique(&[], workouts);
    edit_sessions(store, label, byday, |item| {
        item.set_workout_tags(tags.clone());
        item.completed = false;
    })
}

pub fn add_workouts_to_day(
    store: &mut dyn ReminderStore,
    label: &str,
    byday: ByDay,
    workouts: &[String],
) -> Result<Vec<Reminder>> {
    edit_sessions(store, label, byday, |item| {
        let merged = merge_unique(&item.workout_tags(), workouts);
        item.set_workout_tags(merged);
        item.completed = false;
    })
}

/// Drop tags case-insensitively. Completion is left alone.
pub fn remove_workouts_from_day(
    store: &mut dyn ReminderStore,
    label: &str,
    byday: ByDay,
    workouts: &[String],
) -> Result<Vec<Reminder>> {
    edit_sessions(store, label, byday, |item| {
        let kept: Vec<String> = item
            .workout_tags()
            .into_iter()
            .filter(|tag| !workouts.iter().any(|w| w.eq_ignore_ascii_case(tag)))
            .collect();
        item.set_workout_tags(kept);
    })
}

/// Move the session to the next occurrence of `time` and reopen it.
pub fn change_time_for_day(
    store: &mut dyn ReminderStore,
    label: &str,
    byday: ByDay,
    time: NaiveTime,
    now: &DateTime<Tz>,
) -> Result<Vec<Reminder>> {
    let when = next_occurrence(byday, time, now);
    edit_sessions(store, label, byday, |item| {
        schedule(item, byday, &when);
        item.completed = false;
    })
}

/// Remove every gym session tagged `byday`; returns what was removed.
pub fn remove_gym_day(store: &mut dyn ReminderStore, byday: ByDay) -> Result<Vec<Reminder>> {
    let all = store.load()?;
    let (removed, keep): (Vec<Reminder>, Vec<Reminder>) = all
        .into_iter()
        .partition(|r| r.is_recurring_on(GYM_LABEL, byday));
    if !removed.is_empty() {
        store.replace(keep)?;
    }
    Ok(removed)
}

/// Mark only the occurrence landing today (or tomorrow) as done.
pub fn skip_gym_once(
    store: &mut dyn ReminderStore,
    when: SkipDay,
    now: &DateTime<Tz>,
) -> Result<Vec<Reminder>> {
    let tz = now.timezone();
    let date = match when {
        SkipDay::Today => now.date_naive(),
        SkipDay::Tomorrow => now.date_naive() + Duration::days(1),
    };
    let byday = ByDay::of_date(date);

    let mut all = store.load()?;
    let mut changed = Vec::new();
    for item in all.iter_mut().filter(|r| r.is_recurring_on(GYM_LABEL, byday)) {
        if item.local_time(tz).is_some_and(|t| t.date_naive() == date) {
            item.completed = true;
            changed.push(item.clone());
        }
    }
    if !changed.is_empty() {
        store.replace(all)?;
    }
    Ok(changed)
}
