//! Date resolution: next weekday occurrence, ISO dates, relative words.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::time::at_time;
use crate::weekday::{normalize_day_tokens, parse_next_weekday, ByDay};

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("iso date pattern"));
static ISO_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("iso token pattern"));
static TOMORROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btomorrow\b").expect("tomorrow pattern"));
static TODAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btoday\b").expect("today pattern"));

/// Next instant carrying weekday `day` at `time`, strictly after `now`.
///
/// Today counts only while `time` is still ahead of the current minute;
/// otherwise the result lands one week out.
pub fn next_occurrence(day: ByDay, time: NaiveTime, now: &DateTime<Tz>) -> DateTime<Tz> {
    let today = ByDay::of_date(now.date_naive());
    let mut delta = today.days_until(day);
    let passed = (now.hour(), now.minute()) >= (time.hour(), time.minute());
    if delta == 0 && passed {
        delta = 7;
    }
    let mut out = at_time(now.timezone(), now.date_naive() + Duration::days(delta), time);
    if out <= *now {
        out = at_time(now.timezone(), out.date_naive() + Duration::days(7), time);
    }
    out
}

/// Strict `YYYY-MM-DD`; the calendar date must exist.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let caps = ISO_DATE_RE.captures(s.trim())?;
    let y: i32 = caps[1].parse().ok()?;
    let m: u32 = caps[2].parse().ok()?;
    let d: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

/// First valid ISO date token anywhere in `text`.
pub fn find_iso_date(text: &str) -> Option<NaiveDate> {
    ISO_TOKEN_RE
        .captures(text)
        .and_then(|caps| parse_iso_date(&caps[1]))
}

pub fn mentions_today(lower: &str) -> bool {
    TODAY_RE.is_match(lower)
}

pub fn mentions_tomorrow(lower: &str) -> bool {
    TOMORROW_RE.is_match(lower)
}

/// Absolute due time for a single (non-weekday-set) reminder.
///
/// Day signal priority: ISO date > "next <weekday>" > any weekday name >
/// "tomorrow" > today. With no day signal, a time that already passed today
/// rolls to tomorrow.
pub fn resolve_date(lower: &str, time: NaiveTime, now: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();

    if let Some(date) = find_iso_date(lower) {
        return at_time(tz, date, time);
    }
    if let Some(day) = parse_next_weekday(lower) {
        return next_occurrence(day, time, now);
    }
    let normalized = normalize_day_tokens(lower);
    if let Some(day) = ByDay::ALL.into_iter().find(|d| normalized.contains(d.name())) {
        return next_occurrence(day, time, now);
    }
    if mentions_tomorrow(lower) {
        return at_time(tz, today + Duration::days(1), time);
    }

    let passed = (now.hour(), now.minute()) > (time.hour(), time.minute());
    let date = if passed { today + Duration::days(1) } else { today };
    at_time(tz, date, time)
}
