//! Weekday codes, alias normalization, and weekday-set parsing.
//!
//! `ByDay` is the storage key for recurring sessions (`meta.byday`), and its
//! index follows the calendar convention Sunday = 0 .. Saturday = 6.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ByDay {
    #[serde(rename = "SU")]
    Sunday,
    #[serde(rename = "MO")]
    Monday,
    #[serde(rename = "TU")]
    Tuesday,
    #[serde(rename = "WE")]
    Wednesday,
    #[serde(rename = "TH")]
    Thursday,
    #[serde(rename = "FR")]
    Friday,
    #[serde(rename = "SA")]
    Saturday,
}

impl ByDay {
    /// Sunday-first, matching `index()`.
    pub const ALL: [ByDay; 7] = [
        ByDay::Sunday,
        ByDay::Monday,
        ByDay::Tuesday,
        ByDay::Wednesday,
        ByDay::Thursday,
        ByDay::Friday,
        ByDay::Saturday,
    ];

    /// Monday-first, the order "DAILY" expands to.
    pub const WEEK: [ByDay; 7] = [
        ByDay::Monday,
        ByDay::Tuesday,
        ByDay::Wednesday,
        ByDay::Thursday,
        ByDay::Friday,
        ByDay::Saturday,
        ByDay::Sunday,
    ];

    pub const WORKDAYS: [ByDay; 5] = [
        ByDay::Monday,
        ByDay::Tuesday,
        ByDay::Wednesday,
        ByDay::Thursday,
        ByDay::Friday,
    ];

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(i: u32) -> ByDay {
        Self::ALL[(i % 7) as usize]
    }

    pub fn code(self) -> &'static str {
        match self {
            ByDay::Sunday => "SU",
            ByDay::Monday => "MO",
            ByDay::Tuesday => "TU",
            ByDay::Wednesday => "WE",
            ByDay::Thursday => "TH",
            ByDay::Friday => "FR",
            ByDay::Saturday => "SA",
        }
    }

    /// Lowercase full name, the canonical form after `normalize_day_tokens`.
    pub fn name(self) -> &'static str {
        match self {
            ByDay::Sunday => "sunday",
            ByDay::Monday => "monday",
            ByDay::Tuesday => "tuesday",
            ByDay::Wednesday => "wednesday",
            ByDay::Thursday => "thursday",
            ByDay::Friday => "friday",
            ByDay::Saturday => "saturday",
        }
    }

    pub fn from_name(name: &str) -> Option<ByDay> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    pub fn from_code(code: &str) -> Option<ByDay> {
        Self::ALL
            .into_iter()
            .find(|d| d.code().eq_ignore_ascii_case(code))
    }

    pub fn from_chrono(w: Weekday) -> ByDay {
        Self::from_index(w.num_days_from_sunday())
    }

    pub fn of_date(date: NaiveDate) -> ByDay {
        Self::from_chrono(date.weekday())
    }

    /// Days to walk forward from `self` to reach `other` (0..=6).
    pub fn days_until(self, other: ByDay) -> i64 {
        ((other.index() + 7 - self.index()) % 7) as i64
    }
}

impl fmt::Display for ByDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ByDay {
    type Err = anyhow::Error;

    /// Accepts codes ("MO") and any alias `normalize_day_tokens` understands.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(d) = ByDay::from_code(s) {
            return Ok(d);
        }
        let normalized = normalize_day_tokens(s);
        ByDay::from_name(normalized.trim())
            .ok_or_else(|| anyhow::anyhow!("unknown weekday: {s}"))
    }
}

static DAY_ALIASES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bmon(day)?\b", "monday"),
        (r"\btue(s|sday)?\b", "tuesday"),
        (r"\bwed(nesday)?\b", "wednesday"),
        (r"\bthu(r|rs|rsday|rsd)?\b", "thursday"),
        (r"\bfri(day)?\b", "friday"),
        (r"\bsat(urday)?\b", "saturday"),
        (r"\bsun(day)?\b", "sunday"),
    ]
    .into_iter()
    .map(|(pat, full)| (Regex::new(pat).expect("day alias pattern"), full))
    .collect()
});

const DAY_NAMES: &str = "sunday|monday|tuesday|wednesday|thursday|friday|saturday";

static WEEKDAYS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bweekdays?\b").expect("weekdays pattern"));
static WEEKEND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bweekend\b").expect("weekend pattern"));
static DAILY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bevery\s*day\b|\beveryday\b|\bdaily\b").expect("daily pattern"));
static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b({DAY_NAMES})\b\s*(?:-|to|through|till|until)\s*\b({DAY_NAMES})\b"
    ))
    .expect("day range pattern")
});
static NEXT_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\bnext\s+({DAY_NAMES})\b")).expect("next weekday pattern"));

/// Lowercase `s` and expand day abbreviations to full names.
///
/// "mon" -> "monday", "tues" -> "tuesday", "thur"/"thurs" -> "thursday", ...
pub fn normalize_day_tokens(s: &str) -> String {
    let mut out = s.to_lowercase();
    for (re, full) in DAY_ALIASES.iter() {
        out = re.replace_all(&out, *full).into_owned();
    }
    out
}

/// Map a phrase to an ordered, duplicate-free set of weekdays.
///
/// Precedence: "weekday(s)" > "weekend" > "every day"/"daily" > an explicit
/// range (walks forward, wrapping past Saturday) > every day name present.
/// Returns `None` when the phrase carries no weekday signal at all.
pub fn parse_weekday_set(s: &str) -> Option<Vec<ByDay>> {
    let s = normalize_day_tokens(s);

    if WEEKDAYS_RE.is_match(&s) {
        return Some(ByDay::WORKDAYS.to_vec());
    }
    if WEEKEND_RE.is_match(&s) {
        return Some(vec![ByDay::Saturday, ByDay::Sunday]);
    }
    if DAILY_RE.is_match(&s) {
        return Some(ByDay::ALL.to_vec());
    }

    if let Some(caps) = RANGE_RE.captures(&s) {
        let start = ByDay::from_name(&caps[1])?;
        let end = ByDay::from_name(&caps[2])?;
        let span = start.days_until(end);
        return Some(
            (0..=span)
                .map(|step| ByDay::from_index(start.index() + step as u32))
                .collect(),
        );
    }

    let found: Vec<ByDay> = ByDay::ALL
        .into_iter()
        .filter(|d| s.contains(d.name()))
        .collect();
    if found.is_empty() { None } else { Some(found) }
}

/// "next friday" -> Friday.
pub fn parse_next_weekday(s: &str) -> Option<ByDay> {
    let s = normalize_day_tokens(s);
    NEXT_DAY_RE
        .captures(&s)
        .and_then(|caps| ByDay::from_name(&caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_normalize_to_same_day() {
        let groups: [(&[&str], ByDay); 7] = [
            (&["mon", "monday"], ByDay::Monday),
            (&["tue", "tues", "tuesday"], ByDay::Tuesday),
            (&["wed", "wednesday"], ByDay::Wednesday),
            (&["thu", "thur", "thurs", "thursday"], ByDay::Thursday),
            (&["fri", "friday"], ByDay::Friday),
            (&["sat", "saturday"], ByDay::Saturday),
            (&["sun", "sunday"], ByDay::Sunday),
        ];
        for (aliases, day) in groups {
            for alias in aliases {
                assert_eq!(normalize_day_tokens(alias), day.name(), "alias {alias}");
                assert_eq!(alias.parse::<ByDay>().unwrap(), day);
            }
        }
    }

    #[test]
    fn test_alias_normalization_respects_word_boundaries() {
        assert_eq!(normalize_day_tokens("Gym on Tues and THU"), "gym on tuesday and thursday");
        assert_eq!(normalize_day_tokens("monsoon"), "monsoon");
    }

    #[test]
    fn test_codes_and_index_round_trip() {
        for d in ByDay::ALL {
            assert_eq!(ByDay::from_code(d.code()), Some(d));
            assert_eq!(ByDay::from_index(d.index()), d);
        }
        assert_eq!(ByDay::Sunday.index(), 0);
        assert_eq!(ByDay::Saturday.index(), 6);
        assert_eq!(serde_json::to_string(&ByDay::Thursday).unwrap(), "\"TH\"");
    }

    #[test]
    fn test_weekday_set_aliases() {
        assert_eq!(parse_weekday_set("weekdays"), Some(ByDay::WORKDAYS.to_vec()));
        assert_eq!(
            parse_weekday_set("gym on the weekend"),
            Some(vec![ByDay::Saturday, ByDay::Sunday])
        );
        assert_eq!(parse_weekday_set("protein daily at 8"), Some(ByDay::ALL.to_vec()));
        assert_eq!(parse_weekday_set("every day"), Some(ByDay::ALL.to_vec()));
    }

    #[test]
    fn test_weekday_set_range_wraps_around() {
        assert_eq!(
            parse_weekday_set("friday to monday"),
            Some(vec![ByDay::Friday, ByDay::Saturday, ByDay::Sunday, ByDay::Monday])
        );
        assert_eq!(
            parse_weekday_set("mon-wed"),
            Some(vec![ByDay::Monday, ByDay::Tuesday, ByDay::Wednesday])
        );
    }

    #[test]
    fn test_weekday_set_explicit_list() {
        assert_eq!(
            parse_weekday_set("monday and wednesday"),
            Some(vec![ByDay::Monday, ByDay::Wednesday])
        );
    }

    #[test]
    fn test_weekday_set_absent() {
        assert_eq!(parse_weekday_set("gym at 6am"), None);
    }

    #[test]
    fn test_next_weekday() {
        assert_eq!(parse_next_weekday("gym next fri at 6"), Some(ByDay::Friday));
        assert_eq!(parse_next_weekday("gym friday"), None);
    }
}
