//! Reminder record + serialization shape.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::time::DayWindow;
use crate::weekday::ByDay;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Gym,
    Supplement,
    Workout,
    #[default]
    Generic,
}

/// Present only on weekday-recurring sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceMeta {
    pub byday: ByDay,
    /// Informational, never parsed back.
    pub rrule: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub label: String,

    #[serde(rename = "type", default)]
    pub kind: ReminderKind,

    /// `None` when the stored value could not be read; such records never
    /// match a time-scoped filter.
    #[serde(default, with = "lenient_instant")]
    pub time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default)]
    pub completed: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub missed: bool,

    /// Lowercase, duplicate-free workout tags (recurring gym sessions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workouts: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RecurrenceMeta>,
}

impl Reminder {
    pub fn new(id: i64, label: impl Into<String>, kind: ReminderKind, time: DateTime<Utc>) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            time: Some(time),
            details: None,
            completed: false,
            missed: false,
            workouts: None,
            meta: None,
        }
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_meta(mut self, meta: RecurrenceMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn local_time(&self, tz: Tz) -> Option<DateTime<Tz>> {
        self.time.map(|t| t.with_timezone(&tz))
    }

    pub fn is_within(&self, window: &DayWindow) -> bool {
        self.time.is_some_and(|t| window.contains(t))
    }

    /// Case-insensitive substring match on the label.
    pub fn label_contains(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(&needle.to_lowercase())
    }

    pub fn is_recurring_on(&self, label: &str, byday: ByDay) -> bool {
        self.label == label && self.meta.as_ref().is_some_and(|m| m.byday == byday)
    }

    /// Workout tags, falling back to the comma-separated `details` text.
    pub fn workout_tags(&self) -> Vec<String> {
        match &self.workouts {
            Some(tags) => tags.clone(),
            None => tags_from_details(self.details.as_deref()),
        }
    }

    /// Store tags and mirror them into `details`.
    pub fn set_workout_tags(&mut self, tags: Vec<String>) {
        self.details = if tags.is_empty() { None } else { Some(tags.join(", ")) };
        self.workouts = Some(tags);
    }
}

fn tags_from_details(details: Option<&str>) -> Vec<String> {
    details
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Union of `base` and `extra`, lowercased, first occurrence wins.
pub fn merge_unique(base: &[String], extra: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(base.len() + extra.len());
    for tag in base.iter().chain(extra) {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Id for a reminder created at `now`; `offset` separates a batch created in
/// the same instant. Bumps past any id already taken.
pub fn allocate_id(items: &[Reminder], now: DateTime<Utc>, offset: i64) -> i64 {
    let mut id = now.timestamp_millis() + offset;
    while items.iter().any(|r| r.id == id) {
        id += 1;
    }
    id
}

/// Same label with a time inside `window` of `at`.
pub fn is_duplicate(items: &[Reminder], label: &str, at: DateTime<Utc>, window: Duration) -> bool {
    items.iter().any(|r| {
        r.label == label && r.time.is_some_and(|t| (t - at).abs() < window)
    })
}

mod lenient_instant {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Millis(i64),
        Other(serde::de::IgnoredAny),
    }

    pub fn serialize<S: Serializer>(v: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(t) => s.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<Raw>::deserialize(d)?;
        Ok(match raw {
            Some(Raw::Text(s)) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            Some(Raw::Millis(ms)) => DateTime::from_timestamp_millis(ms),
            Some(Raw::Other(_)) | None => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 19, h, m, s).unwrap()
    }

    #[test]
    fn test_serialized_shape() {
        let r = Reminder::new(1, "Gym", ReminderKind::Gym, at(6, 0, 0)).with_meta(RecurrenceMeta {
            byday: ByDay::Thursday,
            rrule: "FREQ=WEEKLY;BYDAY=TH;BYHOUR=6;BYMINUTE=0".to_string(),
        });
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["type"], "gym");
        assert_eq!(v["time"], "2026-02-19T06:00:00.000Z");
        assert_eq!(v["meta"]["byday"], "TH");
        assert_eq!(v["completed"], false);
        assert!(v.get("details").is_none());
        assert!(v.get("missed").is_none());
    }

    #[test]
    fn test_malformed_time_loads_as_unknown() {
        let json = r#"[
            {"id": 1, "label": "Gym", "type": "gym", "time": "Invalid Date", "completed": false},
            {"id": 2, "label": "Protein", "time": 1771480800000}
        ]"#;
        let items: Vec<Reminder> = serde_json::from_str(json).unwrap();
        assert_eq!(items[0].time, None);
        assert_eq!(items[1].kind, ReminderKind::Generic);
        assert_eq!(items[1].time, DateTime::from_timestamp_millis(1_771_480_800_000));

        let window = DayWindow {
            start: at(0, 0, 0),
            end: at(23, 59, 59),
        };
        assert!(!items[0].is_within(&window));
    }

    #[test]
    fn test_duplicate_window_is_strict() {
        let items = vec![Reminder::new(1, "Gym", ReminderKind::Gym, at(6, 0, 0))];
        let w = Duration::seconds(60);
        assert!(is_duplicate(&items, "Gym", at(6, 0, 59), w));
        assert!(!is_duplicate(&items, "Gym", at(6, 1, 0), w));
        assert!(!is_duplicate(&items, "gym", at(6, 0, 0), w));
    }

    #[test]
    fn test_workout_tags_fall_back_to_details() {
        let r = Reminder::new(1, "Gym", ReminderKind::Gym, at(6, 0, 0))
            .with_details(Some("Legs, Core ,".to_string()));
        assert_eq!(r.workout_tags(), vec!["legs", "core"]);
    }

    #[test]
    fn test_merge_unique_is_case_insensitive() {
        let merged = merge_unique(
            &["legs".to_string()],
            &["LEGS".to_string(), "Chest".to_string()],
        );
        assert_eq!(merged, vec!["legs", "chest"]);
    }

    #[test]
    fn test_allocate_id_skips_taken() {
        let now = at(6, 0, 0);
        let items = vec![Reminder::new(now.timestamp_millis(), "Gym", ReminderKind::Gym, now)];
        assert_eq!(allocate_id(&items, now, 0), now.timestamp_millis() + 1);
        assert_eq!(allocate_id(&items, now, 5), now.timestamp_millis() + 5);
    }
}
