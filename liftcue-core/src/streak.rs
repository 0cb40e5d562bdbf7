//! Gym streak: consecutive calendar days with a completed gym reminder.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::reminders::Reminder;

/// Local calendar days carrying a completed reminder whose label contains "gym".
pub fn completed_gym_days(items: &[Reminder], tz: Tz) -> BTreeSet<NaiveDate> {
    items
        .iter()
        .filter(|r| r.completed && r.label_contains("gym"))
        .filter_map(|r| r.local_time(tz))
        .map(|t| t.date_naive())
        .collect()
}

/// Length of the run of consecutive completed gym days ending today or yesterday.
///
/// Days are compared as calendar dates, so a DST shift never breaks a run.
pub fn compute_gym_streak(items: &[Reminder], now: &DateTime<Tz>) -> u32 {
    let days = completed_gym_days(items, now.timezone());
    let mut newest_first = days.iter().rev();

    let Some(mut prev) = newest_first.next().copied() else {
        return 0;
    };
    if (now.date_naive() - prev).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    for &day in newest_first {
        if (prev - day).num_days() != 1 {
            break;
        }
        streak += 1;
        prev = day;
    }
    streak
}
