//! Gym follow-up: record whether today's session happened.

use anyhow::Result;
use chrono::DateTime;
use chrono_tz::Tz;

use crate::reminders::Reminder;
use crate::store::ReminderStore;
use crate::streak::compute_gym_streak;
use crate::time::DayWindow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GymFollowUp {
    /// Ids of today's gym reminders that were marked.
    pub changed: Vec<i64>,
    pub streak: u32,
}

/// Set `completed` on every reminder scheduled today whose label contains "gym".
pub fn complete_todays_gym(items: &mut [Reminder], now: &DateTime<Tz>) -> Vec<i64> {
    let today = DayWindow::today(now);
    items
        .iter_mut()
        .filter(|r| r.is_within(&today) && r.label_contains("gym"))
        .map(|r| {
            r.completed = true;
            r.missed = false;
            r.id
        })
        .collect()
}

pub fn mark_todays_gym_done(
    store: &mut dyn ReminderStore,
    now: &DateTime<Tz>,
) -> Result<GymFollowUp> {
    let mut all = store.load()?;
    let changed = complete_todays_gym(&mut all, now);
    let streak = compute_gym_streak(&all, now);
    if !changed.is_empty() {
        store.replace(all)?;
    }
    Ok(GymFollowUp { changed, streak })
}

/// Flag today's gym reminders as missed. A recorded completion is left as is.
pub fn mark_todays_gym_missed(
    store: &mut dyn ReminderStore,
    now: &DateTime<Tz>,
) -> Result<Vec<i64>> {
    let today = DayWindow::today(now);
    let mut all = store.load()?;
    let changed: Vec<i64> = all
        .iter_mut()
        .filter(|r| r.is_within(&today) && r.label_contains("gym"))
        .map(|r| {
            r.missed = true;
            r.id
        })
        .collect();
    if !changed.is_empty() {
        store.replace(all)?;
    }
    Ok(changed)
}
