//! Cancel: drop today's reminders whose label contains a fragment.

use anyhow::Result;
use tracing::debug;

use crate::dispatch::{CommandContext, CommandOutcome, Effect, Intent};
use crate::error::{CommandError, TargetScope};
use crate::reminders::Reminder;
use crate::time::DayWindow;

pub fn cancel_today_by_label(ctx: &mut CommandContext<'_>, label: &str) -> Result<CommandOutcome> {
    let today = DayWindow::today(&ctx.now);
    let (removed, remaining): (Vec<Reminder>, Vec<Reminder>) = ctx
        .store
        .load()?
        .into_iter()
        .partition(|r| r.is_within(&today) && r.label_contains(label));

    if removed.is_empty() {
        return Ok(CommandOutcome::rejected(
            Intent::CancelToday,
            CommandError::NoTargetFound {
                label: label.to_string(),
                scope: TargetScope::Today,
            },
        ));
    }

    debug!(label, count = removed.len(), "canceling today's reminders");
    ctx.store.replace(remaining)?;
    let ids = removed.iter().map(|r| r.id).collect();
    Ok(CommandOutcome::say(
        Intent::CancelToday,
        format!("Canceled {} {label} for today.", removed.len()),
    )
    .with_removed(ids)
    .with_effect(Effect::Refresh))
}

pub fn gym_today(ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
    cancel_today_by_label(ctx, "gym")
}

pub fn protein_today(ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
    cancel_today_by_label(ctx, "protein")
}

/// Any other cancel verb. Reports instead of guessing a target.
pub fn unsupported(_ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
    Ok(CommandOutcome::say(
        Intent::CancelUnsupported,
        "Cancel command isn't fully built yet! Try: “cancel gym today”.",
    ))
}

#[cfg(test)]
mod tests {
    use crate::dispatch::Interpreter;
    use crate::error::{CommandError, TargetScope};
    use crate::reminders::{Reminder, ReminderKind};
    use crate::store::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};
    use chrono_tz::America::Chicago;
    use chrono_tz::Tz;

    fn now() -> DateTime<Tz> {
        Chicago.with_ymd_and_hms(2026, 2, 16, 9, 0, 0).unwrap()
    }

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Chicago
            .with_ymd_and_hms(2026, 2, d, h, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_cancel_removes_only_todays_matches() {
        let mut store = MemoryStore::with_items(vec![
            Reminder::new(1, "Gym", ReminderKind::Gym, at(16, 18)),
            Reminder::new(2, "Protein", ReminderKind::Supplement, at(16, 19)),
            Reminder::new(3, "Gym", ReminderKind::Gym, at(17, 18)),
            // Late evening local time is still today.
            Reminder::new(4, "Leg day at the gym", ReminderKind::Workout, at(16, 23)),
        ]);
        let out = Interpreter::default()
            .process("cancel gym today", &mut store, now())
            .unwrap();
        assert_eq!(out.message, "Canceled 2 gym for today.");
        assert_eq!(out.removed, vec![1, 4]);
        let left: Vec<i64> = store.items().iter().map(|r| r.id).collect();
        assert_eq!(left, vec![2, 3]);
    }

    #[test]
    fn test_cancel_protein_with_nothing_today() {
        let mut store = MemoryStore::with_items(vec![Reminder::new(
            1,
            "Protein",
            ReminderKind::Supplement,
            at(17, 8),
        )]);
        let out = Interpreter::default()
            .process("cancel protein today", &mut store, now())
            .unwrap();
        assert_eq!(out.message, "No protein found for today.");
        assert_eq!(
            out.error,
            Some(CommandError::NoTargetFound {
                label: "protein".to_string(),
                scope: TargetScope::Today,
            })
        );
        assert_eq!(store.items().len(), 1);
    }
}
