//! Read-mostly commands: gym check-in, streak, today's tasks, supplements.

use anyhow::Result;

use crate::dispatch::{CommandContext, CommandOutcome, Effect, Intent};
use crate::followup::complete_todays_gym;
use crate::intent::is_supplement_label;
use crate::reminders::{Reminder, ReminderKind};
use crate::streak::compute_gym_streak;
use crate::time::DayWindow;

fn todays(items: Vec<Reminder>, ctx: &CommandContext<'_>) -> Vec<Reminder> {
    let window = DayWindow::today(&ctx.now);
    items.into_iter().filter(|r| r.is_within(&window)).collect()
}

pub fn gym_check_in(ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
    let mut all = ctx.store.load()?;
    let changed = complete_todays_gym(&mut all, &ctx.now);
    if changed.is_empty() {
        return Ok(CommandOutcome::say(
            Intent::GymCheckIn,
            "I didn't find a gym reminder for today.",
        ));
    }
    ctx.store.replace(all)?;
    Ok(CommandOutcome::say(Intent::GymCheckIn, "Nice! Gym marked as done 🔥")
        .with_changed(changed)
        .with_effect(Effect::Refresh))
}

pub fn streak(ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
    let all = ctx.store.load()?;
    let message = match compute_gym_streak(&all, &ctx.now) {
        0 => "You're at 0 today. Let's start!".to_string(),
        n => format!("You're on a {n}-day streak 🔥"),
    };
    Ok(CommandOutcome::say(Intent::StreakQuery, message))
}

pub fn today(ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
    let items = todays(ctx.store.load()?, ctx);
    if items.is_empty() {
        return Ok(CommandOutcome::say(Intent::TodayQuery, "No reminders for today."));
    }
    let limit = ctx.config.today_preview_limit;
    let names: Vec<&str> = items.iter().take(limit).map(|r| r.label.as_str()).collect();
    let more = if items.len() > limit { "…" } else { "" };
    Ok(CommandOutcome::say(
        Intent::TodayQuery,
        format!("Today: {}{more}", names.join(", ")),
    ))
}

pub fn supplements(ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
    let sups: Vec<Reminder> = todays(ctx.store.load()?, ctx)
        .into_iter()
        .filter(|r| r.kind == ReminderKind::Supplement || is_supplement_label(&r.label))
        .collect();

    let message = if sups.is_empty() {
        "No supplements scheduled today.".to_string()
    } else {
        match sups.iter().filter(|r| !r.completed).count() {
            0 => "All supplements done ✅".to_string(),
            left => format!("You still have {left} supplement(s) to do."),
        }
    };
    Ok(CommandOutcome::say(Intent::SupplementQuery, message))
}

#[cfg(test)]
mod tests {
    use crate::dispatch::{Effect, Interpreter, InterpreterConfig};
    use crate::reminders::{Reminder, ReminderKind};
    use crate::store::MemoryStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use chrono_tz::America::Chicago;
    use chrono_tz::Tz;

    fn now() -> DateTime<Tz> {
        Chicago.with_ymd_and_hms(2026, 2, 16, 12, 0, 0).unwrap()
    }

    fn today_at(h: u32) -> DateTime<Utc> {
        Chicago
            .with_ymd_and_hms(2026, 2, 16, h, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn ask(store: &mut MemoryStore, text: &str) -> String {
        Interpreter::default().process(text, store, now()).unwrap().message
    }

    #[test]
    fn test_check_in_marks_todays_gym() {
        let mut store = MemoryStore::with_items(vec![
            Reminder::new(1, "Gym", ReminderKind::Gym, today_at(6)),
            Reminder::new(2, "Gym", ReminderKind::Gym, today_at(6) + Duration::days(1)),
        ]);
        let out = Interpreter::default()
            .process("I did gym today", &mut store, now())
            .unwrap();
        assert_eq!(out.message, "Nice! Gym marked as done 🔥");
        assert_eq!(out.changed, vec![1]);
        assert_eq!(out.effects, vec![Effect::Refresh]);
        assert!(store.items()[0].completed);
        assert!(!store.items()[1].completed);

        assert_eq!(ask(&mut store, "what is my streak"), "You're on a 1-day streak 🔥");
    }

    #[test]
    fn test_check_in_without_gym() {
        let mut store = MemoryStore::new();
        assert_eq!(ask(&mut store, "mark gym done"), "I didn't find a gym reminder for today.");
        assert_eq!(ask(&mut store, "whats my streak"), "You're at 0 today. Let's start!");
    }

    #[test]
    fn test_today_preview_elides() {
        let mut store = MemoryStore::with_items(
            ["Gym", "Protein", "Creatine", "Stretch"]
                .iter()
                .enumerate()
                .map(|(i, l)| {
                    Reminder::new(i as i64, *l, ReminderKind::Generic, today_at(8 + i as u32))
                })
                .collect(),
        );
        assert_eq!(ask(&mut store, "what do i have today"), "Today: Gym, Protein, Creatine…");

        let interp = Interpreter::new(InterpreterConfig {
            today_preview_limit: 4,
            ..InterpreterConfig::default()
        });
        let out = interp.process("what are todays tasks", &mut store, now()).unwrap();
        assert_eq!(out.message, "Today: Gym, Protein, Creatine, Stretch");

        let mut empty = MemoryStore::new();
        assert_eq!(ask(&mut empty, "what are today's tasks"), "No reminders for today.");
    }

    #[test]
    fn test_supplement_progress() {
        let mut store = MemoryStore::with_items(vec![
            Reminder::new(1, "Protein", ReminderKind::Supplement, today_at(8)).with_completed(true),
            // Label match counts even without the supplement type.
            Reminder::new(2, "Creatine shake", ReminderKind::Generic, today_at(9)),
            Reminder::new(3, "Gym", ReminderKind::Gym, today_at(10)),
        ]);
        assert_eq!(
            ask(&mut store, "did i take my supplements"),
            "You still have 1 supplement(s) to do."
        );

        let mut all = store.items().to_vec();
        all[1].completed = true;
        let mut store = MemoryStore::with_items(all);
        assert_eq!(ask(&mut store, "did i take supplements"), "All supplements done ✅");

        let mut empty = MemoryStore::new();
        assert_eq!(ask(&mut empty, "did i take supplements"), "No supplements scheduled today.");
    }
}
