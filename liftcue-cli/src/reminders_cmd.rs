use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use liftcue_core::time::{parse_local_datetime_to_utc, start_of_today};
use liftcue_core::{
    clear_all, compute_gym_streak, delete_reminder, toggle_complete, update_reminder,
    CommandOutcome, Effect, Interpreter, Reminder, ReminderStore,
};
use tracing::debug;

use crate::config::{load_config, Config};
use crate::state::{read_profile, write_profile, JsonFileStore};

/// Config, timezone and store for one CLI invocation.
pub struct Session {
    pub cfg: Config,
    pub tz: Tz,
    pub store: JsonFileStore,
}

impl Session {
    pub fn open() -> Result<Self> {
        let cfg = load_config()?;
        let tz = cfg.timezone()?;
        let store = JsonFileStore::open_default()?;
        debug!(path = %store.path().display(), %tz, "session opened");
        Ok(Self { cfg, tz, store })
    }

    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }
}

pub fn format_reminder(r: &Reminder, tz: Tz) -> String {
    let when = r
        .local_time(tz)
        .map(|t| t.format("%a %Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "(no valid time)".to_string());
    let mark = if r.completed {
        "x"
    } else if r.missed {
        "!"
    } else {
        " "
    };
    let mut line = format!("{:>14}  [{mark}] {when}  {}", r.id, r.label);
    if let Some(day) = r.meta.as_ref().map(|m| m.byday) {
        line.push_str(&format!("  (weekly {day})"));
    }
    if let Some(details) = r.details.as_deref() {
        line.push_str(&format!("  - {details}"));
    }
    line
}

fn print_outcome(outcome: &CommandOutcome, items: &[Reminder], tz: Tz) {
    println!("{}", outcome.message);
    for id in outcome.highlighted() {
        if let Some(r) = items.iter().find(|r| r.id == id) {
            println!("{}", format_reminder(r, tz));
        }
    }
}

fn apply_effects(outcome: &CommandOutcome) -> Result<()> {
    for effect in &outcome.effects {
        match effect {
            Effect::SetNotificationsMuted(muted) => {
                let mut profile = read_profile()?;
                profile.notifications_muted = *muted;
                write_profile(&profile)?;
            }
            Effect::Navigate(page) => println!("-> {}", page.id()),
            Effect::Refresh => {}
        }
    }
    Ok(())
}

pub fn say(words: &[String]) -> Result<()> {
    let text = words.join(" ");
    if text.trim().is_empty() {
        bail!("nothing to say (try: liftcue say remind me to take creatine at 8pm)");
    }
    let mut s = Session::open()?;
    let now = s.now();
    let interpreter = Interpreter::new(s.cfg.interpreter_config());
    let outcome = interpreter.process(&text, &mut s.store, now)?;
    apply_effects(&outcome)?;
    print_outcome(&outcome, &s.store.load()?, s.tz);
    Ok(())
}

pub fn list(all: bool) -> Result<()> {
    let s = Session::open()?;
    let start = start_of_today(&s.now());
    let mut items: Vec<Reminder> = s
        .store
        .load()?
        .into_iter()
        .filter(|r| all || r.time.is_some_and(|t| t >= start))
        .collect();
    items.sort_by_key(|r| r.time);

    if items.is_empty() {
        println!("No reminders.");
        return Ok(());
    }
    for r in &items {
        println!("{}", format_reminder(r, s.tz));
    }
    Ok(())
}

pub fn streak() -> Result<()> {
    let s = Session::open()?;
    let n = compute_gym_streak(&s.store.load()?, &s.now());
    println!("Gym streak: {n} day(s)");
    Ok(())
}

pub fn toggle(id: i64) -> Result<()> {
    let mut s = Session::open()?;
    match toggle_complete(&mut s.store, id)? {
        Some(true) => println!("Marked {id} done."),
        Some(false) => println!("Marked {id} not done."),
        None => bail!("no reminder with id {id}"),
    }
    Ok(())
}

pub fn edit(id: i64, label: Option<String>, at: Option<String>) -> Result<()> {
    if label.is_none() && at.is_none() {
        bail!("nothing to edit (pass --label and/or --at)");
    }
    let mut s = Session::open()?;
    let time = at
        .as_deref()
        .map(|a| parse_local_datetime_to_utc(a, s.tz))
        .transpose()
        .context("--at expects \"YYYY-MM-DD HH:MM\"")?;
    let Some(updated) = update_reminder(&mut s.store, id, label.as_deref(), time)? else {
        bail!("no reminder with id {id}");
    };
    println!("{}", format_reminder(&updated, s.tz));
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let mut s = Session::open()?;
    if !delete_reminder(&mut s.store, id)? {
        bail!("no reminder with id {id}");
    }
    println!("Deleted {id}.");
    Ok(())
}

pub fn clear() -> Result<()> {
    let mut s = Session::open()?;
    let n = clear_all(&mut s.store)?;
    println!("Cleared {n} reminder(s).");
    Ok(())
}
