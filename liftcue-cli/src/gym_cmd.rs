use anyhow::{bail, Result};
use chrono::NaiveTime;
use clap::{Subcommand, ValueEnum};
use liftcue_core::{
    add_workouts_to_day, change_time_for_day, mark_todays_gym_done, mark_todays_gym_missed,
    parse_time_of_day, remove_gym_day, remove_workouts_from_day, replace_workouts_for_day,
    skip_gym_once, upsert_gym_sessions, ByDay, DaySelection, Reminder, SkipDay, GYM_LABEL,
};

use crate::reminders_cmd::{format_reminder, Session};

#[derive(Subcommand, Debug)]
pub enum GymCommand {
    /// Create or move weekly gym sessions
    Set {
        /// DAILY, codes like MO,WE,FR, or a phrase like "mon-fri"
        #[arg(long)]
        days: String,

        /// Time of day (6pm, 18:00, noon)
        #[arg(long)]
        at: String,

        /// Workout tags to merge in (comma separated)
        #[arg(long, value_delimiter = ',')]
        workouts: Vec<String>,
    },

    /// Change the time of one weekday's session
    Time {
        day: String,
        at: String,

        #[arg(long, default_value = GYM_LABEL)]
        label: String,
    },

    /// Edit the workout tags of one weekday's session
    Workouts {
        day: String,

        #[arg(value_enum)]
        mode: TagEdit,

        /// Tags (comma separated)
        #[arg(value_delimiter = ',')]
        tags: Vec<String>,

        #[arg(long, default_value = GYM_LABEL)]
        label: String,
    },

    /// Remove the weekly session for a day
    RemoveDay { day: String },

    /// Mark only the next session (today, or tomorrow with --tomorrow) as done
    Skip {
        #[arg(long, default_value_t = false)]
        tomorrow: bool,
    },

    /// Mark today's gym reminders done and show the streak
    Done,

    /// Flag today's gym reminders as missed
    Missed,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagEdit {
    Add,
    Remove,
    Replace,
}

fn parse_day(day: &str) -> Result<ByDay> {
    day.parse()
}

fn parse_at(at: &str) -> Result<NaiveTime> {
    Ok(parse_time_of_day(at)?)
}

fn print_sessions(verb: &str, items: &[Reminder], s: &Session) {
    println!("{verb} {} session(s).", items.len());
    for r in items {
        println!("{}", format_reminder(r, s.tz));
    }
}

pub fn run(cmd: GymCommand) -> Result<()> {
    let mut s = Session::open()?;
    let now = s.now();

    match cmd {
        GymCommand::Set { days, at, workouts } => {
            let Some(selection) = DaySelection::parse(&days) else {
                bail!("couldn't read days: {days}");
            };
            let at = parse_at(&at)?;
            let out = upsert_gym_sessions(&mut s.store, &selection, at, &workouts, &now)?;
            print_sessions("Scheduled", &out, &s);
        }
        GymCommand::Time { day, at, label } => {
            let (day, at) = (parse_day(&day)?, parse_at(&at)?);
            let out = change_time_for_day(&mut s.store, &label, day, at, &now)?;
            print_sessions("Moved", &out, &s);
        }
        GymCommand::Workouts {
            day,
            mode,
            tags,
            label,
        } => {
            let day = parse_day(&day)?;
            let out = match mode {
                TagEdit::Add => add_workouts_to_day(&mut s.store, &label, day, &tags)?,
                TagEdit::Remove => remove_workouts_from_day(&mut s.store, &label, day, &tags)?,
                TagEdit::Replace => replace_workouts_for_day(&mut s.store, &label, day, &tags)?,
            };
            print_sessions("Updated", &out, &s);
        }
        GymCommand::RemoveDay { day } => {
            let out = remove_gym_day(&mut s.store, parse_day(&day)?)?;
            print_sessions("Removed", &out, &s);
        }
        GymCommand::Skip { tomorrow } => {
            let when = if tomorrow { SkipDay::Tomorrow } else { SkipDay::Today };
            let out = skip_gym_once(&mut s.store, when, &now)?;
            print_sessions("Skipped", &out, &s);
        }
        GymCommand::Done => {
            let out = mark_todays_gym_done(&mut s.store, &now)?;
            if out.changed.is_empty() {
                println!("I didn't find a gym reminder for today.");
            } else {
                println!("Nice! Gym marked as done. Streak: {} day(s)", out.streak);
            }
        }
        GymCommand::Missed => {
            let changed = mark_todays_gym_missed(&mut s.store, &now)?;
            println!("Marked {} gym reminder(s) missed.", changed.len());
        }
    }
    Ok(())
}
