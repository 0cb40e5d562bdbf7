//! liftcue-core: command interpreter and recurrence engine for gym and
//! supplement reminders.

pub mod clock;
pub mod commands;
pub mod dates;
pub mod dispatch;
pub mod error;
pub mod followup;
pub mod intent;
pub mod recurrence;
pub mod reminders;
pub mod store;
pub mod streak;
pub mod time;
pub mod weekday;

pub use clock::{extract_time_token, parse_time_of_day};
pub use dates::{next_occurrence, parse_iso_date, resolve_date};
pub use dispatch::{
    matching_rule, CommandOutcome, Effect, Intent, Interpreter, InterpreterConfig, Page,
};
pub use error::{CommandError, TargetScope};
pub use followup::{mark_todays_gym_done, mark_todays_gym_missed, GymFollowUp};
pub use intent::{normalize_title_intent, TitleIntent};
pub use recurrence::{
    add_workouts_to_day, change_time_for_day, remove_gym_day, remove_workouts_from_day,
    replace_workouts_for_day, skip_gym_once, upsert_gym_sessions, DaySelection, SkipDay, GYM_LABEL,
};
pub use reminders::{RecurrenceMeta, Reminder, ReminderKind};
pub use store::{
    clear_all, delete_reminder, toggle_complete, update_reminder, MemoryStore, ReminderStore,
};
pub use streak::compute_gym_streak;
pub use time::{parse_timezone, DayWindow};
pub use weekday::{parse_next_weekday, parse_weekday_set, ByDay};
