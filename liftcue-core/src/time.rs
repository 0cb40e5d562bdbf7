//! Time utilities: timezone parsing, wall-clock localization, day bounds.

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Pin a wall-clock datetime to `tz`.
///
/// Ambiguous (DST fold) times take the earlier instant; times inside a DST gap
/// move forward one hour.
pub fn localize(tz: Tz, ndt: NaiveDateTime) -> DateTime<Tz> {
    if let Some(dt) = tz.from_local_datetime(&ndt).earliest() {
        return dt;
    }
    tz.from_local_datetime(&(ndt + Duration::hours(1)))
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&ndt))
}

/// `date` at `time` in `tz`, seconds and sub-seconds dropped.
pub fn at_time(tz: Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
    localize(tz, date.and_time(time))
}

/// Parse a local "YYYY-MM-DD HH:MM" in `tz`, returning UTC.
pub fn parse_local_datetime_to_utc(local: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let ndt = NaiveDateTime::parse_from_str(local.trim(), "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;
    Ok(localize(tz, ndt).with_timezone(&Utc))
}

/// A single local calendar day, inclusive on both ends (00:00 .. 23:59:59.999).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    pub fn for_date(tz: Tz, date: NaiveDate) -> Self {
        let start = localize(tz, date.and_time(NaiveTime::MIN));
        let next = localize(tz, (date + Duration::days(1)).and_time(NaiveTime::MIN));
        Self {
            start: start.with_timezone(&Utc),
            end: next.with_timezone(&Utc) - Duration::milliseconds(1),
        }
    }

    pub fn today(now: &DateTime<Tz>) -> Self {
        Self::for_date(now.timezone(), now.date_naive())
    }

    pub fn tomorrow(now: &DateTime<Tz>) -> Self {
        Self::for_date(now.timezone(), now.date_naive() + Duration::days(1))
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t <= self.end
    }
}

/// Start of the local day containing `now`, as UTC.
pub fn start_of_today(now: &DateTime<Tz>) -> DateTime<Utc> {
    DayWindow::today(now).start
}
