//! Time-of-day extraction and parsing.
//!
//! Extraction picks a candidate token out of a whole utterance; parsing turns a
//! token into a `NaiveTime`. A failed parse means "no usable time", never a
//! fatal error.

use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CommandError;

static H24_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?\d|2[0-3])(?::([0-5]\d))?$").expect("24h pattern"));
static H12_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})(?::([0-5]\d))?\s*(am|pm)$").expect("12h pattern"));
static BARE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}$").expect("bare hour pattern"));

// Extraction patterns, highest priority first.
static X_HM_MERIDIEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2}:\d{2}\s*(am|pm))\b").expect("h:mm am/pm pattern"));
static X_H_MERIDIEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2}\s*(am|pm))\b").expect("h am/pm pattern"));
static X_HM_24: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").expect("h:mm pattern"));
static X_NOON: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bnoon\b").expect("noon pattern"));
static X_MIDNIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bmidnight\b").expect("midnight pattern"));
static X_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})\b").expect("bare number pattern"));

/// Parse an isolated time token.
///
/// Accepts, in order: "noon", "midnight", 24-hour `H[:MM]`, 12-hour
/// `H[:MM] am|pm`, and a bare hour 0-23.
pub fn parse_time_of_day(token: &str) -> Result<NaiveTime, CommandError> {
    let s = token.trim().to_lowercase();
    let invalid = || CommandError::InvalidTime(token.trim().to_string());

    match s.as_str() {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0).ok_or_else(invalid),
        "midnight" => return Ok(NaiveTime::MIN),
        _ => {}
    }

    if let Some(caps) = H24_RE.captures(&s) {
        let h: u32 = caps[1].parse().map_err(|_| invalid())?;
        let m: u32 = match caps.get(2) {
            Some(mm) => mm.as_str().parse().map_err(|_| invalid())?,
            None => 0,
        };
        return NaiveTime::from_hms_opt(h, m, 0).ok_or_else(invalid);
    }

    if let Some(caps) = H12_RE.captures(&s) {
        let mut h: u32 = caps[1].parse().map_err(|_| invalid())?;
        let m: u32 = match caps.get(2) {
            Some(mm) => mm.as_str().parse().map_err(|_| invalid())?,
            None => 0,
        };
        match &caps[3] {
            "pm" if h < 12 => h += 12,
            "am" if h == 12 => h = 0,
            _ => {}
        }
        return NaiveTime::from_hms_opt(h, m, 0).ok_or_else(invalid);
    }

    if BARE_RE.is_match(&s) {
        let h: u32 = s.parse().map_err(|_| invalid())?;
        return NaiveTime::from_hms_opt(h, 0, 0).ok_or_else(invalid);
    }

    Err(invalid())
}

/// Find the time expression in a whole utterance.
///
/// Priority, not position, decides: `H:MM am/pm` > `H am/pm` > `H:MM` >
/// noon > midnight > a bare 1-2 digit number. The bare-number fallback will
/// read any lone number as an hour when nothing better is present.
pub fn extract_time_token(text: &str) -> Option<String> {
    let lower = text.to_lowercase();

    if let Some(caps) = X_HM_MERIDIEM
        .captures(&lower)
        .or_else(|| X_H_MERIDIEM.captures(&lower))
    {
        return Some(caps[1].to_string());
    }
    if let Some(m) = X_HM_24.find(&lower) {
        return Some(m.as_str().to_string());
    }
    if X_NOON.is_match(&lower) {
        return Some("noon".to_string());
    }
    if X_MIDNIGHT.is_match(&lower) {
        return Some("midnight".to_string());
    }
    X_BARE.captures(&lower).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_words() {
        assert_eq!(parse_time_of_day("noon").unwrap(), hm(12, 0));
        assert_eq!(parse_time_of_day("Midnight").unwrap(), hm(0, 0));
    }

    #[test]
    fn test_parse_24h() {
        assert_eq!(parse_time_of_day("14:30").unwrap(), hm(14, 30));
        assert_eq!(parse_time_of_day("7").unwrap(), hm(7, 0));
        assert_eq!(parse_time_of_day("23").unwrap(), hm(23, 0));
    }

    #[test]
    fn test_parse_12h() {
        assert_eq!(parse_time_of_day("8pm").unwrap(), hm(20, 0));
        assert_eq!(parse_time_of_day("6:15 am").unwrap(), hm(6, 15));
        assert_eq!(parse_time_of_day("12am").unwrap(), hm(0, 0));
        assert_eq!(parse_time_of_day("12pm").unwrap(), hm(12, 0));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert_eq!(
            parse_time_of_day("25"),
            Err(CommandError::InvalidTime("25".to_string()))
        );
        assert!(parse_time_of_day("25pm").is_err());
        assert!(parse_time_of_day("soon").is_err());
    }

    #[test]
    fn test_extract_prefers_meridiem_over_position() {
        assert_eq!(extract_time_token("3 sets then gym at 6pm").as_deref(), Some("6pm"));
        assert_eq!(extract_time_token("gym 7:30 or 8:15 pm").as_deref(), Some("8:15 pm"));
    }

    #[test]
    fn test_extract_order_of_fallbacks() {
        assert_eq!(extract_time_token("call mom at 17:45").as_deref(), Some("17:45"));
        assert_eq!(extract_time_token("lunch at noon").as_deref(), Some("noon"));
        assert_eq!(extract_time_token("sleep at midnight").as_deref(), Some("midnight"));
        assert_eq!(extract_time_token("gym at 6").as_deref(), Some("6"));
        assert_eq!(extract_time_token("buy milk"), None);
    }

    #[test]
    fn test_extract_bare_number_heuristic() {
        // A quantity is read as an hour when nothing better is present.
        assert_eq!(extract_time_token("protein for 3 scoops").as_deref(), Some("3"));
    }
}
