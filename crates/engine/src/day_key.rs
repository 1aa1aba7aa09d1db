//! Calendar-day keys.
//!
//! Activity records are grouped per calendar day. Server timestamps arrive in
//! several textual shapes (`2025-10-02`, `2025-10-02T08:30:00`,
//! `2025-10-02T08:30:00Z`, ...), so every value goes through
//! [`DayKey::normalize`] before it is compared.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::EngineError;

const KEY_FORMAT: &str = "%Y-%m-%d";
const KEY_LEN: usize = 10;
/// Placeholder the server uses for "no date" (`DateTime.MinValue`).
const NULL_DATE_PREFIX: &str = "0001-01-01";

/// A date stripped of time-of-day and timezone, displayed as `YYYY-MM-DD`.
///
/// # Examples
///
/// ```rust
/// use engine::DayKey;
///
/// let a = DayKey::normalize("2025-10-02T08:30:00Z").unwrap();
/// let b = DayKey::normalize("2025-10-02").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "2025-10-02");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Reads any supported date or timestamp as a calendar day.
    ///
    /// A leading `YYYY-MM-DD` wins and whatever follows it (time, offset) is
    /// ignored. Other values are read as RFC 3339 or RFC 2822 timestamps and
    /// mapped to their UTC day. Returns `None` when nothing matches.
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(prefix) = trimmed.get(..KEY_LEN)
            && has_day_shape(prefix)
        {
            return NaiveDate::parse_from_str(prefix, KEY_FORMAT).ok().map(Self);
        }

        DateTime::parse_from_rfc3339(trimmed)
            .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc).date_naive()))
    }

    /// Today's calendar day in the given timezone.
    #[must_use]
    pub fn today(tz: Tz) -> Self {
        Self(Utc::now().with_timezone(&tz).date_naive())
    }

    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// The following day (saturates at the end of the calendar).
    #[must_use]
    pub fn succ(self) -> Self {
        Self(self.0.checked_add_days(Days::new(1)).unwrap_or(self.0))
    }

    /// The previous day (saturates at the start of the calendar).
    #[must_use]
    pub fn pred(self) -> Self {
        Self(self.0.checked_sub_days(Days::new(1)).unwrap_or(self.0))
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = EngineError;

    /// Strict parser for user input: only `YYYY-MM-DD` is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != KEY_LEN || !has_day_shape(trimmed) {
            return Err(EngineError::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, KEY_FORMAT)
            .map(Self)
            .map_err(|_| EngineError::InvalidDate(s.to_string()))
    }
}

impl From<NaiveDate> for DayKey {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

/// Returns `true` for missing dates and the server's `0001-01-01` sentinel.
#[must_use]
pub fn is_null_date(raw: Option<&str>) -> bool {
    match raw {
        None => true,
        Some(value) => {
            let value = value.trim();
            value.is_empty() || value.starts_with(NULL_DATE_PREFIX)
        }
    }
}

fn has_day_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == KEY_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    #[test]
    fn normalize_strips_time_and_zone() {
        assert_eq!(DayKey::normalize("2025-10-02T08:30:00Z"), Some(key("2025-10-02")));
        assert_eq!(DayKey::normalize("2025-10-02"), Some(key("2025-10-02")));
        assert_eq!(
            DayKey::normalize("2025-10-02T23:59:59.123+07:00"),
            Some(key("2025-10-02"))
        );
        assert_eq!(DayKey::normalize(" 2025-10-02 "), Some(key("2025-10-02")));
    }

    #[test]
    fn normalize_reads_rfc2822_as_utc_day() {
        assert_eq!(
            DayKey::normalize("Thu, 02 Oct 2025 23:30:00 -0200"),
            Some(key("2025-10-03"))
        );
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert_eq!(DayKey::normalize(""), None);
        assert_eq!(DayKey::normalize("   "), None);
        assert_eq!(DayKey::normalize("yesterday"), None);
        assert_eq!(DayKey::normalize("2025-13-40"), None);
        assert_eq!(DayKey::normalize("2025/10/02"), None);
    }

    #[test]
    fn from_str_is_strict() {
        assert!("2025-10-02".parse::<DayKey>().is_ok());
        assert!("2025-10-02T00:00:00Z".parse::<DayKey>().is_err());
        assert!("2025-02-30".parse::<DayKey>().is_err());
    }

    #[test]
    fn succ_and_pred_cross_month_boundaries() {
        assert_eq!(key("2025-01-31").succ(), key("2025-02-01"));
        assert_eq!(key("2025-03-01").pred(), key("2025-02-28"));
    }

    #[test]
    fn null_dates() {
        assert!(is_null_date(None));
        assert!(is_null_date(Some("")));
        assert!(is_null_date(Some("0001-01-01T00:00:00")));
        assert!(!is_null_date(Some("1990-05-04")));
    }
}
