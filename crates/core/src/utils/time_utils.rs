use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use log::warn;

use crate::constants::TRADE_DATE_FORMAT;
use crate::errors::{Result, ValidationError};

/// Default timezone for calendar dates (snapshot keys, simple imports).
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Taipei;

/// Resolves an IANA timezone name, falling back to [`DEFAULT_TIMEZONE`].
pub fn resolve_timezone(name: Option<&str>) -> Tz {
    match name.map(str::trim).filter(|s| !s.is_empty()) {
        None => DEFAULT_TIMEZONE,
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "Unknown timezone '{}', falling back to {}",
                name, DEFAULT_TIMEZONE
            );
            DEFAULT_TIMEZONE
        }),
    }
}

/// Converts a UTC instant to a calendar date in the given timezone.
pub fn date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's calendar date in the given timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    date_from_utc(Utc::now(), tz)
}

/// Current wall-clock time in the given timezone, without offset.
pub fn now_in(tz: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&tz).naive_local()
}

pub fn format_trade_date(dt: &NaiveDateTime) -> String {
    dt.format(TRADE_DATE_FORMAT).to_string()
}

/// Parses a trade date leniently.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` and
/// `YYYY-MM-DD, HH:MM:SS` (IBKR). Fractional seconds are tolerated. A bare date
/// resolves to midnight.
pub fn parse_trade_date(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d, %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    let trimmed = value.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }

    Err(ValidationError::InvalidInput(format!(
        "Invalid trade date '{}'. Expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS",
        value
    ))
    .into())
}

/// Parses a calendar date, accepting a trailing time component.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate> {
    parse_trade_date(value).map(|dt| dt.date())
}

/// Serde adapter writing `YYYY-MM-DD HH:MM:SS` and reading any format
/// [`parse_trade_date`] accepts.
pub mod naive_datetime_format {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use crate::constants::TRADE_DATE_FORMAT;

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(TRADE_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_trade_date(&s).map_err(serde::de::Error::custom)
    }
}
