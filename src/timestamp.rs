//! Timestamp validation and normalization.
//!
//! Every written record carries its timestamp as whole epoch seconds in plain decimal.
//! [`normalize`] accepts the input kinds callers actually have at hand (a date-time,
//! an integer, or digit text), converts them to seconds and checks them against the
//! window the format is used for: recent log ingestion, so nothing from the future and
//! nothing from before the year 2000.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use qsck::{timestamp, QsOptions, Timestamp};
//!
//! let options = QsOptions::new();
//! let dt = Utc.with_ymd_and_hms(2019, 3, 23, 1, 2, 3).unwrap();
//! for ts in [Timestamp::from(dt), Timestamp::from("1553302923"), Timestamp::from(1553302923)] {
//!     assert_eq!(timestamp::normalize(&ts, &options).unwrap(), "1553302923");
//! }
//! ```

use crate::error::Bound;
use crate::{Error, QsOptions, Result};
use chrono::{DateTime, TimeZone};
use std::borrow::Cow;

/// A timestamp as supplied by the caller, before validation.
#[derive(Clone, Debug, PartialEq)]
pub enum Timestamp {
    /// Whole seconds since the Unix epoch.
    Seconds(i64),
    /// Text expected to hold an integer number of seconds.
    Text(String),
}

impl From<i64> for Timestamp {
    fn from(seconds: i64) -> Self {
        Timestamp::Seconds(seconds)
    }
}

impl From<i32> for Timestamp {
    fn from(seconds: i32) -> Self {
        Timestamp::Seconds(i64::from(seconds))
    }
}

impl From<u32> for Timestamp {
    fn from(seconds: u32) -> Self {
        Timestamp::Seconds(i64::from(seconds))
    }
}

impl From<&str> for Timestamp {
    fn from(text: &str) -> Self {
        Timestamp::Text(text.to_string())
    }
}

impl From<String> for Timestamp {
    fn from(text: String) -> Self {
        Timestamp::Text(text)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Timestamp::Seconds(dt.timestamp())
    }
}

impl TryFrom<&serde_json::Value> for Timestamp {
    type Error = Error;

    /// Accepts JSON integers and strings; every other JSON kind is a type error.
    fn try_from(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => Ok(Timestamp::Text(s.clone())),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Timestamp::Seconds)
                .ok_or_else(|| Error::TimestampType(value.to_string())),
            other => Err(Error::TimestampType(other.to_string())),
        }
    }
}

impl Timestamp {
    /// Converts to epoch seconds without range checks.
    ///
    /// Text may carry surrounding whitespace, a sign, and single `_` separators
    /// between digits (`1_553_302_923`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampFormat`] when text does not hold an integer.
    pub fn to_seconds(&self) -> Result<i64> {
        match self {
            Timestamp::Seconds(seconds) => Ok(*seconds),
            Timestamp::Text(text) => {
                let trimmed = text.trim();
                let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
                strip_digit_separators(digits)
                    .and_then(|digits| digits.parse::<i64>().ok())
                    .ok_or_else(|| Error::TimestampFormat {
                        timestamp: text.clone(),
                    })
            }
        }
    }
}

/// Removes `_` separators, or `None` if one is not flanked by digits.
fn strip_digit_separators(text: &str) -> Option<Cow<'_, str>> {
    if !text.contains('_') {
        return Some(Cow::Borrowed(text));
    }
    let bytes = text.as_bytes();
    let well_placed = bytes.iter().enumerate().all(|(i, byte)| {
        *byte != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    well_placed.then(|| Cow::Owned(text.replace('_', "")))
}

/// Validates `timestamp` and renders it as decimal epoch seconds.
///
/// # Errors
///
/// - [`Error::TimestampFormat`] for text that is not an integer
/// - [`Error::TimestampOutOfRange`] for timestamps after the reference time or not after
///   [`QsOptions::earliest_timestamp`]
pub fn normalize(timestamp: &Timestamp, options: &QsOptions) -> Result<String> {
    let seconds = timestamp.to_seconds()?;
    let now = options.now().timestamp();

    // Saturating: `seconds` may be any i64, including `i64::MIN`.
    let delta_now = now.saturating_sub(seconds);
    if delta_now < 0 {
        return Err(Error::TimestampOutOfRange {
            timestamp: seconds,
            delta: delta_now,
            bound: Bound::Future,
        });
    }

    let delta_earliest = options.earliest_timestamp.saturating_sub(seconds);
    if delta_earliest >= 0 {
        return Err(Error::TimestampOutOfRange {
            timestamp: seconds,
            delta: delta_earliest,
            bound: Bound::Past,
        });
    }

    Ok(seconds.to_string())
}
