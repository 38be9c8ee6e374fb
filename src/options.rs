//! Configuration options for qs serialization.
//!
//! [`QsOptions`] controls the parts of record writing that are policy rather than
//! grammar: the accepted timestamp window and the whole-line numeric normalization.
//!
//! ## Examples
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use qsck::{serialize_with_options, Field, QsOptions};
//!
//! // Pin "now" so backfills of old log files validate deterministically
//! let options = QsOptions::new()
//!     .with_reference_time(Utc.with_ymd_and_hms(2019, 3, 24, 0, 0, 0).unwrap());
//! let line = serialize_with_options("LOG", 1553302923, &[Field::scalar("a", "b")], &options)
//!     .unwrap();
//! assert_eq!(line, "LOG,1553302923,a=b\n");
//! ```

use chrono::{DateTime, Utc};

/// Seconds since the epoch of 2000-01-01T00:00:00Z.
pub const Y2K_EPOCH_SECONDS: i64 = 946_684_800;

/// Configuration options for qs serialization.
///
/// # Examples
///
/// ```rust
/// use qsck::QsOptions;
///
/// let options = QsOptions::new().with_numeric_normalization(false);
/// assert!(!options.normalize_numerics);
/// assert_eq!(options.earliest_timestamp, qsck::Y2K_EPOCH_SECONDS);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct QsOptions {
    /// Rewrite `1.230000e+05`-style literals to `1.23E+05` across the whole line.
    pub normalize_numerics: bool,
    /// Timestamps must be strictly greater than this many epoch seconds.
    pub earliest_timestamp: i64,
    /// The "now" timestamps are checked against; `None` reads the wall clock per record.
    pub reference_time: Option<DateTime<Utc>>,
}

impl Default for QsOptions {
    fn default() -> Self {
        QsOptions {
            normalize_numerics: true,
            earliest_timestamp: Y2K_EPOCH_SECONDS,
            reference_time: None,
        }
    }
}

impl QsOptions {
    /// Creates default options (normalization on, year-2000 lower bound, wall clock).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the numeric-literal normalization pass.
    #[must_use]
    pub fn with_numeric_normalization(mut self, enabled: bool) -> Self {
        self.normalize_numerics = enabled;
        self
    }

    /// Sets the exclusive lower bound for timestamps, in epoch seconds.
    #[must_use]
    pub fn with_earliest_timestamp(mut self, seconds: i64) -> Self {
        self.earliest_timestamp = seconds;
        self
    }

    /// Pins the reference time used for the "not in the future" check.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use qsck::QsOptions;
    ///
    /// let at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    /// let options = QsOptions::new().with_reference_time(at);
    /// assert_eq!(options.reference_time, Some(at));
    /// ```
    #[must_use]
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }

    /// The reference "now", captured once per call.
    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.reference_time.unwrap_or_else(Utc::now)
    }
}
