//! Error types for qs serialization and parsing.
//!
//! Every failure is a variant of [`Error`] carrying the structured context needed to
//! act on it (the offending fragment, its index, the full record line) rather than
//! only a formatted message.
//!
//! ## Error Categories
//!
//! - **Timestamp errors**: unsupported timestamp kinds, non-numeric text, values in the
//!   future or before the year 2000
//! - **Field errors**: input pairs of the wrong arity or carrying unsupported value kinds
//! - **Record errors**: lines with too few comma-separated tokens
//! - **Reconstruction errors**: fragments matching none of the shapes expected at the
//!   current nesting state
//! - **I/O errors**: file opening and reading failures in the input layer
//!
//! ## Examples
//!
//! ```rust
//! use qsck::{deserialize, Error};
//!
//! let err = deserialize("LOG,1546902289").unwrap_err();
//! assert!(matches!(err, Error::MalformedRecord { .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Which timestamp bound was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The timestamp lies after the reference "now".
    Future,
    /// The timestamp lies on or before the configured earliest timestamp.
    Past,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Future => f.write_str("ahead of now"),
            Bound::Past => f.write_str("before the earliest accepted timestamp"),
        }
    }
}

/// Represents all possible errors raised while writing or reading qs records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The timestamp is not a date-time, an integer, or a digit string.
    #[error("Timestamp {0} is not of supported type")]
    TimestampType(String),

    /// A string timestamp could not be read as an integer.
    #[error("Timestamp {timestamp:?} not castable to int")]
    TimestampFormat { timestamp: String },

    /// The timestamp is in the future or too far in the past.
    ///
    /// `delta` is `reference - timestamp` in seconds for [`Bound::Future`] (negative) and
    /// `earliest - timestamp` for [`Bound::Past`] (zero or positive), saturating at the
    /// `i64` bounds.
    #[error("Timestamp {timestamp} is {} s {bound}", .delta.unsigned_abs())]
    TimestampOutOfRange {
        timestamp: i64,
        delta: i64,
        bound: Bound,
    },

    /// A field entry is not exactly a `(key, value)` pair.
    #[error("Error unpacking {pair} at index {index} (expected a [key, value] pair)")]
    PairArity { index: usize, pair: String },

    /// A field value has a kind the serializer does not know how to encode.
    #[error("Unsupported data type in {pair}")]
    UnsupportedValue { pair: String },

    /// The line has fewer than three comma-separated tokens.
    #[error("Malformatted input row {line:?}")]
    MalformedRecord { line: String },

    /// A `key={` opening is followed by neither a list item, a JSON object nor `}`.
    #[error("Unrecognized nesting in fragment {index} {fragment:?}")]
    UnrecognizedNesting { index: usize, fragment: String },

    /// A fragment closes a nesting that is not open, or closes it with an invalid shape.
    #[error("Unexpected terminator in fragment {index} {fragment:?}")]
    UnexpectedTerminator { index: usize, fragment: String },

    /// A fragment matches none of the shapes accepted in the current parse state.
    #[error("Unparseable fragment {index} {fragment:?} ({cause})")]
    UnparseableFragment {
        index: usize,
        fragment: String,
        cause: String,
    },

    /// The fragments ran out while a nested value was still open.
    #[error("Nested value {key:?} opened at fragment {index} is never closed")]
    UnterminatedNesting { index: usize, key: String },

    /// A reconstruction error, enriched with the full record line it occurred in.
    #[error("Error reconstructing pairs from row {line:?} ({source})")]
    InRecord {
        line: String,
        #[source]
        source: Box<Error>,
    },

    /// A JSON input line does not have the `[identifier, timestamp, fields]` shape.
    #[error("Invalid input record: {0}")]
    InvalidInput(String),

    /// The input path does not carry one of the accepted suffixes.
    #[error("Unsupported file suffix for {path}, must be one of {expected}")]
    UnsupportedSuffix { path: String, expected: String },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates an unparseable-fragment error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qsck::Error;
    ///
    /// let err = Error::unparseable(3, " x: 1", "not a key=value item");
    /// assert!(err.to_string().contains("fragment 3"));
    /// ```
    pub fn unparseable<T: fmt::Display>(index: usize, fragment: &str, cause: T) -> Self {
        Error::UnparseableFragment {
            index,
            fragment: fragment.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn unexpected_terminator(index: usize, fragment: &str) -> Self {
        Error::UnexpectedTerminator {
            index,
            fragment: fragment.to_string(),
        }
    }

    pub fn unrecognized_nesting(index: usize, fragment: &str) -> Self {
        Error::UnrecognizedNesting {
            index,
            fragment: fragment.to_string(),
        }
    }

    /// Wraps `self` with the record line it was raised for.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qsck::Error;
    ///
    /// let err = Error::unexpected_terminator(0, "}").in_record("LOG,1546902289,}");
    /// assert!(err.to_string().contains("LOG,1546902289,}"));
    /// ```
    #[must_use]
    pub fn in_record(self, line: &str) -> Self {
        Error::InRecord {
            line: line.to_string(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, looking through [`Error::InRecord`] wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::InRecord { source, .. } => source.root(),
            other => other,
        }
    }

    /// Creates an invalid-input error for JSON lines that are not shaped as records.
    pub fn invalid_input<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidInput(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
