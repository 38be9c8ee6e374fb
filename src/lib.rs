//! # qsck
//!
//! Serializer and parser for the ".qs" log-record format.
//!
//! ## What is qs?
//!
//! qs is a line-oriented text format for log records. Each line holds an identifier, a
//! Unix timestamp and an ordered list of `key=value` fields:
//!
//! ```text
//! LOG,1546902289,_model=LG-M327,gone=(null),event_vars={subtype=disconnected, networkInfo=[type: MOBILE[LTE]]},doc={"y":3,"x":1}
//! ```
//!
//! Field values are plain text, the null sentinel `(null)`, a nested `{sub=value}` list
//! whose items may hold one more `[key: value]` list, or an embedded JSON object.
//!
//! The format has no escaping. Commas, `=`, braces and brackets may all appear inside
//! values, so reading a line is a heuristic reconstruction rather than a tokenization:
//!
//! 1. the tail of the line is split on every `,`
//! 2. [`reassemble`](crate::reassemble) rejoins pieces that were split off a value
//! 3. [`reconstruct`](crate::reconstruct) walks the pieces with a small state machine to
//!    rebuild nested values
//!
//! [`deserialize`] reads back the fields [`serialize`] wrote, with a few exceptions the
//! grammar cannot express: an empty JSON object reads back as an empty `{}` list, and a
//! scalar starting with `{` (or, inside a `{...}` list, with `[`) reads back as a
//! nesting.
//!
//! ## Quick Start
//!
//! ```rust
//! use qsck::{deserialize, serialize, Field, ListValue, Value};
//!
//! let fields = vec![
//!     Field::scalar("_model", "LG-M327"),
//!     Field::null("gone"),
//!     Field::new(
//!         "event_vars",
//!         Value::list1([
//!             ("subtype", ListValue::from("disconnected")),
//!             ("networkInfo", ListValue::list2([("type", "MOBILE[LTE]")])),
//!         ]),
//!     ),
//! ];
//!
//! let line = serialize("LOG", 1546902289, &fields).unwrap();
//! assert_eq!(
//!     line,
//!     "LOG,1546902289,_model=LG-M327,gone=(null),\
//!      event_vars={subtype=disconnected, networkInfo=[type: MOBILE[LTE]]}\n"
//! );
//!
//! let record = deserialize(&line).unwrap();
//! assert_eq!(record.identifier, "LOG");
//! assert_eq!(record.timestamp, "1546902289");
//! assert_eq!(record.fields, fields);
//! ```
//!
//! ### Building field lists with qs_fields!
//!
//! ```rust
//! use qsck::{qs_fields, Field, Value};
//!
//! let fields = qs_fields! {
//!     "bad ideas" => "plenty",
//!     "good_ideas" => null,
//!     "my_nest" => { "sub_key1" => "foo", "sk2" => "bar" },
//! };
//! assert_eq!(fields[1], Field::null("good_ideas"));
//! ```
//!
//! ## Command-line tools
//!
//! - `qs-parse FILE` prints each qs line of `FILE` as a JSON array
//!   `[identifier, timestamp, fields]`
//! - `qs-format FILE` reads such JSON arrays, one per line, and prints qs lines
//!
//! Both accept plain, gzip, bzip2 and zstd compressed input, selected by file suffix.
//! The per-line conversions they run live in [`convert`].

pub mod convert;
pub mod de;
pub mod error;
pub mod input;
pub mod macros;
pub mod options;
pub mod reassemble;
pub mod reconstruct;
pub mod ser;
pub mod shape;
pub mod timestamp;
pub mod value;

pub use error::{Bound, Error, Result};
pub use options::{QsOptions, Y2K_EPOCH_SECONDS};
pub use ser::Serializer;
pub use timestamp::Timestamp;
pub use value::{Field, InputRecord, JsonMap, ListValue, Record, Value};

/// Formats one record as a newline-terminated qs line.
///
/// # Examples
///
/// ```rust
/// use qsck::{serialize, Field};
///
/// assert_eq!(serialize("GOL", "1553302923", &[]).unwrap(), "GOL,1553302923\n");
///
/// let line = serialize("FOO", 1553302923, &[Field::scalar("theOnly", "One")]).unwrap();
/// assert!(line.ends_with(",theOnly=One\n"));
/// ```
///
/// # Errors
///
/// Returns an error if the timestamp is not an integer or lies outside the accepted
/// window (see [`timestamp::normalize`]).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn serialize<T>(identifier: &str, timestamp: T, fields: &[Field]) -> Result<String>
where
    T: Into<Timestamp>,
{
    serialize_with_options(identifier, timestamp, fields, &QsOptions::default())
}

/// Formats one record with custom options.
///
/// # Errors
///
/// Returns an error if the timestamp is rejected under `options`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn serialize_with_options<T>(
    identifier: &str,
    timestamp: T,
    fields: &[Field],
    options: &QsOptions,
) -> Result<String>
where
    T: Into<Timestamp>,
{
    let mut serializer = Serializer::new(options.clone());
    serializer.serialize_record(identifier, &timestamp.into(), fields)?;
    Ok(serializer.into_inner())
}

/// Parses one qs line into a [`Record`].
///
/// A trailing `\n` or `\r\n` is ignored.
///
/// # Examples
///
/// ```rust
/// use qsck::{deserialize, Field};
///
/// let record = deserialize("LOG,1546902289,_model=LG-M327").unwrap();
/// assert_eq!(record.fields, vec![Field::scalar("_model", "LG-M327")]);
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] for lines with fewer than three comma-separated
/// tokens, or [`Error::InRecord`] when the fields cannot be reconstructed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn deserialize(line: &str) -> Result<Record> {
    de::parse_record(line)
}
