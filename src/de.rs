//! qs record parsing.
//!
//! [`parse_record`] splits a line into identifier, timestamp and field fragments, then
//! hands the fragments to [`reassemble`] and [`reconstruct`]. The timestamp is returned
//! exactly as written; unlike the write path, reading never validates it.
//!
//! ```rust
//! use qsck::de::parse_record;
//! use qsck::{Field, Value};
//!
//! let record = parse_record("LOG,1546902289,event_vars={subtype=disconnected}\n").unwrap();
//! assert_eq!(record.identifier, "LOG");
//! assert_eq!(record.timestamp, "1546902289");
//! assert_eq!(
//!     record.fields,
//!     vec![Field::new("event_vars", Value::list1([("subtype", "disconnected")]))]
//! );
//! ```

use crate::reassemble::reassemble;
use crate::reconstruct::reconstruct;
use crate::{Error, Record, Result};

/// Removes one trailing `\n` or `\r\n`.
fn strip_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Parses one qs line.
///
/// # Errors
///
/// - [`Error::MalformedRecord`] when the line has fewer than three comma-separated tokens
/// - [`Error::InRecord`] wrapping a reconstruction error, carrying the full line
pub fn parse_record(line: &str) -> Result<Record> {
    let body = strip_line_terminator(line);

    let mut tokens = body.split(',');
    let (identifier, timestamp) = match (tokens.next(), tokens.next()) {
        (Some(identifier), Some(timestamp)) => (identifier, timestamp),
        _ => return Err(malformed(line)),
    };
    let raw_fragments: Vec<&str> = tokens.collect();
    if raw_fragments.is_empty() {
        return Err(malformed(line));
    }

    let fragments = reassemble(&raw_fragments);
    let fields = reconstruct(&fragments).map_err(|err| {
        tracing::debug!(error = %err, "field reconstruction failed");
        err.in_record(line)
    })?;

    Ok(Record {
        identifier: identifier.to_string(),
        timestamp: timestamp.to_string(),
        fields,
    })
}

fn malformed(line: &str) -> Error {
    Error::MalformedRecord {
        line: line.to_string(),
    }
}
