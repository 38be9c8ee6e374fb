//! Line conversions behind the `qs-parse` and `qs-format` tools.
//!
//! [`qs_to_json`] and [`json_to_qs`] convert a single line. [`convert_lines`] drives
//! either over a whole input: a line that fails is logged with its number and raw text
//! and counted, and the run moves on to the next line.
//!
//! ```rust
//! use qsck::convert::{json_to_qs, qs_to_json};
//! use qsck::QsOptions;
//!
//! let json = qs_to_json("LOG,1546902289,_model=LG-M327\n").unwrap();
//! assert_eq!(json, "[\"LOG\",\"1546902289\",[[\"_model\",\"LG-M327\"]]]\n");
//!
//! let line = json_to_qs(r#"["LOG", 1546902289, [["_model", "LG-M327"]]]"#, &QsOptions::new()).unwrap();
//! assert_eq!(line, "LOG,1546902289,_model=LG-M327\n");
//! ```

use crate::input::Lines;
use crate::ser::normalize_numerics;
use crate::{Error, InputRecord, QsOptions, Result};
use std::io::{BufRead, Write};

/// Parses one qs line and renders it as a newline-terminated JSON array.
///
/// Numeric normalization is applied to the JSON text.
///
/// # Errors
///
/// Returns the parse errors of [`crate::deserialize`].
pub fn qs_to_json(line: &str) -> Result<String> {
    let record = crate::deserialize(line)?;
    let json = serde_json::to_string(&record).map_err(Error::invalid_input)?;
    let mut out = normalize_numerics(&json).into_owned();
    out.push('\n');
    Ok(out)
}

/// Reads one `[identifier, timestamp, fields]` JSON line and formats it as a qs line.
///
/// # Errors
///
/// [`Error::InvalidInput`] for text that is not JSON or not shaped as a record, plus
/// the conversion and timestamp errors of [`InputRecord::from_json`] and
/// [`crate::serialize_with_options`].
pub fn json_to_qs(line: &str, options: &QsOptions) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(line).map_err(Error::invalid_input)?;
    let record = InputRecord::from_json(&value)?;
    crate::serialize_with_options(&record.identifier, record.timestamp, &record.fields, options)
}

/// Outcome of a [`convert_lines`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub failed: usize,
}

/// Converts every line of `lines` with `convert`, writing the results to `out`.
///
/// Unreadable or unconvertible lines are logged at error level and skipped. `source`
/// names the input in log events.
///
/// # Errors
///
/// Only failures writing to `out` end the run.
pub fn convert_lines<R, W, F>(
    lines: Lines<R>,
    out: &mut W,
    source: &str,
    mut convert: F,
) -> Result<Summary>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<String>,
{
    let mut summary = Summary::default();

    for (number, line) in lines {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::error!(line = number, source, error = %err, "unreadable row");
                summary.failed += 1;
                continue;
            }
        };

        match convert(&line) {
            Ok(text) => {
                out.write_all(text.as_bytes())?;
                summary.converted += 1;
            }
            Err(err) => {
                tracing::error!(line = number, source, raw = ?line, error = %err, "skipping row");
                summary.failed += 1;
            }
        }
    }

    out.flush()?;
    if summary.failed > 0 {
        tracing::warn!(failed = summary.failed, source, "some rows were skipped");
    }
    Ok(summary)
}
