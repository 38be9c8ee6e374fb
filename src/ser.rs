//! qs serialization.
//!
//! This module provides the [`Serializer`] that writes [`Field`]s as qs fragments and
//! assembles complete record lines.
//!
//! ## Overview
//!
//! | Value | Written as |
//! |-------|------------|
//! | `Scalar(s)` | `key=s` |
//! | `Null` | `key=(null)` |
//! | `List1` | `key={sub=v, sub=[k: v, k: v]}` |
//! | `JsonObject` | `key={"k":v}` (compact JSON, caller's key order) |
//!
//! Nothing is escaped. A scalar holding `,`, `=`, `{` or `}` is written as-is; the reader
//! resolves such values heuristically.
//!
//! ## Usage
//!
//! Most users should use [`crate::serialize`]:
//!
//! ```rust
//! use qsck::{serialize, Field, Value};
//!
//! let line = serialize(
//!     "LOG",
//!     "1553302923",
//!     &[Field::null("howdy"), Field::new("my_nest", Value::list1([("sub_key1", "foo"), ("sk2", "bar")]))],
//! )
//! .unwrap();
//! assert_eq!(line, "LOG,1553302923,howdy=(null),my_nest={sub_key1=foo, sk2=bar}\n");
//! ```

use crate::shape::NULL_SENTINEL;
use crate::timestamp::{self, Timestamp};
use crate::{Field, ListValue, QsOptions, Result, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static SCIENTIFIC_TRAILING_ZEROS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d\.\d+[1-9])0+e\+(\d+)").expect("valid regex"));

/// Rewrites `1.230000e+05`-style literals to `1.23E+05` anywhere in `text`.
///
/// ```rust
/// use qsck::ser::normalize_numerics;
///
/// assert_eq!(normalize_numerics("v=1.230000e+05"), "v=1.23E+05");
/// assert_eq!(normalize_numerics("v=1.0e+05"), "v=1.0e+05");
/// ```
pub fn normalize_numerics(text: &str) -> Cow<'_, str> {
    SCIENTIFIC_TRAILING_ZEROS.replace_all(text, "${1}E+${2}")
}

/// The qs record serializer.
///
/// Writes one record per [`Serializer::serialize_record`] call into an internal buffer.
pub struct Serializer {
    output: String,
    options: QsOptions,
}

impl Serializer {
    pub fn new(options: QsOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends one complete, newline-terminated record.
    ///
    /// # Errors
    ///
    /// Returns the timestamp errors of [`timestamp::normalize`]. Nothing is written for a
    /// record that fails.
    pub fn serialize_record(
        &mut self,
        identifier: &str,
        timestamp: &Timestamp,
        fields: &[Field],
    ) -> Result<()> {
        let seconds = timestamp::normalize(timestamp, &self.options)?;

        let start = self.output.len();
        self.output.push_str(identifier);
        self.output.push(',');
        self.output.push_str(&seconds);
        for field in fields {
            self.output.push(',');
            if let Err(err) = self.write_field(field) {
                self.output.truncate(start);
                return Err(err);
            }
        }
        self.output.push('\n');

        if self.options.normalize_numerics {
            let normalized = normalize_numerics(&self.output[start..]).into_owned();
            self.output.truncate(start);
            self.output.push_str(&normalized);
        }

        tracing::trace!(identifier, fields = fields.len(), "serialized record");
        Ok(())
    }

    /// Appends the fragment for a single field.
    pub fn write_field(&mut self, field: &Field) -> Result<()> {
        self.output.push_str(&field.key);
        self.output.push('=');

        match &field.value {
            Value::Scalar(s) => self.output.push_str(s),
            Value::Null => self.output.push_str(NULL_SENTINEL),
            Value::List1(items) => {
                self.output.push('{');
                for (i, (sub_key, sub_value)) in items.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_list_item(sub_key, sub_value);
                }
                self.output.push('}');
            }
            Value::JsonObject(map) => {
                let json = serde_json::to_string(map).map_err(crate::Error::invalid_input)?;
                self.output.push_str(&json);
            }
        }

        Ok(())
    }

    fn write_list_item(&mut self, sub_key: &str, sub_value: &ListValue) {
        self.output.push_str(sub_key);
        self.output.push('=');

        match sub_value {
            ListValue::Scalar(s) => self.output.push_str(s),
            ListValue::List2(pairs) => {
                self.output.push('[');
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.output.push_str(k);
                    self.output.push_str(": ");
                    self.output.push_str(v);
                }
                self.output.push(']');
            }
        }
    }
}
