//! The qs record model.
//!
//! A [`Record`] is an identifier, a timestamp and an ordered list of [`Field`]s. Field
//! values form a closed, two-level tree:
//!
//! - [`Value`]: what a top-level field holds (`Scalar`, `Null`, `List1`, `JsonObject`)
//! - [`ListValue`]: what a level-1 list item holds (`Scalar`, `List2`)
//!
//! Level-2 entries are always plain `(key, value)` string pairs.
//!
//! ## JSON representation
//!
//! Records travel between the command-line tools and other programs as JSON arrays:
//!
//! ```text
//! ["LOG", "1546902289", [["_model", "LG-M327"], ["gone", null],
//!                        ["nest", [["a", "1"], ["net", [["type", "MOBILE"]]]]],
//!                        ["doc", {"y": 3, "x": 1}]]]
//! ```
//!
//! [`Record`], [`Field`] and the value enums serialize to exactly that shape, and
//! [`Field::from_json`] reads it back with the arity and type checks the serializer
//! needs.
//!
//! ```rust
//! use qsck::{Field, Value};
//!
//! let field = Field::new("nest", Value::list1([("a", "1")]));
//! assert_eq!(serde_json::to_string(&field).unwrap(), r#"["nest",[["a","1"]]]"#);
//! ```

use crate::shape::NULL_SENTINEL;
use crate::timestamp::Timestamp;
use crate::{Error, Result};
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use std::fmt;

/// A JSON object whose key order is preserved.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// The value of a top-level field.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Free text, written verbatim.
    Scalar(String),
    /// The null sentinel, written `(null)`.
    Null,
    /// A level-1 list, written `key={sub=v, sub=[k: v]}`.
    List1(Vec<(String, ListValue)>),
    /// An embedded JSON object, written `key={"k":v}`.
    JsonObject(JsonMap),
}

/// The value of a level-1 list item.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListValue {
    Scalar(String),
    /// A level-2 list, written `sub=[k: v, k: v]`.
    List2(Vec<(String, String)>),
}

/// One `key=value` field of a record.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

/// A parsed qs line.
///
/// The timestamp is kept exactly as read; it is only validated on the write path.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub identifier: String,
    pub timestamp: String,
    pub fields: Vec<Field>,
}

impl Value {
    /// Builds a [`Value::List1`] from `(subkey, subvalue)` pairs.
    pub fn list1<K, V, I>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ListValue>,
    {
        Value::List1(
            items
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Reads a JSON field value: string, null, array of `[subkey, subvalue]` pairs, or
    /// object. `pair` names the enclosing field in error messages.
    fn from_json(value: &serde_json::Value, pair: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => Ok(Value::from(s.as_str())),
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Object(map) => Ok(Value::JsonObject(map.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    let (sub_key, sub_value) = json_pair(item).ok_or_else(|| unsupported(pair))?;
                    let sub_key = json_key(sub_key).ok_or_else(|| unsupported(pair))?;
                    Ok((sub_key, ListValue::from_json(sub_value, pair)?))
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::List1),
            _ => Err(unsupported(pair)),
        }
    }
}

impl ListValue {
    /// Builds a [`ListValue::List2`] from `(key, value)` pairs.
    pub fn list2<K, V, I>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ListValue::List2(
            items
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn from_json(value: &serde_json::Value, pair: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => Ok(ListValue::Scalar(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    let (k, v) = json_pair(item).ok_or_else(|| unsupported(pair))?;
                    match (json_key(k), v.as_str()) {
                        (Some(k), Some(v)) => Ok((k, v.to_string())),
                        _ => Err(unsupported(pair)),
                    }
                })
                .collect::<Result<Vec<_>>>()
                .map(ListValue::List2),
            _ => Err(unsupported(pair)),
        }
    }
}

impl From<&str> for Value {
    /// Text equal to the null sentinel becomes [`Value::Null`].
    fn from(s: &str) -> Self {
        if s == NULL_SENTINEL {
            Value::Null
        } else {
            Value::Scalar(s.to_string())
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        if s == NULL_SENTINEL {
            Value::Null
        } else {
            Value::Scalar(s)
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<JsonMap> for Value {
    fn from(map: JsonMap) -> Self {
        Value::JsonObject(map)
    }
}

impl From<&str> for ListValue {
    fn from(s: &str) -> Self {
        ListValue::Scalar(s.to_string())
    }
}

impl From<String> for ListValue {
    fn from(s: String) -> Self {
        ListValue::Scalar(s)
    }
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Field {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Shorthand for a `Scalar` field.
    pub fn scalar(key: impl Into<String>, value: impl Into<String>) -> Self {
        Field {
            key: key.into(),
            value: Value::Scalar(value.into()),
        }
    }

    pub fn null(key: impl Into<String>) -> Self {
        Field {
            key: key.into(),
            value: Value::Null,
        }
    }

    /// Reads the `index`-th entry of a JSON field list.
    ///
    /// # Errors
    ///
    /// - [`Error::PairArity`] if the entry is not a two-element array
    /// - [`Error::UnsupportedValue`] if the key is not a string or the value has a kind
    ///   with no qs encoding (numbers, booleans, malformed nested lists)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qsck::{Error, Field};
    /// use serde_json::json;
    ///
    /// let field = Field::from_json(0, &json!(["good_ideas", null])).unwrap();
    /// assert!(field.value.is_null());
    ///
    /// let err = Field::from_json(1, &json!(["i'm", "one", "too many"])).unwrap_err();
    /// assert!(matches!(err, Error::PairArity { index: 1, .. }));
    ///
    /// let err = Field::from_json(0, &json!(["here's a boolean", false])).unwrap_err();
    /// assert!(matches!(err, Error::UnsupportedValue { .. }));
    /// ```
    pub fn from_json(index: usize, pair: &serde_json::Value) -> Result<Self> {
        let (key, value) = json_pair(pair).ok_or_else(|| Error::PairArity {
            index,
            pair: pair.to_string(),
        })?;
        let key = json_key(key).ok_or_else(|| unsupported(pair))?;
        Ok(Field {
            key,
            value: Value::from_json(value, pair)?,
        })
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.key)?;
        tuple.serialize_element(&self.value)?;
        tuple.end()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.identifier)?;
        tuple.serialize_element(&self.timestamp)?;
        tuple.serialize_element(&self.fields)?;
        tuple.end()
    }
}

/// A record read from a JSON line, ready to be written as qs.
#[derive(Clone, Debug, PartialEq)]
pub struct InputRecord {
    pub identifier: String,
    pub timestamp: Timestamp,
    pub fields: Vec<Field>,
}

impl InputRecord {
    /// Reads a `[identifier, timestamp, fields]` JSON array.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for a malformed outer array, otherwise the timestamp and
    /// field errors of [`Timestamp`]'s JSON conversion and [`Field::from_json`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let parts = match value.as_array() {
            Some(parts) if parts.len() == 3 => parts,
            _ => {
                return Err(Error::invalid_input(format_args!(
                    "expected [identifier, timestamp, fields], got {value}"
                )))
            }
        };
        let identifier = parts[0]
            .as_str()
            .ok_or_else(|| Error::invalid_input(format_args!("identifier {} is not a string", parts[0])))?
            .to_string();
        let timestamp = Timestamp::try_from(&parts[1])?;
        let fields = parts[2]
            .as_array()
            .ok_or_else(|| Error::invalid_input(format_args!("fields {} is not an array", parts[2])))?
            .iter()
            .enumerate()
            .map(|(idx, pair)| Field::from_json(idx, pair))
            .collect::<Result<Vec<_>>>()?;

        Ok(InputRecord {
            identifier,
            timestamp,
            fields,
        })
    }
}

impl fmt::Display for Record {
    /// Renders the record's JSON array form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

fn json_pair(value: &serde_json::Value) -> Option<(&serde_json::Value, &serde_json::Value)> {
    match value.as_array()?.as_slice() {
        [key, value] => Some((key, value)),
        _ => None,
    }
}

fn json_key(key: &serde_json::Value) -> Option<String> {
    key.as_str().map(str::to_string)
}

fn unsupported(pair: &serde_json::Value) -> Error {
    Error::UnsupportedValue {
        pair: pair.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_sentinel_text_becomes_null() {
        assert_eq!(Value::from("(null)"), Value::Null);
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Scalar("x".to_string()));
    }

    #[test]
    fn test_record_serializes_as_json_array() {
        let record = Record {
            identifier: "LOG".to_string(),
            timestamp: "1546902289".to_string(),
            fields: vec![
                Field::scalar("_model", "LG-M327"),
                Field::null("gone"),
                Field::new(
                    "nest",
                    Value::list1([
                        ("a", ListValue::from("1")),
                        ("net", ListValue::list2([("type", "MOBILE")])),
                    ]),
                ),
            ],
        };

        assert_eq!(
            record.to_string(),
            r#"["LOG","1546902289",[["_model","LG-M327"],["gone",null],["nest",[["a","1"],["net",[["type","MOBILE"]]]]]]]"#
        );
    }

    #[test]
    fn test_json_object_keeps_key_order() {
        let field = Field::from_json(0, &json!(["nest4", {"y": 3, "x": 1}])).unwrap();
        assert_eq!(serde_json::to_string(&field).unwrap(), r#"["nest4",{"y":3,"x":1}]"#);
    }

    #[test]
    fn test_from_json_reads_nested_lists() {
        let field = Field::from_json(
            0,
            &json!(["my_nest", [["sub_key1", "foo"], ["net", [["type", "MOBILE"]]]]]),
        )
        .unwrap();

        assert_eq!(
            field.value,
            Value::list1([
                ("sub_key1", ListValue::from("foo")),
                ("net", ListValue::list2([("type", "MOBILE")])),
            ])
        );
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        assert!(matches!(
            Field::from_json(4, &json!(["lonely"])),
            Err(Error::PairArity { index: 4, .. })
        ));
        assert!(matches!(
            Field::from_json(0, &json!(["n", 12])),
            Err(Error::UnsupportedValue { .. })
        ));
        assert!(matches!(
            Field::from_json(0, &json!(["n", [["a", "1", "2"]]])),
            Err(Error::UnsupportedValue { .. })
        ));
        assert!(matches!(
            Field::from_json(0, &json!(["n", [["a", [["k", 1]]]]])),
            Err(Error::UnsupportedValue { .. })
        ));
        assert!(matches!(
            Field::from_json(0, &json!([7, "x"])),
            Err(Error::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn test_input_record_from_json() {
        let record = InputRecord::from_json(&json!(["LOG", 1553302923, [["a", "b"]]])).unwrap();
        assert_eq!(record.identifier, "LOG");
        assert_eq!(record.timestamp, Timestamp::Seconds(1553302923));
        assert_eq!(record.fields, vec![Field::scalar("a", "b")]);

        assert!(matches!(
            InputRecord::from_json(&json!(["LOG", 1553302923])),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            InputRecord::from_json(&json!(["LOG", [2019, 1, 3], []])),
            Err(Error::TimestampType(_))
        ));
    }
}
