//! Field reconstruction.
//!
//! Turns the reassembled fragments of a record into its ordered [`Field`]s. Nested
//! values span several fragments, so the walk is an explicit state machine:
//!
//! ```text
//!            key={sub=...          sub=[k: ...
//!   Idle ───────────────────▶ List1 ─────────────▶ List2
//!    ▲  │                       │  ▲                  │
//!    │  │ key={"k":...          │  └──── ...] ────────┘
//!    │  ▼                       │
//!    │ Json ── ...} (decodes) ──┤ ...}
//!    └──────────────────────────┘
//! ```
//!
//! Every transition consumes exactly one fragment. The first fragment of a nested value
//! is fed to the new state as if it were a continuation fragment, so a value that opens
//! and closes within one fragment needs no special casing.

use crate::shape::{
    bracket_balance, is_json_object_start, is_level1_list_item, is_level2_list_item,
    is_nesting_open, is_plain_pair,
};
use crate::value::JsonMap;
use crate::{Error, Field, ListValue, Result, Value};

enum State {
    Idle,
    List1 {
        key: String,
        items: Vec<(String, ListValue)>,
    },
    List2 {
        key: String,
        items: Vec<(String, ListValue)>,
        sub_key: String,
        sub_items: Vec<(String, String)>,
        /// Unmatched `[` count, including the list's own opening bracket.
        depth: i64,
    },
    Json {
        key: String,
        text: String,
    },
}

/// Result of reading one level-1 item.
enum Item {
    Complete(String, ListValue),
    /// A level-2 list that continues in the next fragment.
    Open {
        key: String,
        sub_items: Vec<(String, String)>,
        depth: i64,
    },
}

/// Rebuilds the fields of a record from its reassembled fragments.
///
/// Errors report `index`, the position of the offending fragment in `fragments`.
///
/// # Errors
///
/// - [`Error::UnrecognizedNesting`] for `key={` followed by something that is neither a
///   list item, a JSON object nor `}`
/// - [`Error::UnexpectedTerminator`] for a `}`-terminated fragment that closes nothing
///   or closes with a malformed item
/// - [`Error::UnparseableFragment`] for fragments matching no shape of the current state
/// - [`Error::UnterminatedNesting`] when the fragments end inside a nested value
///
/// # Examples
///
/// ```rust
/// use qsck::reconstruct::reconstruct;
/// use qsck::{Field, ListValue, Value};
///
/// let fields = reconstruct(&["a=1", "n={x=[k: v]", " y=2}", "z=(null)"]).unwrap();
/// assert_eq!(
///     fields,
///     vec![
///         Field::scalar("a", "1"),
///         Field::new(
///             "n",
///             Value::list1([("x", ListValue::list2([("k", "v")])), ("y", ListValue::from("2"))]),
///         ),
///         Field::null("z"),
///     ]
/// );
/// ```
pub fn reconstruct<S: AsRef<str>>(fragments: &[S]) -> Result<Vec<Field>> {
    let mut fields = Vec::new();
    let mut state = State::Idle;
    let mut opened_at = 0;

    for (index, fragment) in fragments.iter().enumerate() {
        if matches!(state, State::Idle) {
            opened_at = index;
        }
        let (next, field) = state.step(index, fragment.as_ref())?;
        fields.extend(field);
        state = next;
    }

    match state {
        State::Idle => Ok(fields),
        State::List1 { key, .. } | State::List2 { key, .. } | State::Json { key, .. } => {
            Err(Error::UnterminatedNesting {
                index: opened_at,
                key,
            })
        }
    }
}

impl State {
    fn step(self, index: usize, fragment: &str) -> Result<(State, Option<Field>)> {
        match self {
            State::Idle => Self::start(index, fragment),
            State::Json { key, text } => Self::json(key, text, index, fragment, fragment),
            // List items after the first are preceded by the ", " item separator.
            list => {
                let text = fragment.strip_prefix(' ').unwrap_or(fragment);
                list.list_fragment(index, text, fragment)
            }
        }
    }

    fn start(index: usize, fragment: &str) -> Result<(State, Option<Field>)> {
        if let Some((key, rest)) = is_nesting_open(fragment) {
            let key = key.to_string();
            if rest == "}" {
                return Ok((State::Idle, Some(Field::new(key, Value::List1(Vec::new())))));
            }
            if is_json_object_start(rest) {
                return Self::json(key, "{".to_string(), index, rest, fragment);
            }
            if is_level1_list_item(rest).is_some() {
                let list = State::List1 {
                    key,
                    items: Vec::new(),
                };
                return list.list_fragment(index, rest, fragment);
            }
            return Err(Error::unrecognized_nesting(index, fragment));
        }

        if let Some((key, value)) = is_plain_pair(fragment) {
            return Ok((State::Idle, Some(Field::new(key, Value::from(value)))));
        }

        if fragment.ends_with('}') {
            return Err(Error::unexpected_terminator(index, fragment));
        }
        Err(Error::unparseable(index, fragment, "expected a key=value pair"))
    }

    /// Appends `piece` to a JSON object's text and decodes it once it can be complete.
    fn json(
        key: String,
        mut text: String,
        index: usize,
        piece: &str,
        fragment: &str,
    ) -> Result<(State, Option<Field>)> {
        if text.len() > 1 {
            text.push(',');
        }
        text.push_str(piece);

        if !piece.ends_with('}') {
            return Ok((State::Json { key, text }, None));
        }

        match serde_json::from_str::<JsonMap>(&text) {
            Ok(map) => Ok((State::Idle, Some(Field::new(key, Value::JsonObject(map))))),
            // A nested object closed; the outer one continues.
            Err(err) if err.is_eof() => Ok((State::Json { key, text }, None)),
            Err(err) => Err(Error::unparseable(index, fragment, err)),
        }
    }

    /// Feeds `text` (a fragment without its item separator) to a list state.
    fn list_fragment(
        self,
        index: usize,
        text: &str,
        fragment: &str,
    ) -> Result<(State, Option<Field>)> {
        match self {
            State::List1 { key, mut items } => {
                if let Some(body) = text.strip_suffix('}') {
                    match read_level1_item(index, body, fragment) {
                        Ok(Item::Complete(sub_key, sub_value)) => items.push((sub_key, sub_value)),
                        _ => return Err(Error::unexpected_terminator(index, fragment)),
                    }
                    return Ok((State::Idle, Some(Field::new(key, Value::List1(items)))));
                }

                match read_level1_item(index, text, fragment)? {
                    Item::Complete(sub_key, sub_value) => {
                        items.push((sub_key, sub_value));
                        Ok((State::List1 { key, items }, None))
                    }
                    Item::Open {
                        key: sub_key,
                        sub_items,
                        depth,
                    } => Ok((
                        State::List2 {
                            key,
                            items,
                            sub_key,
                            sub_items,
                            depth,
                        },
                        None,
                    )),
                }
            }
            State::List2 {
                key,
                mut items,
                sub_key,
                mut sub_items,
                depth,
            } => {
                // `...]}` closes the level-2 list and its enclosing level-1 list at once.
                if let Some(body) = text.strip_suffix('}') {
                    if depth + bracket_balance(body) <= 0 {
                        let last = body
                            .strip_suffix(']')
                            .ok_or_else(|| Error::unexpected_terminator(index, fragment))?;
                        sub_items.push(read_level2_item(index, last, fragment)?);
                        items.push((sub_key, ListValue::List2(sub_items)));
                        return Ok((State::Idle, Some(Field::new(key, Value::List1(items)))));
                    }
                }

                let depth = depth + bracket_balance(text);
                if depth > 0 {
                    sub_items.push(read_level2_item(index, text, fragment)?);
                    return Ok((
                        State::List2 {
                            key,
                            items,
                            sub_key,
                            sub_items,
                            depth,
                        },
                        None,
                    ));
                }

                let last = text
                    .strip_suffix(']')
                    .ok_or_else(|| Error::unparseable(index, fragment, "level-2 list closed mid-item"))?;
                sub_items.push(read_level2_item(index, last, fragment)?);
                items.push((sub_key, ListValue::List2(sub_items)));
                Ok((State::List1 { key, items }, None))
            }
            State::Idle | State::Json { .. } => {
                Err(Error::unparseable(index, fragment, "not inside a list"))
            }
        }
    }
}

/// Reads a `subkey=value` or `subkey=[k: v...` item.
fn read_level1_item(index: usize, text: &str, fragment: &str) -> Result<Item> {
    let (sub_key, value) = is_level1_list_item(text)
        .ok_or_else(|| Error::unparseable(index, fragment, "expected a subkey=value item"))?;

    let Some(inner) = value.strip_prefix('[') else {
        return Ok(Item::Complete(
            sub_key.to_string(),
            ListValue::Scalar(value.to_string()),
        ));
    };

    let depth = 1 + bracket_balance(inner);
    if depth > 0 {
        let sub_items = if inner.is_empty() {
            Vec::new()
        } else {
            vec![read_level2_item(index, inner, fragment)?]
        };
        return Ok(Item::Open {
            key: sub_key.to_string(),
            sub_items,
            depth,
        });
    }

    let body = inner
        .strip_suffix(']')
        .ok_or_else(|| Error::unparseable(index, fragment, "level-2 list closed mid-item"))?;
    let sub_items = if body.is_empty() {
        Vec::new()
    } else {
        vec![read_level2_item(index, body, fragment)?]
    };
    Ok(Item::Complete(sub_key.to_string(), ListValue::List2(sub_items)))
}

fn read_level2_item(index: usize, text: &str, fragment: &str) -> Result<(String, String)> {
    is_level2_list_item(text)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| Error::unparseable(index, fragment, "expected a `key: value` item"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(fragments: &[&str]) -> Vec<Field> {
        reconstruct(fragments).unwrap()
    }

    #[test]
    fn test_plain_pairs_and_nulls() {
        assert_eq!(
            fields(&["_model=LG-M327", "gone=(null)", "empty=", "eq=a=b"]),
            vec![
                Field::scalar("_model", "LG-M327"),
                Field::null("gone"),
                Field::scalar("empty", ""),
                Field::scalar("eq", "a=b"),
            ]
        );
    }

    #[test]
    fn test_single_fragment_nestings() {
        assert_eq!(
            fields(&["empty={}", "nest2={a=1}", "event_vars={networkInfo=[type: MOBILE[LTE]]}"]),
            vec![
                Field::new("empty", Value::List1(vec![])),
                Field::new("nest2", Value::list1([("a", "1")])),
                Field::new(
                    "event_vars",
                    Value::list1([("networkInfo", ListValue::list2([("type", "MOBILE[LTE]")]))])
                ),
            ]
        );
    }

    #[test]
    fn test_multi_fragment_level1_and_level2() {
        let got = fields(&[
            "e={subtype=disconnected",
            " net=[type: MOBILE[LTE]",
            " state: CONNECTED]",
            " none=[]",
            " last=[k: v]}",
            "after=1",
        ]);
        assert_eq!(
            got,
            vec![
                Field::new(
                    "e",
                    Value::list1([
                        ("subtype", ListValue::from("disconnected")),
                        (
                            "net",
                            ListValue::list2([("type", "MOBILE[LTE]"), ("state", "CONNECTED")])
                        ),
                        ("none", ListValue::List2(vec![])),
                        ("last", ListValue::list2([("k", "v")])),
                    ])
                ),
                Field::scalar("after", "1"),
            ]
        );
    }

    #[test]
    fn test_level2_list_closing_with_its_parent() {
        assert_eq!(
            fields(&["e={net=[a: 1", " b: 2]}"]),
            vec![Field::new(
                "e",
                Value::list1([("net", ListValue::list2([("a", "1"), ("b", "2")]))])
            )]
        );
    }

    #[test]
    fn test_json_objects() {
        let got = fields(&[
            r#"nest3={"k31":2.0"#,
            r#""k32":0}"#,
            r#"deep={"a":{"x":1"#,
            r#""y":[1"#,
            r#"2]}"#,
            r#""b":"s, t"}"#,
            r#"one={"k":"v"}"#,
        ]);

        let expected = [
            ("nest3", json!({"k31": 2.0, "k32": 0})),
            ("deep", json!({"a": {"x": 1, "y": [1, 2]}, "b": "s, t"})),
            ("one", json!({"k": "v"})),
        ];
        assert_eq!(got.len(), expected.len());
        for (field, (key, doc)) in got.iter().zip(expected) {
            assert_eq!(field.key, key);
            match &field.value {
                Value::JsonObject(map) => assert_eq!(serde_json::Value::Object(map.clone()), doc),
                other => panic!("Expected JSON object, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_unrecognized_nesting() {
        assert_eq!(
            reconstruct(&["a=1", "k={oops}"]).unwrap_err(),
            Error::unrecognized_nesting(1, "k={oops}")
        );
    }

    #[test]
    fn test_unexpected_terminators() {
        assert_eq!(
            reconstruct(&["stray}"]).unwrap_err(),
            Error::unexpected_terminator(0, "stray}")
        );
        assert_eq!(
            reconstruct(&["k={a=1", " }"]).unwrap_err(),
            Error::unexpected_terminator(1, " }")
        );
        assert_eq!(
            reconstruct(&["k={a=[x: 1}"]).unwrap_err(),
            Error::unexpected_terminator(0, "k={a=[x: 1}")
        );
    }

    #[test]
    fn test_unparseable_fragments() {
        assert!(matches!(
            reconstruct(&["no pair"]),
            Err(Error::UnparseableFragment { index: 0, .. })
        ));
        assert!(matches!(
            reconstruct(&["k={a=1", " b: 2}"]),
            Err(Error::UnexpectedTerminator { index: 1, .. })
        ));
        assert!(matches!(
            reconstruct(&["k={a=1", " b: 2", " c=3}"]),
            Err(Error::UnparseableFragment { index: 1, .. })
        ));
        assert!(matches!(
            reconstruct(&[r#"k={"a":1"#, r#""b":}"#]),
            Err(Error::UnparseableFragment { index: 1, .. })
        ));
    }

    #[test]
    fn test_unterminated_nesting() {
        assert_eq!(
            reconstruct(&["a=1", "k={x=1", " y=2"]).unwrap_err(),
            Error::UnterminatedNesting {
                index: 1,
                key: "k".to_string()
            }
        );
        assert!(matches!(
            reconstruct(&[r#"k={"a":1"#]),
            Err(Error::UnterminatedNesting { .. })
        ));
    }
}
