//! Property-based tests for the serialize/deserialize round trip.
//!
//! Generated text avoids the structural characters (`,`, `=`, `:`, braces, brackets)
//! so every generated record is unambiguous; the comma-heavy cases are covered by the
//! hand-written tests.

use proptest::prelude::*;
use qsck::{deserialize, serialize, Field, JsonMap, ListValue, Value};

fn key() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,8}"
}

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._-]{0,12}"
}

fn list_value() -> impl Strategy<Value = ListValue> {
    prop_oneof![
        text().prop_map(ListValue::Scalar),
        prop::collection::vec((key(), text()), 0..4).prop_map(ListValue::List2),
    ]
}

fn json_object() -> impl Strategy<Value = JsonMap> {
    prop::collection::vec((key(), any::<i64>()), 1..4).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::from(v)))
            .collect()
    })
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        text().prop_map(Value::Scalar),
        Just(Value::Null),
        prop::collection::vec((key(), list_value()), 0..4).prop_map(Value::List1),
        json_object().prop_map(Value::JsonObject),
    ]
}

fn fields() -> impl Strategy<Value = Vec<Field>> {
    prop::collection::vec(
        (key(), value()).prop_map(|(key, value)| Field { key, value }),
        0..6,
    )
}

proptest! {
    #[test]
    fn prop_round_trip(
        identifier in "[A-Z]{1,5}",
        timestamp in 946_684_801i64..1_500_000_000,
        fields in fields(),
    ) {
        let line = serialize(&identifier, timestamp, &fields).unwrap();
        prop_assert!(line.ends_with('\n'));

        if fields.is_empty() {
            prop_assert!(deserialize(&line).is_err());
        } else {
            let record = deserialize(&line).unwrap();
            prop_assert_eq!(&record.identifier, &identifier);
            prop_assert_eq!(&record.timestamp, &timestamp.to_string());
            prop_assert_eq!(&record.fields, &fields);
        }
    }

    #[test]
    fn prop_serialize_is_deterministic(fields in fields()) {
        let first = serialize("LOG", 1546902289, &fields).unwrap();
        let second = serialize("LOG", 1546902289, &fields).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_free_text_with_commas_survives_at_top_level(
        words in prop::collection::vec("[a-zA-Z0-9 ._-]{0,8}", 1..5),
    ) {
        let msg = words.join(",");
        let fields = vec![Field::scalar("msg", msg.as_str()), Field::scalar("next", "x")];
        let line = serialize("LOG", 1546902289, &fields).unwrap();
        prop_assert_eq!(deserialize(&line).unwrap().fields, fields);
    }
}
