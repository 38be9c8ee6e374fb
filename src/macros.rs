//! Builder macros for field lists.
//!
//! ```rust
//! use qsck::{qs_fields, Field, ListValue, Value};
//!
//! let fields = qs_fields! {
//!     "_model" => "LG-M327",
//!     "gone" => null,
//!     "event_vars" => {
//!         "subtype" => "disconnected",
//!         "networkInfo" => ["type" => "MOBILE[LTE]", "state" => "CONNECTED"],
//!     },
//!     "empty" => {},
//! };
//!
//! assert_eq!(fields[0], Field::scalar("_model", "LG-M327"));
//! assert_eq!(fields[3].value, Value::List1(vec![]));
//! ```

/// Builds a [`Value`](crate::Value): `null`, `{ "sub" => item, ... }` for a level-1
/// list, or any expression convertible with `Value::from`.
#[macro_export]
macro_rules! qs_value {
    (null) => {
        $crate::Value::Null
    };

    ({ $($key:literal => $item:tt),* $(,)? }) => {
        $crate::Value::List1(vec![$(($key.to_string(), $crate::qs_list_value!($item))),*])
    };

    ($value:expr) => {
        $crate::Value::from($value)
    };
}

/// Builds a [`ListValue`](crate::ListValue): `[ "k" => "v", ... ]` for a level-2 list,
/// or any expression convertible with `ListValue::from`.
#[macro_export]
macro_rules! qs_list_value {
    ([ $($key:literal => $value:expr),* $(,)? ]) => {
        $crate::ListValue::List2(vec![$(($key.to_string(), ($value).to_string())),*])
    };

    ($value:expr) => {
        $crate::ListValue::from($value)
    };
}

/// Builds a `Vec<Field>` from `"key" => value` entries, in order.
#[macro_export]
macro_rules! qs_fields {
    ($($key:literal => $value:tt),* $(,)?) => {
        vec![$($crate::Field::new($key, $crate::qs_value!($value))),*]
    };
}
