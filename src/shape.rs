//! Fragment shape predicates.
//!
//! The qs format has no quoting, so the reader decides what a comma-separated fragment
//! is by its shape alone. All of those decisions go through the predicates in this
//! module; [`crate::reassemble`] and [`crate::reconstruct`] never inspect fragment
//! text any other way.
//!
//! # Grammar
//!
//! ```text
//! record      := identifier "," timestamp "," field ("," field)* "\n"
//! field       := key "=" scalar
//!              | key "=(null)"
//!              | key "={" level1-body "}"
//!              | key "=" json-object
//! level1-body := "" | level1-item ("," SP level1-item)*
//! level1-item := key "=" scalar
//!              | key "=[" level2-body "]"
//! level2-body := "" | level2-item ("," SP level2-item)*
//! level2-item := key ": " scalar
//! ```
//!
//! Keys never contain `=`. A nested value is recognized by the character right after a
//! key's `=`: `{` opens level 1, `[` (inside a level-1 list) opens level 2.

use once_cell::sync::Lazy;
use regex::Regex;

/// The literal text standing for an absent value.
pub const NULL_SENTINEL: &str = "(null)";

// `key=value` with the key running up to the first `=`.
static PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(?P<key>[^=]*)=(?P<value>.*)$").expect("valid regex"));

// Level-1 item: a key free of structural characters, then `=`.
static LEVEL1_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(?P<key>[^=:{}\[\]]*)=(?P<value>.*)$").expect("valid regex")
});

// Level-2 item: `key: value`.
static LEVEL2_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(?P<key>[^:]*): (?P<value>.*)$").expect("valid regex"));

// A compact JSON object body after its opening brace: `"name":...`.
static JSON_OBJECT_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"(?:[^"\\]|\\.)*"\s*:"#).expect("valid regex"));

// Reassembly lookbehind, level 1: anchored `key=`.
static LEVEL1_PAIR_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[^\s=:{}\[\],][^=:{}\[\],]*=").expect("valid regex"));

// Reassembly lookbehind, level 2: `key: ` anywhere in the fragment.
static LEVEL2_PAIR_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\s=:{}\[\],][^=:{}\[\],]*: ").expect("valid regex"));

fn split<'a>(re: &Regex, text: &'a str) -> Option<(&'a str, &'a str)> {
    let caps = re.captures(text)?;
    let key = caps.name("key")?.as_str();
    let value = caps.name("value")?.as_str();
    Some((key, value))
}

/// Splits a top-level `key=value` fragment whose value does not open a nesting.
///
/// ```rust
/// use qsck::shape::is_plain_pair;
///
/// assert_eq!(is_plain_pair("_model=LG-M327"), Some(("_model", "LG-M327")));
/// assert_eq!(is_plain_pair("eq=a=b"), Some(("eq", "a=b")));
/// assert_eq!(is_plain_pair("nest={a=1}"), None);
/// assert_eq!(is_plain_pair("no pair here"), None);
/// ```
pub fn is_plain_pair(fragment: &str) -> Option<(&str, &str)> {
    split(&PAIR, fragment).filter(|(_, value)| !value.starts_with('{'))
}

/// Splits a `key={rest` fragment into the key and everything after the brace.
pub fn is_nesting_open(fragment: &str) -> Option<(&str, &str)> {
    let (key, value) = split(&PAIR, fragment)?;
    value.strip_prefix('{').map(|rest| (key, rest))
}

/// Whether `rest` (the text after `key={`) begins a JSON object member.
pub fn is_json_object_start(rest: &str) -> bool {
    JSON_OBJECT_START.is_match(rest)
}

/// Splits a level-1 list item, `subkey=value`.
pub fn is_level1_list_item(text: &str) -> Option<(&str, &str)> {
    split(&LEVEL1_ITEM, text)
}

/// Splits a level-2 list item, `subkey: value`.
pub fn is_level2_list_item(text: &str) -> Option<(&str, &str)> {
    split(&LEVEL2_ITEM, text)
}

/// Whether a fragment begins with a level-1 `key=` pair.
pub fn has_level1_pair_shape(fragment: &str) -> bool {
    LEVEL1_PAIR_SHAPE.is_match(fragment)
}

/// Whether a fragment contains a level-2 `key: ` pair.
pub fn has_level2_pair_shape(fragment: &str) -> bool {
    LEVEL2_PAIR_SHAPE.is_match(fragment)
}

/// Whether a fragment could be the start of a new pair rather than a stray value piece.
pub fn has_pair_separator(fragment: &str) -> bool {
    fragment.contains(':') || fragment.contains('=')
}

/// Net count of `[` over `]` in `text`.
pub fn bracket_balance(text: &str) -> i64 {
    text.chars().fold(0, |acc, ch| match ch {
        '[' => acc + 1,
        ']' => acc - 1,
        _ => acc,
    })
}
