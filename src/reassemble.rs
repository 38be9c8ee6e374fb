//! Comma reassembly.
//!
//! A record's tail is first split naively on every `,`. Values are never escaped, so
//! some of those commas were part of a value: `msg=hello, world` arrives as `msg=hello`
//! and ` world`. [`reassemble`] glues such pieces back onto the fragment they came
//! from, looking at most one fragment behind.
//!
//! A fragment is a continuation when it holds neither `:` nor `=` and the fragment
//! emitted before it looks like a pair of the level currently being read:
//!
//! - outside a level-2 list, a level-1 `key=value` pair
//! - inside a level-2 list, a level-2 `key: value` pair
//!
//! ```rust
//! use qsck::reassemble::reassemble;
//!
//! let fragments = reassemble(["msg=hello", " world", "n={a=[k: x", " y]}"]);
//! assert_eq!(fragments, vec!["msg=hello, world", "n={a=[k: x, y]}"]);
//! ```

use crate::shape::{bracket_balance, has_level1_pair_shape, has_level2_pair_shape, has_pair_separator};

/// Merges fragments that were split off a value by a literal comma.
///
/// Single left-to-right pass; output order follows input order.
pub fn reassemble<I, S>(fragments: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut merged: Vec<String> = Vec::new();
    let mut inside_level2_list = false;

    for fragment in fragments {
        let fragment = fragment.as_ref();

        let continues_previous = !has_pair_separator(fragment)
            && merged.last().is_some_and(|previous| {
                if inside_level2_list {
                    has_level2_pair_shape(previous)
                } else {
                    has_level1_pair_shape(previous)
                }
            });

        match merged.last_mut() {
            Some(previous) if continues_previous => {
                tracing::debug!(previous = %previous, fragment, "rejoining comma-split value");
                previous.push(',');
                previous.push_str(fragment);
            }
            _ => merged.push(fragment.to_string()),
        }

        let balance = bracket_balance(fragment);
        if !inside_level2_list {
            inside_level2_list = balance > 0;
        } else if fragment.ends_with("]}") || balance < 0 {
            inside_level2_list = false;
        }
    }

    merged
}
