//! Removal markers for configuration trees
//!
//! Two distinct markers stand in for the host-language conventions the
//! original design leaned on: `unset` deletes a key during a merge, and
//! `removed` suppresses a fragment from a loader chain. Both are tagged
//! single-key objects, so legitimate `null` configuration values stay
//! unambiguous.

use serde_json::{Map, Value};
use tracing::debug;

const UNSET_TAG: &str = "$pack-compose:unset";
const REMOVED_TAG: &str = "$pack-compose:removed";

fn marker(tag: &str) -> Value {
    let mut map = Map::new();
    map.insert(tag.to_string(), Value::Bool(true));
    Value::Object(map)
}

fn is_marker(value: &Value, tag: &str) -> bool {
    match value {
        Value::Object(map) => map.len() == 1 && map.get(tag) == Some(&Value::Bool(true)),
        _ => false,
    }
}

/// Marker deleting a key when merged over a base tree.
///
/// A key mapped to this marker in an overrides tree is absent from the
/// merge result, not merely null-valued.
pub fn unset() -> Value {
    marker(UNSET_TAG)
}

/// Whether a value is the [`unset`] marker.
pub fn is_unset(value: &Value) -> bool {
    is_marker(value, UNSET_TAG)
}

/// Marker suppressing a configuration fragment.
///
/// Filter callbacks place this marker inside `use` chains or `oneOf`
/// groups to excise a single entry; [`strip`] drops the marked entries
/// before a preset finalizes its tree.
pub fn removed() -> Value {
    marker(REMOVED_TAG)
}

/// Whether a value is the [`removed`] marker.
pub fn is_removed(value: &Value) -> bool {
    is_marker(value, REMOVED_TAG)
}

/// Strip suppression markers out of a tree.
///
/// Marked array elements are dropped, nested values are stripped
/// recursively, and a rule object whose `use` or `oneOf` list lost
/// every element is dropped along with its markers. Returns `None`
/// when the value itself is suppressed.
pub fn strip(value: &Value) -> Option<Value> {
    if is_removed(value) {
        return None;
    }
    match value {
        Value::Array(items) => Some(Value::Array(items.iter().filter_map(strip).collect())),
        Value::Object(map) => {
            let mut stripped = Map::new();
            for (key, item) in map {
                if let Some(kept) = strip(item) {
                    stripped.insert(key.clone(), kept);
                }
            }
            for list_key in ["use", "oneOf"] {
                let had_entries = matches!(map.get(list_key), Some(Value::Array(items)) if !items.is_empty());
                let now_empty =
                    matches!(stripped.get(list_key), Some(Value::Array(items)) if items.is_empty());
                if had_entries && now_empty {
                    // Every alternative was suppressed; the rule goes too.
                    debug!(list_key, "dropping rule with no remaining alternatives");
                    return None;
                }
            }
            Some(Value::Object(stripped))
        }
        _ => Some(value.clone()),
    }
}
