//! Deep merging of configuration trees
//!
//! Combines a base template with a caller-supplied overrides tree:
//! arrays append, nested mappings merge recursively, and scalar values
//! from the overrides win. Neither input is ever mutated; the result is
//! a freshly built tree.

use serde_json::{Map, Value};

use crate::sentinel;

/// Deeply merge `overrides` into `base`, returning a new tree.
///
/// Merge rules, evaluated per key of `overrides`:
/// - both sides hold arrays: concatenate them, base elements first;
/// - both sides hold mappings: merge recursively;
/// - the override value is the [`sentinel::unset`] marker: the key is
///   absent from the result entirely;
/// - anything else (scalars, type mismatches): the override value wins.
///
/// Keys absent from `overrides` keep their `base` value. When either
/// input is not a mapping the overrides value is returned as-is, which
/// is the same override-wins fallback applied at the top level.
pub fn deep_merge(base: &Value, overrides: &Value) -> Value {
    let (Value::Object(base_map), Value::Object(override_map)) = (base, overrides) else {
        return overrides.clone();
    };

    let mut merged: Map<String, Value> = base_map.clone();
    for (key, value) in override_map {
        if sentinel::is_unset(value) {
            merged.remove(key);
            continue;
        }
        let combined = match (base_map.get(key), value) {
            (Some(Value::Array(head)), Value::Array(tail)) => {
                let mut items = head.clone();
                items.extend(tail.iter().cloned());
                Value::Array(items)
            }
            (Some(prev @ Value::Object(_)), next @ Value::Object(_)) => deep_merge(prev, next),
            _ => value.clone(),
        };
        merged.insert(key.clone(), combined);
    }
    Value::Object(merged)
}
