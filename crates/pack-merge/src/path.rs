//! Dotted-path lookup into configuration trees

use serde_json::Value;

/// Look up a `dot.separated.path` inside a nested tree.
///
/// Returns `None` on a missing segment or a non-mapping intermediate,
/// never an error.
pub fn find_in<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
