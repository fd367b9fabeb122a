//! Dict trimming: drops the entries an option object left unset before it is emitted.

use crate::value::{Map, Value};

/// Removes null entries, and objects or arrays that end up empty, from `map`, recursively.
///
/// Enforced nulls are kept (they render as an explicit `null`), and inside arrays plain
/// nulls are kept as well since their position carries meaning (e.g. gaps in a data series).
#[must_use]
pub fn trim_dict(map: Map) -> Map {
    map.into_iter()
        .filter_map(|(key, value)| trim_entry(value).map(|value| (key, value)))
        .collect()
}

/// Trims every element of `items` without dropping any position.
#[must_use]
pub fn trim_iterable(items: Vec<Value>) -> Vec<Value> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Value::Object(trim_dict(map)),
            Value::Array(nested) => Value::Array(trim_iterable(nested)),
            other => other,
        })
        .collect()
}

fn trim_entry(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let trimmed = trim_dict(map);
            (!trimmed.is_empty()).then_some(Value::Object(trimmed))
        }
        Value::Array(items) => {
            let trimmed = trim_iterable(items);
            (!trimmed.is_empty()).then_some(Value::Array(trimmed))
        }
        other => Some(other),
    }
}
