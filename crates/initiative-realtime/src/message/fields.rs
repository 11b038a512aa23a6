//! Lenient field extraction from a command's `data` object.
//!
//! A wrong-typed or missing field yields its default instead of failing
//! the whole command. A non-object `data` behaves like `{}`.

use serde_json::Value;

use initiative_core::types::EntityId;

/// String field, or `""` when absent or not a string.
pub fn string(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Trimmed string field, `None` when blank.
pub fn trimmed(data: &Value, key: &str) -> Option<String> {
    let value = string(data, key);
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Integer field. Floats truncate toward zero and saturate at the `i32`
/// bounds; anything that is not a number is 0.
pub fn int(data: &Value, key: &str) -> i32 {
    match data.get(key) {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
            } else if let Some(f) = n.as_f64() {
                f as i32
            } else {
                // u64 above i64::MAX
                i32::MAX
            }
        }
        _ => 0,
    }
}

/// Entity id field, `None` when absent or not a valid id.
pub fn entity_id(data: &Value, key: &str) -> Option<EntityId> {
    data.get(key)
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse().ok())
}

/// List of entity ids. Entries that are not valid ids are skipped.
pub fn entity_ids(data: &Value, key: &str) -> Vec<EntityId> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|raw| raw.parse().ok())
                .collect()
        })
        .unwrap_or_default()
}
