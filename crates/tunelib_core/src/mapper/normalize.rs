//! Field normalization applied around every storage write and read.

use super::row::StorageRow;
use super::{MapError, MapResult};
use serde_json::{Number, Value};

/// Drops attributes whose value is `null`, `""`, `[]` or `{}`, so table
/// defaults apply instead of blanks.
pub fn remove_empty_attributes(row: &mut StorageRow) {
    row.retain(|_, value| !is_empty(value));
}

/// Coerces numeric text in `columns` into numbers. Text that does not parse
/// is left untouched.
pub fn to_number(row: &mut StorageRow, columns: &[&str]) {
    for column in columns {
        let Some(Value::String(text)) = row.get(*column) else {
            continue;
        };

        let trimmed = text.trim();
        let coerced = match trimmed.parse::<i64>() {
            Ok(integer) => Some(Value::from(integer)),
            Err(_) => trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
        };

        if let Some(number) = coerced {
            row.insert((*column).to_string(), number);
        }
    }
}

/// Serializes nested arrays/objects into JSON text.
pub fn json_dump_value(row: &mut StorageRow) {
    for value in row.values_mut() {
        if value.is_array() || value.is_object() {
            *value = Value::String(value.to_string());
        }
    }
}

/// Parses JSON text in `columns` back into nested values. `null` entries are
/// dropped so field defaults apply.
pub fn json_load_value(row: &mut StorageRow, columns: &[&str]) -> MapResult<()> {
    for column in columns {
        let parsed = match row.get(*column) {
            Some(Value::String(text)) => Some(serde_json::from_str::<Value>(text).map_err(|err| {
                MapError::InvalidData(format!("column `{column}` is not valid JSON: {err}"))
            })?),
            Some(Value::Null) => None,
            _ => continue,
        };

        match parsed {
            Some(value) => row.insert((*column).to_string(), value),
            None => row.remove(*column),
        };
    }
    Ok(())
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
