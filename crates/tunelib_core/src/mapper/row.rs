//! Conversions between SQLite rows/parameters and [`StorageRow`].

use rusqlite::types::{Value, ValueRef};
use rusqlite::Row;
use serde_json::{Number, Value as JsonValue};

/// Flat column -> value mapping for one table row.
///
/// Values are JSON scalars once normalized; nested arrays/objects only
/// appear between serialization and `json_dump_value`.
pub type StorageRow = serde_json::Map<String, JsonValue>;

/// Reads every column of `row` by name. BLOB columns are skipped.
pub fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<StorageRow> {
    let stmt = row.as_ref();
    let mut out = StorageRow::new();

    for (index, name) in stmt.column_names().into_iter().enumerate() {
        let value = match row.get_ref(index)? {
            ValueRef::Null => JsonValue::Null,
            ValueRef::Integer(value) => JsonValue::from(value),
            ValueRef::Real(value) => {
                Number::from_f64(value).map_or(JsonValue::Null, JsonValue::Number)
            }
            ValueRef::Text(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(_) => continue,
        };
        // Later columns win, so `SELECT song.*, library_song.*` keeps join-row ids.
        out.insert(name.to_string(), value);
    }

    Ok(out)
}

/// Converts one normalized value into a bindable SQL value.
pub fn to_sql_value(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(flag) => Value::Integer(i64::from(*flag)),
        JsonValue::Number(number) => match number.as_i64() {
            Some(integer) => Value::Integer(integer),
            None => number.as_f64().map_or(Value::Null, Value::Real),
        },
        JsonValue::String(text) => Value::Text(text.clone()),
        JsonValue::Array(_) | JsonValue::Object(_) => Value::Text(value.to_string()),
    }
}
