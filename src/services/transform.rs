//! Pure transforms over in-memory record arrays.
//!
//! Records are JSON values; anything that is not an object is treated as a
//! record with no fields.

use serde_json::{Map, Value, json};

use crate::models::Record;

/// Group key used for records that lack the grouping field
pub const UNKNOWN_GROUP: &str = "unknown";

fn fields(record: &Value) -> Option<&Map<String, Value>> {
    record.as_object()
}

fn field_names(record: Option<&Value>) -> Vec<Value> {
    record
        .and_then(fields)
        .map(|map| map.keys().cloned().map(Value::String).collect())
        .unwrap_or_default()
}

/// Keep the records whose fields equal every criterion exactly.
///
/// No type coercion: `1` and `"1"` differ, as do `1` and `true`.
pub fn filter_by_equality(records: &[Value], criteria: &Record) -> Vec<Value> {
    if criteria.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| match fields(record) {
            Some(map) => criteria
                .iter()
                .all(|(key, expected)| map.get(key) == Some(expected)),
            None => false,
        })
        .cloned()
        .collect()
}

/// Count, first record and its field names
pub fn aggregate_basic(records: &[Value]) -> Value {
    if records.is_empty() {
        return json!({ "count": 0 });
    }

    json!({
        "count": records.len(),
        "sample": records.first(),
        "keys": field_names(records.first()),
    })
}

/// Record count plus the JSON type of each field of the first record
pub fn analyze_basic(records: &[Value]) -> Value {
    let Some(first) = records.first() else {
        return json!({ "message": "no data to analyze" });
    };

    let data_types: Map<String, Value> = fields(first)
        .map(|map| {
            map.iter()
                .map(|(key, value)| (key.clone(), Value::String(type_name(value).to_string())))
                .collect()
        })
        .unwrap_or_default();

    json!({
        "total_records": records.len(),
        "data_types": data_types,
        "sample_record": first,
    })
}

/// Count records per distinct value of `field`.
///
/// String values group under themselves; other values under their JSON text,
/// so `1` groups as `"1"` and an explicit `null` as `"null"`. Records without
/// the field group under [`UNKNOWN_GROUP`].
pub fn group_by_count(records: &[Value], field: &str) -> Value {
    let mut groups: Map<String, Value> = Map::new();

    for record in records {
        let key = match fields(record).and_then(|map| map.get(field)) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => UNKNOWN_GROUP.to_string(),
        };

        let count = groups
            .get(&key)
            .and_then(Value::as_u64)
            .unwrap_or(0);
        groups.insert(key, json!(count + 1));
    }

    let total_groups = groups.len();
    json!({
        "groups": groups,
        "total_groups": total_groups,
    })
}

/// Count, field names of the first record, first and last records
pub fn summarize(records: &[Value]) -> Value {
    if records.is_empty() {
        return json!({ "message": "no data" });
    }

    json!({
        "total_records": records.len(),
        "fields": field_names(records.first()),
        "first_record": records.first(),
        "last_record": records.last(),
    })
}

/// Secondary filter stage of the data-filter endpoint.
///
/// Custom filters are accepted in any shape but not applied; records pass
/// through unchanged.
pub fn apply_custom_filters(records: Vec<Value>, _custom_filters: &Value) -> Vec<Value> {
    records
}

/// Type name of a JSON value, in JSON's own vocabulary.
///
/// Integers and floats are told apart by how the number was written.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
