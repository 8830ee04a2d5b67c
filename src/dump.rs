//! Renders object graphs as JSON for inspection.
//!
//! Beans become objects keyed by their schema, dictionaries become objects
//! keyed by entry, sequences and listener lists become arrays. An object
//! that has already been rendered is written as `{"$ref": "<type>"}`, which
//! also stops reference cycles.

use serde_json::{Map, Number, Value as JsonValue, json};
use wtkx_core::{ObjectRef, Value};

pub fn to_json(value: &Value) -> JsonValue {
    let mut seen = Vec::new();
    render(value, &mut seen)
}

pub fn to_json_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(&to_json(value)).unwrap_or_default()
}

fn render(value: &Value, seen: &mut Vec<ObjectRef>) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Char(c) => JsonValue::String(c.to_string()),
        Value::Byte(n) => json!(n),
        Value::Short(n) => json!(n),
        Value::Int(n) => json!(n),
        Value::Long(n) => json!(n),
        Value::Float(n) => float(f64::from(*n)),
        Value::Double(n) => float(*n),
        Value::String(s) | Value::Url(s) => JsonValue::String(s.clone()),
        Value::Object(object) => render_object(object, seen),
    }
}

/// NaN and infinities have no JSON form.
fn float(n: f64) -> JsonValue {
    Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
}

fn render_object(object: &ObjectRef, seen: &mut Vec<ObjectRef>) -> JsonValue {
    if seen.iter().any(|s| s.ptr_eq(object)) {
        return json!({ "$ref": object.type_name() });
    }
    seen.push(object.clone());

    // No borrow may be held while descending.
    let inner = object.borrow();
    if let Some(list) = inner.as_listener_list() {
        let items: Vec<ObjectRef> = list.iter().cloned().collect();
        drop(inner);
        return JsonValue::Array(
            items
                .into_iter()
                .map(|item| render_object(&item, seen))
                .collect(),
        );
    }

    let mut fields: Vec<(String, Value)> = Vec::new();
    if let Some(dictionary) = inner.as_dictionary() {
        for key in dictionary.keys() {
            let value = dictionary.get(&key).unwrap_or_default();
            fields.push((key, value));
        }
    } else if let Some(bean) = inner.as_bean() {
        for descriptor in bean.schema() {
            let value = bean.get(descriptor.name).unwrap_or_default();
            fields.push((descriptor.name.to_string(), value));
        }
    }
    let items: Vec<Value> = inner
        .as_sequence()
        .map(|sequence| (0..sequence.len()).filter_map(|i| sequence.get(i)).collect())
        .unwrap_or_default();
    let type_name = inner.type_name().to_string();
    let has_properties = inner.as_dictionary().is_some() || inner.as_bean().is_some();
    let is_sequence = inner.as_sequence().is_some();
    drop(inner);

    if is_sequence && !has_properties {
        return JsonValue::Array(items.iter().map(|item| render(item, seen)).collect());
    }

    let mut map = Map::new();
    map.insert("$type".to_string(), JsonValue::String(type_name));
    for (name, value) in &fields {
        map.insert(name.clone(), render(value, seen));
    }
    if !items.is_empty() {
        map.insert(
            "$items".to_string(),
            JsonValue::Array(items.iter().map(|item| render(item, seen)).collect()),
        );
    }
    JsonValue::Object(map)
}
