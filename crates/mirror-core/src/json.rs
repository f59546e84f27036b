//! Bridge between [`Value`] trees and `serde_json` documents
//!
//! JSON documents come in as dynamic trees (objects become
//! `map[string]dynamic`, arrays become `[dynamic]`), which makes them usable
//! directly as conversion sources. Any value can be rendered back out.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::error::{ConversionMode, Error, Result};
use crate::shape::Shape;
use crate::value::Value;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

impl Value {
    /// Build a dynamic value tree from a JSON document
    ///
    /// Integers become `i64` when they fit and `u64` otherwise; every other
    /// number becomes `f64`. `null` becomes an empty dynamic.
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::empty_dynamic(),
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => number_value(n),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::list(
                Shape::Dynamic,
                items.iter().map(|item| dynamic(Value::from_json(item))).collect(),
            ),
            JsonValue::Object(object) => Value::map(
                Shape::String,
                Shape::Dynamic,
                object
                    .iter()
                    .map(|(k, v)| (Value::String(k.clone()), dynamic(Value::from_json(v))))
                    .collect(),
            ),
        }
    }

    /// Parse a JSON string into a dynamic value tree
    pub fn from_json_str(json: &str) -> Result<Value> {
        let json: JsonValue = serde_json::from_str(json)?;
        Ok(Value::from_json(&json))
    }

    /// Render this value as JSON
    ///
    /// Records become objects of their exported fields. Nil containers,
    /// absent pointers, empty dynamics and non-finite floats become `null`.
    /// Map keys must have a text form: strings, numbers or booleans.
    pub fn to_json(&self) -> Result<JsonValue> {
        render(self, &mut String::from("$"))
    }
}

fn number_value(n: &Number) -> Value {
    if let Some(v) = n.as_i64() {
        Value::I64(v)
    } else if let Some(v) = n.as_u64() {
        Value::U64(v)
    } else {
        Value::F64(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Keep already-dynamic values (JSON null) from being wrapped twice
fn dynamic(value: Value) -> Value {
    match value {
        Value::Dynamic(_) => value,
        other => Value::dynamic(other),
    }
}

fn float(v: f64) -> JsonValue {
    Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number)
}

fn render(value: &Value, path: &mut String) -> Result<JsonValue> {
    Ok(match value {
        Value::Bool(v) => JsonValue::Bool(*v),
        Value::I8(v) => JsonValue::from(*v),
        Value::I16(v) => JsonValue::from(*v),
        Value::I32(v) => JsonValue::from(*v),
        Value::I64(v) => JsonValue::from(*v),
        Value::U8(v) => JsonValue::from(*v),
        Value::U16(v) => JsonValue::from(*v),
        Value::U32(v) => JsonValue::from(*v),
        Value::U64(v) => JsonValue::from(*v),
        Value::F32(v) => float(f64::from(*v)),
        Value::F64(v) => float(*v),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::List(list) if list.is_nil() => JsonValue::Null,
        Value::List(list) => {
            let mut items = Vec::with_capacity(list.len());
            for (i, item) in list.items().iter().enumerate() {
                items.push(nested(path, &format!("[{}]", i), |p| render(item, p))?);
            }
            JsonValue::Array(items)
        }
        Value::Map(map) if map.is_nil() => JsonValue::Null,
        Value::Map(map) => {
            let mut object = JsonMap::new();
            for (key, value) in map.entries() {
                let name = key_text(key, path)?;
                let rendered = nested(path, &format!("[{:?}]", name), |p| render(value, p))?;
                object.insert(name, rendered);
            }
            JsonValue::Object(object)
        }
        Value::Record(record) => {
            let mut object = JsonMap::new();
            for (field, value) in record.fields().filter(|(f, _)| f.exported) {
                let rendered = nested(path, &format!(".{}", field.name), |p| render(value, p))?;
                object.insert(field.name.clone(), rendered);
            }
            JsonValue::Object(object)
        }
        Value::Pointer(pointer) => match pointer.get() {
            Some(pointee) => nested(path, ".*", |p| render(&pointee, p))?,
            None => JsonValue::Null,
        },
        Value::Dynamic(Some(inner)) => render(inner, path)?,
        Value::Dynamic(None) => JsonValue::Null,
    })
}

fn nested<T>(path: &mut String, segment: &str, f: impl FnOnce(&mut String) -> Result<T>) -> Result<T> {
    let len = path.len();
    path.push_str(segment);
    let result = f(path);
    path.truncate(len);
    result
}

fn key_text(key: &Value, path: &str) -> Result<String> {
    let key = key.as_dynamic().unwrap_or(key);
    if key.kind().is_leaf() {
        return Ok(key.to_string());
    }
    Err(Error::TypeMismatch {
        expected: "string".to_string(),
        found: key.shape().to_string(),
        path: path.to_string(),
        mode: ConversionMode::Strict,
    })
}
