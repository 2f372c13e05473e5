//! JSON to Value conversion
//!
//! Two conversions are needed: the natural one used while inferring a
//! schema, and the typed projection applied to every scanned record once
//! the schema is fixed.

use super::error::{JsonError, JsonResult};
use super::reader::Record;
use crate::core::{DataType, Schema, Value};
use serde_json::Value as JsonValue;

pub struct JsonToValueConverter;

impl JsonToValueConverter {
    /// Convert a JSON value to the narrowest matching [`Value`].
    ///
    /// Arrays and objects are not scalars; they are carried as their JSON text.
    pub fn natural(json_value: &JsonValue) -> Value {
        match json_value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Text(n.to_string())
                }
            }
            JsonValue::String(s) => Value::Text(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => Value::Text(json_value.to_string()),
        }
    }

    /// Convert a JSON value to the column type fixed at open time.
    pub fn convert(json_value: &JsonValue, expected_type: DataType) -> JsonResult<Value> {
        match (json_value, expected_type) {
            (JsonValue::Null, _) => Ok(Value::Null),

            (JsonValue::Bool(b), DataType::Boolean) => Ok(Value::Boolean(*b)),

            (JsonValue::Number(n), DataType::Integer) => n
                .as_i64()
                .map(Value::Integer)
                .ok_or_else(|| JsonError::TypeMismatch(format!("Cannot convert {} to INTEGER", n))),

            // Float columns accept integers too
            (JsonValue::Number(n), DataType::Float) => n
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| JsonError::TypeMismatch(format!("Cannot convert {} to FLOAT", n))),

            (JsonValue::String(s), DataType::Text) => Ok(Value::Text(s.clone())),

            // Any JSON value renders as TEXT
            (_, DataType::Text) => Ok(Value::Text(json_value.to_string())),

            _ => Err(JsonError::TypeMismatch(format!(
                "Cannot convert JSON {} to {}",
                json_value, expected_type
            ))),
        }
    }

    /// Project a record onto the schema: one value per column, NULL where absent.
    /// Fields unknown to the schema are ignored.
    pub fn project(record: &Record, schema: &Schema) -> JsonResult<Vec<Value>> {
        schema
            .columns()
            .iter()
            .map(|column| match record.get(&column.name) {
                Some(json_value) => Self::convert(json_value, column.data_type).map_err(|e| match e {
                    JsonError::TypeMismatch(msg) => {
                        JsonError::TypeMismatch(format!("column '{}': {}", column.name, msg))
                    }
                    other => other,
                }),
                None => Ok(Value::Null),
            })
            .collect()
    }
}
