//! Schema Inference Module
//!
//! Builds the fixed schema of a JSON Lines file from the complete record set:
//! the union of field names in first-seen order, and for each field the
//! narrowest common type and the order of its values in the file.

use super::converter::JsonToValueConverter;
use super::reader::Record;
use crate::core::{Column, DataType, FilterKind, JsonlError, Order, Result, Schema, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Pushdown support advertised for every column, whatever its type.
pub const SUPPORTED_FILTERS: [FilterKind; 5] = [
    FilterKind::Range,
    FilterKind::Equal,
    FilterKind::NotEqual,
    FilterKind::IsNull,
    FilterKind::IsNotNull,
];

/// Determines the type and order of a single column.
pub struct TypeInferencer;

impl TypeInferencer {
    pub fn infer(values: &[Value]) -> (DataType, Order) {
        (Self::infer_type(values), Self::infer_order(values))
    }

    /// Narrowest type representing every non-null value.
    /// Type hierarchy: Integer < Float < Text.
    /// Boolean remains Boolean unless mixed with others, then Text.
    pub fn infer_type(values: &[Value]) -> DataType {
        let mut has_text = false;
        let mut has_float = false;
        let mut has_integer = false;
        let mut has_boolean = false;

        for data_type in values.iter().filter_map(Value::data_type) {
            match data_type {
                DataType::Integer => has_integer = true,
                DataType::Float => has_float = true,
                DataType::Boolean => has_boolean = true,
                DataType::Text => has_text = true,
            }
        }

        if has_text {
            return DataType::Text;
        }

        if has_boolean {
            return if has_integer || has_float {
                DataType::Text
            } else {
                DataType::Boolean
            };
        }

        if has_float {
            return DataType::Float;
        }

        if has_integer {
            return DataType::Integer;
        }

        // Only NULLs observed
        DataType::Text
    }

    /// Order of the values as they appear in the file.
    ///
    /// NULLs and values that cannot be compared with their neighbour leave the
    /// column unordered. A run of equal values is reported as ascending.
    pub fn infer_order(values: &[Value]) -> Order {
        if values.is_empty() || values.iter().any(Value::is_null) {
            return Order::None;
        }

        let mut ascending = true;
        let mut descending = true;

        for pair in values.windows(2) {
            match pair[0].compare(&pair[1]) {
                Ok(Ordering::Less) => descending = false,
                Ok(Ordering::Greater) => ascending = false,
                Ok(Ordering::Equal) => {}
                Err(_) => return Order::None,
            }

            if !ascending && !descending {
                return Order::None;
            }
        }

        if ascending {
            Order::Ascending
        } else {
            Order::Descending
        }
    }
}

/// Builds the schema of a file from all of its records.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    row_id_column: String,
}

impl SchemaBuilder {
    pub fn new(row_id_column: impl Into<String>) -> Self {
        Self {
            row_id_column: row_id_column.into(),
        }
    }

    pub fn build(&self, records: &[Record]) -> Result<Schema> {
        if records.is_empty() {
            return Err(JsonlError::NoData);
        }

        // Field values in file order, NULL-padded where a record lacks the field
        let mut fields: Vec<(String, Vec<Value>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (row, record) in records.iter().enumerate() {
            for (key, json_value) in record {
                let idx = match positions.get(key) {
                    Some(&idx) => idx,
                    None => {
                        positions.insert(key.clone(), fields.len());
                        fields.push((key.clone(), vec![Value::Null; row]));
                        fields.len() - 1
                    }
                };
                fields[idx].1.push(JsonToValueConverter::natural(json_value));
            }

            for (_, values) in fields.iter_mut() {
                if values.len() <= row {
                    values.push(Value::Null);
                }
            }
        }

        let columns = fields
            .into_iter()
            .map(|(name, values)| {
                let (data_type, order) = TypeInferencer::infer(&values);
                Column::new(name, data_type)
                    .with_order(order)
                    .with_filters(SUPPORTED_FILTERS)
                    .exact()
            })
            .collect();

        Ok(Schema::new(columns, records.len(), self.row_id_column.clone()))
    }
}
