use super::{DataType, Value};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Declared sort order of a column, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    Ascending,
    Descending,
    None,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "ASC"),
            Self::Descending => write!(f, "DESC"),
            Self::None => write!(f, "NONE"),
        }
    }
}

/// Kinds of predicates a column accepts for pushdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    Range,
    Equal,
    NotEqual,
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub order: Order,
    pub filters: Vec<FilterKind>,
    /// Filters on this column are applied precisely; the engine need not re-check.
    pub exact: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            order: Order::None,
            filters: Vec::new(),
            exact: false,
        }
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn with_filters(mut self, filters: impl Into<Vec<FilterKind>>) -> Self {
        self.filters = filters.into();
        self
    }

    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    pub fn supports(&self, kind: FilterKind) -> bool {
        self.filters.contains(&kind)
    }
}

/// Resolved position of a named column inside a [`Row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    RowId,
    Index(usize),
}

/// The fixed table layout discovered when a file is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
    row_count: usize,
    row_id_column: String,
}

impl Schema {
    pub fn new(columns: Vec<Column>, row_count: usize, row_id_column: impl Into<String>) -> Self {
        Self {
            columns,
            row_count,
            row_id_column: row_id_column.into(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|col| col.name.as_str())
    }

    pub fn find_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.find_column_index(name).map(|idx| &self.columns[idx])
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of records observed when the schema was built.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Name of the pseudo-column carrying the row identifier.
    pub fn row_id_column(&self) -> &str {
        &self.row_id_column
    }

    /// The row identifier takes precedence over a data field of the same name.
    pub fn resolve(&self, name: &str) -> Option<ColumnRef> {
        if name == self.row_id_column {
            return Some(ColumnRef::RowId);
        }
        self.find_column_index(name).map(ColumnRef::Index)
    }

    /// Declared order of a column; the row identifier is always ascending.
    pub fn declared_order(&self, column: ColumnRef) -> Order {
        match column {
            ColumnRef::RowId => Order::Ascending,
            ColumnRef::Index(idx) => self.columns[idx].order,
        }
    }
}

/// A scanned record projected onto the schema, tagged with its row identifier.
#[derive(Debug, Clone)]
pub struct Row {
    row_id: usize,
    values: Vec<Value>,
    schema: Arc<Schema>,
}

impl Row {
    pub fn new(row_id: usize, values: Vec<Value>, schema: Arc<Schema>) -> Self {
        Self {
            row_id,
            values,
            schema,
        }
    }

    pub fn row_id(&self) -> usize {
        self.row_id
    }

    /// Values in schema column order, without the row identifier.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn value(&self, column: ColumnRef) -> Cow<'_, Value> {
        match column {
            ColumnRef::RowId => Cow::Owned(Value::Integer(self.row_id as i64)),
            ColumnRef::Index(idx) => Cow::Borrowed(&self.values[idx]),
        }
    }

    pub fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.schema.resolve(name).map(|column| self.value(column))
    }

    /// Pairs of column name and value, row identifier first. A field named
    /// like the row identifier is shadowed by it.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Cow<'_, Value>)> {
        let row_id_column = self.schema.row_id_column();
        std::iter::once((
            row_id_column,
            Cow::Owned(Value::Integer(self.row_id as i64)),
        ))
        .chain(
            self.schema
                .column_names()
                .zip(self.values.iter().map(Cow::Borrowed))
                .filter(move |(name, _)| *name != row_id_column),
        )
    }

    pub fn to_json(&self) -> JsonValue {
        let object: Map<String, JsonValue> = self
            .entries()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect();
        JsonValue::Object(object)
    }

    /// Keeps only the named columns, in the requested order.
    pub fn project(&self, columns: &[String]) -> JsonValue {
        let object: Map<String, JsonValue> = columns
            .iter()
            .filter_map(|name| self.get(name).map(|value| (name.clone(), value.to_json())))
            .collect();
        JsonValue::Object(object)
    }
}

/// Rows are equal when their identifiers and values match.
impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.row_id == other.row_id && self.values == other.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::new(
            vec![
                Column::new("a", DataType::Integer),
                Column::new("b", DataType::Text),
            ],
            1,
            "rowid",
        ))
    }

    #[test]
    fn test_row_lookup() {
        let row = Row::new(0, vec![Value::Integer(1), Value::Null], schema());

        assert_eq!(row.get("a").as_deref(), Some(&Value::Integer(1)));
        assert_eq!(row.get("rowid").as_deref(), Some(&Value::Integer(0)));
        assert_eq!(row.get("b").as_deref(), Some(&Value::Null));
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn test_row_to_json_puts_row_id_first() {
        let row = Row::new(3, vec![Value::Integer(1), Value::Text("x".into())], schema());
        let rendered = row.to_json();

        assert_eq!(rendered, json!({"rowid": 3, "a": 1, "b": "x"}));
        let keys: Vec<&String> = rendered.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["rowid", "a", "b"]);
    }

    #[test]
    fn test_row_id_shadows_same_named_field() {
        let schema = Arc::new(Schema::new(
            vec![
                Column::new("rowid", DataType::Integer),
                Column::new("a", DataType::Integer),
            ],
            1,
            "rowid",
        ));
        let row = Row::new(0, vec![Value::Integer(99), Value::Integer(1)], schema);

        assert_eq!(row.to_json(), json!({"rowid": 0, "a": 1}));
        assert_eq!(row.entries().count(), 2);
        assert_eq!(row.project(&["rowid".to_string()]), json!({"rowid": 0}));
    }

    #[test]
    fn test_declared_order_of_row_id() {
        let schema = schema();
        assert_eq!(schema.declared_order(ColumnRef::RowId), Order::Ascending);
        assert_eq!(schema.declared_order(ColumnRef::Index(0)), Order::None);
    }
}
