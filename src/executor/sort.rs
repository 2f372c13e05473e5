// ============================================================================
// src/executor/sort.rs - Requested order for scans
// ============================================================================
//
// The engine may request an order the file does not provide natively. Rows
// are then materialized and stable-sorted here before offset/limit apply.
//
// ============================================================================

use crate::core::{ColumnRef, Order, Row, Schema, Value};
use std::cmp::Ordering;

// ============================================================================
// NULL HANDLING STRATEGY
// ============================================================================

/// Strategy for handling NULL values during sorting
///
/// SQL Standard Behavior:
/// - ASC: NULLS LAST (NULL values appear at the end)
/// - DESC: NULLS FIRST (NULL values appear at the beginning)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    NullsFirst,
    NullsLast,
}

impl NullOrdering {
    pub fn default_for_direction(descending: bool) -> Self {
        if descending {
            Self::NullsFirst
        } else {
            Self::NullsLast
        }
    }
}

// ============================================================================
// SORT KEY - One requested ordering column
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    /// Sort direction: false=ASC, true=DESC
    pub descending: bool,
    pub null_ordering: NullOrdering,
}

impl SortKey {
    pub fn new(column: impl Into<String>, descending: bool) -> Self {
        Self {
            column: column.into(),
            descending,
            null_ordering: NullOrdering::default_for_direction(descending),
        }
    }

    pub fn ascending(column: impl Into<String>) -> Self {
        Self::new(column, false)
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self::new(column, true)
    }

    pub fn with_null_ordering(mut self, null_ordering: NullOrdering) -> Self {
        self.null_ordering = null_ordering;
        self
    }
}

/// A sort key bound to a column position.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSortKey {
    pub column: ColumnRef,
    pub descending: bool,
    pub null_ordering: NullOrdering,
}

impl ResolvedSortKey {
    /// The declared column order that satisfies this key without sorting.
    pub fn required_order(&self) -> Order {
        if self.descending {
            Order::Descending
        } else {
            Order::Ascending
        }
    }
}

/// Whether the file already yields rows in the requested order.
///
/// Only a single key can be satisfied natively: a column that is merely
/// non-decreasing says nothing about ties on a second key.
pub fn is_native_order(schema: &Schema, keys: &[ResolvedSortKey]) -> bool {
    match keys {
        [] => true,
        [key] => schema.declared_order(key.column) == key.required_order(),
        _ => false,
    }
}

// ============================================================================
// ROW COMPARATOR - Compares two rows based on sort keys
// ============================================================================

pub struct RowComparator<'a> {
    sort_keys: &'a [ResolvedSortKey],
}

impl<'a> RowComparator<'a> {
    pub fn new(sort_keys: &'a [ResolvedSortKey]) -> Self {
        Self { sort_keys }
    }

    pub fn compare(&self, row1: &Row, row2: &Row) -> Ordering {
        for key in self.sort_keys {
            let ordering = compare_values(&row1.value(key.column), &row2.value(key.column), key);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// NULL placement is independent of direction; the direction only flips
/// the comparison of non-NULL values.
fn compare_values(value1: &Value, value2: &Value, key: &ResolvedSortKey) -> Ordering {
    match (value1.is_null(), value2.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => match key.null_ordering {
            NullOrdering::NullsFirst => Ordering::Less,
            NullOrdering::NullsLast => Ordering::Greater,
        },
        (false, true) => match key.null_ordering {
            NullOrdering::NullsFirst => Ordering::Greater,
            NullOrdering::NullsLast => Ordering::Less,
        },
        (false, false) => {
            let ordering = value1
                .compare(value2)
                .unwrap_or_else(|_| kind_rank(value1).cmp(&kind_rank(value2)));
            if key.descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

/// Fallback order for values of incomparable kinds (or NaN).
fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Boolean(_) => 1,
        Value::Integer(_) => 2,
        Value::Float(f) if f.is_nan() => 3,
        Value::Float(_) => 2,
        Value::Text(_) => 4,
    }
}

pub struct SortExecutor;

impl SortExecutor {
    /// Stable sort, so rows equal on every key keep file order.
    pub fn sort(rows: &mut [Row], sort_keys: &[ResolvedSortKey]) {
        if rows.is_empty() || sort_keys.is_empty() {
            return;
        }

        let comparator = RowComparator::new(sort_keys);
        rows.sort_by(|row1, row2| comparator.compare(row1, row2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, DataType};
    use std::sync::Arc;

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::new(
            vec![
                Column::new("category", DataType::Text),
                Column::new("value", DataType::Integer).with_order(Order::Descending),
            ],
            0,
            "rowid",
        ))
    }

    fn key(idx: usize, descending: bool) -> ResolvedSortKey {
        ResolvedSortKey {
            column: ColumnRef::Index(idx),
            descending,
            null_ordering: NullOrdering::default_for_direction(descending),
        }
    }

    fn row(id: usize, category: Value, value: Value) -> Row {
        Row::new(id, vec![category, value], schema())
    }

    #[test]
    fn test_null_ordering_defaults() {
        assert_eq!(NullOrdering::default_for_direction(false), NullOrdering::NullsLast);
        assert_eq!(NullOrdering::default_for_direction(true), NullOrdering::NullsFirst);
    }

    #[test]
    fn test_native_order() {
        let schema = schema();
        assert!(is_native_order(&schema, &[]));
        assert!(is_native_order(&schema, &[key(1, true)]));
        assert!(!is_native_order(&schema, &[key(1, false)]));
        assert!(!is_native_order(&schema, &[key(0, false)]));
        assert!(!is_native_order(&schema, &[key(1, true), key(0, false)]));

        let by_row_id = ResolvedSortKey {
            column: ColumnRef::RowId,
            descending: false,
            null_ordering: NullOrdering::NullsLast,
        };
        assert!(is_native_order(&schema, &[by_row_id]));
    }

    #[test]
    fn test_null_placement() {
        let null_row = row(0, Value::Null, Value::Null);
        let value_row = row(1, Value::Null, Value::Integer(1));

        let asc = [key(1, false)];
        assert_eq!(RowComparator::new(&asc).compare(&null_row, &value_row), Ordering::Greater);

        let desc = [key(1, true)];
        assert_eq!(RowComparator::new(&desc).compare(&null_row, &value_row), Ordering::Less);
    }

    #[test]
    fn test_multi_column_sort_is_stable() {
        let mut rows = vec![
            row(0, Value::from("b"), Value::Integer(1)),
            row(1, Value::from("a"), Value::Integer(1)),
            row(2, Value::from("a"), Value::Integer(2)),
            row(3, Value::from("b"), Value::Integer(1)),
        ];

        SortExecutor::sort(&mut rows, &[key(0, false), key(1, true)]);

        let ids: Vec<usize> = rows.iter().map(Row::row_id).collect();
        assert_eq!(ids, vec![2, 1, 0, 3]);
    }
}
