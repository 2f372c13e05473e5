// ============================================================================
// src/executor/scan.rs - Filter / sort / limit pipeline
// ============================================================================
//
// A scan is resolved against the schema once (ScanPlan) and then runs as a
// lazy, single-pass iterator over a row stream (Scan):
//
//   rows -> filter (AND of all bounds) -> [sort] -> offset -> limit
//
// ============================================================================

use super::sort::{ResolvedSortKey, SortExecutor, SortKey, is_native_order};
use crate::core::{ColumnRef, JsonlError, Result, Row, Schema};
use crate::filter::{Bounds, Filter, FilterRegistry};
use std::sync::Arc;
use tracing::debug;

/// Bounds, order and paging of one scan, resolved against the schema.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    filters: Vec<(ColumnRef, Filter)>,
    impossible: bool,
    sort_keys: Vec<ResolvedSortKey>,
    materialize: bool,
    limit: Option<usize>,
    offset: usize,
}

impl ScanPlan {
    pub fn new(
        schema: &Schema,
        bounds: &Bounds,
        order: &[SortKey],
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Self> {
        let mut filters = Vec::with_capacity(bounds.len());
        for (name, filter) in bounds {
            let column = schema
                .resolve(name)
                .ok_or_else(|| JsonlError::ColumnNotFound(name.clone()))?;

            if let (Some(kind), ColumnRef::Index(idx)) = (filter.kind(), column)
                && !schema.columns()[idx].supports(kind)
            {
                return Err(JsonlError::UnsupportedOperation(format!(
                    "Column '{}' does not support {:?} filters",
                    name, kind
                )));
            }

            filters.push((column, filter.clone()));
        }

        let sort_keys = order
            .iter()
            .map(|key| {
                let column = schema
                    .resolve(&key.column)
                    .ok_or_else(|| JsonlError::ColumnNotFound(key.column.clone()))?;
                Ok(ResolvedSortKey {
                    column,
                    descending: key.descending,
                    null_ordering: key.null_ordering,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let materialize = !is_native_order(schema, &sort_keys);
        if materialize {
            debug!(keys = sort_keys.len(), "Requested order is not native, sorting in memory");
        }

        Ok(Self {
            impossible: filters.iter().any(|(_, filter)| filter.is_impossible()),
            filters,
            sort_keys,
            materialize,
            limit,
            offset: offset.unwrap_or(0),
        })
    }

    /// An `Impossible` bound makes the whole scan empty.
    pub fn is_impossible(&self) -> bool {
        self.impossible
    }

    /// Whether rows must be buffered and sorted before paging.
    pub fn needs_sort(&self) -> bool {
        self.materialize
    }

    pub fn execute<I>(self, rows: I, registry: Arc<FilterRegistry>) -> Scan<I>
    where
        I: Iterator<Item = Result<Row>>,
    {
        let source = if self.impossible {
            Source::Exhausted
        } else {
            Source::Streaming(rows)
        };

        Scan {
            source,
            filters: self.filters,
            registry,
            pending_sort: self.materialize.then_some(self.sort_keys),
            skip: self.offset,
            remaining: self.limit,
        }
    }
}

/// Filter, order and page a row stream.
pub fn evaluate<I>(
    rows: I,
    schema: &Schema,
    bounds: &Bounds,
    order: &[SortKey],
    limit: Option<usize>,
    offset: Option<usize>,
    registry: Arc<FilterRegistry>,
) -> Result<Scan<I>>
where
    I: Iterator<Item = Result<Row>>,
{
    Ok(ScanPlan::new(schema, bounds, order, limit, offset)?.execute(rows, registry))
}

enum Source<I> {
    Streaming(I),
    Sorted(std::vec::IntoIter<Row>),
    Exhausted,
}

/// Lazy result of a scan. Finite and not restartable; the row source (and the
/// file behind it) is released as soon as the scan is exhausted, hits its
/// limit, fails, or is dropped.
pub struct Scan<I> {
    source: Source<I>,
    filters: Vec<(ColumnRef, Filter)>,
    registry: Arc<FilterRegistry>,
    pending_sort: Option<Vec<ResolvedSortKey>>,
    skip: usize,
    remaining: Option<usize>,
}

impl<I> Scan<I>
where
    I: Iterator<Item = Result<Row>>,
{
    /// A scan that yields nothing.
    pub fn empty() -> Self {
        Self {
            source: Source::Exhausted,
            filters: Vec::new(),
            registry: Arc::new(FilterRegistry::new()),
            pending_sort: None,
            skip: 0,
            remaining: None,
        }
    }

    fn next_filtered(&mut self) -> Option<Result<Row>> {
        match &mut self.source {
            Source::Streaming(rows) => loop {
                match rows.next()? {
                    Ok(row) if matches_all(&self.filters, &self.registry, &row) => {
                        return Some(Ok(row));
                    }
                    Ok(_) => continue,
                    Err(err) => return Some(Err(err)),
                }
            },
            Source::Sorted(rows) => rows.next().map(Ok),
            Source::Exhausted => None,
        }
    }

    fn materialize(&mut self, sort_keys: &[ResolvedSortKey]) -> Result<()> {
        let mut rows = Vec::new();
        while let Some(item) = self.next_filtered() {
            rows.push(item?);
        }

        SortExecutor::sort(&mut rows, sort_keys);
        self.source = Source::Sorted(rows.into_iter());
        Ok(())
    }
}

fn matches_all(filters: &[(ColumnRef, Filter)], registry: &FilterRegistry, row: &Row) -> bool {
    filters
        .iter()
        .all(|(column, filter)| registry.matches(filter, &row.value(*column)))
}

impl<I> Iterator for Scan<I>
where
    I: Iterator<Item = Result<Row>>,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            self.source = Source::Exhausted;
            return None;
        }

        if let Some(sort_keys) = self.pending_sort.take()
            && let Err(err) = self.materialize(&sort_keys)
        {
            self.source = Source::Exhausted;
            return Some(Err(err));
        }

        loop {
            match self.next_filtered() {
                None => {
                    self.source = Source::Exhausted;
                    return None;
                }
                Some(Err(err)) => {
                    self.source = Source::Exhausted;
                    return Some(Err(err));
                }
                Some(Ok(_)) if self.skip > 0 => self.skip -= 1,
                Some(Ok(row)) => {
                    if let Some(remaining) = self.remaining.as_mut() {
                        *remaining -= 1;
                        if *remaining == 0 {
                            self.source = Source::Exhausted;
                        }
                    }
                    return Some(Ok(row));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, DataType, Order, Value};
    use crate::filter::Range;
    use crate::json::SUPPORTED_FILTERS;
    use std::cell::Cell;
    use std::rc::Rc;

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::new(
            vec![
                Column::new("n", DataType::Integer)
                    .with_order(Order::Ascending)
                    .with_filters(SUPPORTED_FILTERS)
                    .exact(),
                Column::new("tag", DataType::Text)
                    .with_filters(SUPPORTED_FILTERS)
                    .exact(),
            ],
            5,
            "rowid",
        ))
    }

    fn rows(schema: &Arc<Schema>) -> Vec<Result<Row>> {
        let tags = ["b", "a", "c", "a", "b"];
        (0..5)
            .map(|i| {
                Ok(Row::new(
                    i,
                    vec![Value::Integer(i as i64 * 10), Value::from(tags[i])],
                    Arc::clone(schema),
                ))
            })
            .collect()
    }

    fn run(bounds: Bounds, order: &[SortKey], limit: Option<usize>, offset: Option<usize>) -> Vec<usize> {
        let schema = schema();
        evaluate(
            rows(&schema).into_iter(),
            &schema,
            &bounds,
            order,
            limit,
            offset,
            Arc::new(FilterRegistry::default()),
        )
        .unwrap()
        .map(|row| row.unwrap().row_id())
        .collect()
    }

    #[test]
    fn test_no_bounds_returns_everything() {
        assert_eq!(run(Bounds::new(), &[], None, None), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_bounds_are_conjunctive() {
        let bounds = Bounds::from([
            ("n".to_string(), Filter::Range(Range::at_least(10))),
            ("tag".to_string(), Filter::Equal(Value::from("a"))),
        ]);
        assert_eq!(run(bounds, &[], None, None), vec![1, 3]);
    }

    #[test]
    fn test_impossible_wins() {
        let bounds = Bounds::from([
            ("n".to_string(), Filter::Impossible),
            ("tag".to_string(), Filter::IsNotNull),
        ]);
        assert!(run(bounds, &[], None, None).is_empty());
    }

    #[test]
    fn test_offset_and_limit_apply_after_filtering() {
        let bounds = Bounds::from([("tag".to_string(), Filter::NotEqual(Value::from("c")))]);

        assert_eq!(run(bounds.clone(), &[], Some(2), Some(1)), vec![1, 3]);
        assert_eq!(run(bounds.clone(), &[], None, Some(3)), vec![4]);
        assert_eq!(run(bounds.clone(), &[], Some(0), None), Vec::<usize>::new());
        assert_eq!(run(bounds, &[], Some(10), Some(10)), Vec::<usize>::new());
    }

    #[test]
    fn test_row_id_is_filterable() {
        let bounds = Bounds::from([("rowid".to_string(), Filter::Range(Range::greater_than(2)))]);
        assert_eq!(run(bounds, &[], None, None), vec![3, 4]);
    }

    #[test]
    fn test_non_native_order_is_sorted() {
        let order = [SortKey::ascending("tag")];
        assert_eq!(run(Bounds::new(), &order, None, None), vec![1, 3, 0, 4, 2]);

        let order = [SortKey::descending("n")];
        assert_eq!(run(Bounds::new(), &order, Some(2), Some(1)), vec![3, 2]);
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let schema = schema();
        let bounds = Bounds::from([("missing".to_string(), Filter::IsNull)]);
        let err = ScanPlan::new(&schema, &bounds, &[], None, None).unwrap_err();
        assert!(matches!(err, JsonlError::ColumnNotFound(name) if name == "missing"));

        let err = ScanPlan::new(&schema, &Bounds::new(), &[SortKey::ascending("nope")], None, None)
            .unwrap_err();
        assert!(matches!(err, JsonlError::ColumnNotFound(_)));
    }

    #[test]
    fn test_unadvertised_filter_is_rejected() {
        let schema = Schema::new(vec![Column::new("n", DataType::Integer)], 0, "rowid");
        let bounds = Bounds::from([("n".to_string(), Filter::Range(Range::greater_than(1)))]);

        let err = ScanPlan::new(&schema, &bounds, &[], None, None).unwrap_err();
        assert!(matches!(err, JsonlError::UnsupportedOperation(_)));
    }

    #[test]
    fn test_native_order_streams() {
        let schema = schema();
        let plan = ScanPlan::new(&schema, &Bounds::new(), &[SortKey::ascending("n")], None, None)
            .unwrap();
        assert!(!plan.needs_sort());
    }

    #[test]
    fn test_limit_stops_pulling() {
        let schema = schema();
        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let source = rows(&schema).into_iter().inspect(move |_| counter.set(counter.get() + 1));

        let scan = evaluate(
            source,
            &schema,
            &Bounds::new(),
            &[],
            Some(2),
            None,
            Arc::new(FilterRegistry::default()),
        )
        .unwrap();

        assert_eq!(scan.count(), 2);
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn test_errors_end_the_scan() {
        let schema = schema();
        let mut source = rows(&schema);
        source.insert(2, Err(JsonlError::RowCountChanged { expected: 5, actual: 2 }));

        let items: Vec<Result<Row>> = evaluate(
            source.into_iter(),
            &schema,
            &Bounds::new(),
            &[],
            None,
            Some(1),
            Arc::new(FilterRegistry::default()),
        )
        .unwrap()
        .collect();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().row_id(), 1);
        assert!(items[1].is_err());
    }

    #[test]
    fn test_errors_surface_from_sorting() {
        let schema = schema();
        let mut source = rows(&schema);
        source.push(Err(JsonlError::RowCountChanged { expected: 6, actual: 5 }));

        let mut scan = evaluate(
            source.into_iter(),
            &schema,
            &Bounds::new(),
            &[SortKey::ascending("tag")],
            None,
            None,
            Arc::new(FilterRegistry::default()),
        )
        .unwrap();

        assert!(matches!(scan.next(), Some(Err(JsonlError::RowCountChanged { .. }))));
        assert!(scan.next().is_none());
    }
}
