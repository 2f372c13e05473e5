use super::RowIdTracker;
use crate::core::{Result, Row, Schema};
use crate::json::{JsonLinesReader, JsonToValueConverter, LinePolicy};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

/// Rows of one scan: records read in file order, tagged with their
/// identifier and projected onto the schema. The underlying reader is owned
/// by the stream and closed when it is dropped.
pub struct RowStream<R> {
    records: RowIdTracker<JsonLinesReader<R>>,
    schema: Arc<Schema>,
    finished: bool,
}

impl RowStream<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>, schema: Arc<Schema>, policy: LinePolicy) -> Result<Self> {
        let reader = JsonLinesReader::open(path, policy)?;
        Ok(Self::new(reader, schema))
    }
}

impl<R: BufRead> RowStream<R> {
    pub fn new(reader: JsonLinesReader<R>, schema: Arc<Schema>) -> Self {
        let expected = schema.row_count();
        Self {
            records: RowIdTracker::new(reader, expected),
            schema,
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for RowStream<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let item = self.records.next()?.and_then(|(row_id, record)| {
            let values = JsonToValueConverter::project(&record, &self.schema)?;
            Ok(Row::new(row_id, values, Arc::clone(&self.schema)))
        });

        if item.is_err() {
            self.finished = true;
        }
        Some(item)
    }
}
