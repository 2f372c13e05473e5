use super::{Adapter, AdapterConfig};
use crate::core::{Result, Schema};
use crate::executor::{Scan, ScanPlan, SortKey};
use crate::filter::{Bounds, FilterRegistry};
use crate::json::{JsonLinesReader, SchemaBuilder};
use crate::storage::RowStream;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub type JsonlScan = Scan<RowStream<BufReader<File>>>;

/// A JSON Lines file exposed as a read-only table.
///
/// Opening reads the whole file once to build the schema; every scan opens
/// the file again and streams it. Nothing is cached between calls.
pub struct JsonlFile {
    path: PathBuf,
    config: AdapterConfig,
    schema: Arc<Schema>,
    registry: Arc<FilterRegistry>,
}

impl JsonlFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, AdapterConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: AdapterConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        debug!(path = %path.display(), "Opening JSONL file to load metadata");
        let records = JsonLinesReader::open(&path, config.line_policy)?.collect::<Result<Vec<_>>>()?;

        let schema = SchemaBuilder::new(&config.row_id_column).build(&records)?;
        info!(
            path = %path.display(),
            rows = schema.row_count(),
            columns = schema.column_count(),
            "Read JSONL metadata"
        );

        Ok(Self {
            path,
            config,
            schema: Arc::new(schema),
            registry: Arc::new(FilterRegistry::with_default_plugins()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records seen when the file was opened.
    pub fn row_count(&self) -> usize {
        self.schema.row_count()
    }

    pub fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }
}

impl Adapter for JsonlFile {
    // Reads arbitrary paths from the local filesystem
    const SAFE: bool = false;
    const SUPPORTS_LIMIT: bool = true;
    const SUPPORTS_OFFSET: bool = true;

    type Scan = JsonlScan;

    fn get_columns(&self) -> &Schema {
        &self.schema
    }

    fn get_data(
        &self,
        bounds: &Bounds,
        order: &[SortKey],
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<JsonlScan> {
        let plan = ScanPlan::new(&self.schema, bounds, order, limit, offset)?;
        if plan.is_impossible() {
            debug!(path = %self.path.display(), "Impossible bound, skipping file read");
            return Ok(Scan::empty());
        }

        debug!(path = %self.path.display(), "Opening JSONL file to scan rows");
        let rows = RowStream::open(&self.path, Arc::clone(&self.schema), self.config.line_policy)?;
        Ok(plan.execute(rows, Arc::clone(&self.registry)))
    }
}
