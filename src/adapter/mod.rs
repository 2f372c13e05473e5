//! Adapter facade
//!
//! The seam between a SQL engine and a data source: the engine asks for the
//! columns once, then pulls rows with filters, order and paging pushed down.

pub mod config;
mod jsonl;

pub use config::{AdapterConfig, DEFAULT_ROW_ID_COLUMN};
pub use jsonl::{JsonlFile, JsonlScan};

use crate::core::{Result, Row, Schema};
use crate::executor::SortKey;
use crate::filter::Bounds;

/// A read-only tabular data source the engine can push queries down to.
pub trait Adapter {
    /// Whether the adapter is safe to expose to untrusted SQL.
    const SAFE: bool;
    const SUPPORTS_LIMIT: bool;
    const SUPPORTS_OFFSET: bool;

    type Scan: Iterator<Item = Result<Row>>;

    /// Column definitions; stable for the lifetime of the adapter.
    fn get_columns(&self) -> &Schema;

    /// Rows satisfying every bound, in the requested order where possible.
    fn get_data(
        &self,
        bounds: &Bounds,
        order: &[SortKey],
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Self::Scan>;
}
