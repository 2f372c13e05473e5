// ============================================================================
// jsonlinesdb Library
// ============================================================================

//! Line-delimited JSON files as read-only SQL tables.
//!
//! Opening a file infers its schema from every record; scans then push
//! filters, order, limit and offset down to a streaming file read.
//!
//! ```no_run
//! use jsonlinesdb::{Adapter, Bounds, Filter, JsonlFile, Range};
//!
//! # fn main() -> jsonlinesdb::Result<()> {
//! let table = JsonlFile::open("weather.jsonl")?;
//!
//! for column in table.get_columns().columns() {
//!     println!("{} {} {}", column.name, column.data_type, column.order);
//! }
//!
//! let bounds = Bounds::from([("index".to_string(), Filter::Range(Range::greater_than(11)))]);
//! for row in table.get_data(&bounds, &[], None, None)? {
//!     println!("{}", row?.to_json());
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod core;
pub mod executor;
pub mod filter;
pub mod json;
pub mod parser;
pub mod storage;

pub use adapter::{Adapter, AdapterConfig, JsonlFile, JsonlScan};
pub use core::{Column, DataType, FilterKind, JsonlError, Order, Result, Row, Schema, Value};
pub use executor::{NullOrdering, SortKey};
pub use filter::{Bounds, Filter, Range};
pub use json::LinePolicy;
pub use parser::{ScanQuery, SqlScanParser};
