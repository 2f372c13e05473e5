//! JSON Lines Module
//!
//! Decoding and schema discovery for line-delimited JSON files.
//!
//! # Architecture
//!
//! - `reader.rs` - Line-by-line record iterator with a configurable line policy
//! - `converter.rs` - JSON to `Value` conversion and typed projection
//! - `schema_inference.rs` - Type inferencer and schema builder
//! - `error.rs` - Domain-specific errors

mod converter;
mod error;
mod reader;
mod schema_inference;

pub use converter::JsonToValueConverter;
pub use error::{JsonError, JsonResult};
pub use reader::{JsonLinesReader, LinePolicy, Record, parse_record};
pub use schema_inference::{SUPPORTED_FILTERS, SchemaBuilder, TypeInferencer};
