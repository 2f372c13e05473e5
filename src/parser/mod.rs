//! SQL front door
//!
//! Lowers a single-table `SELECT` into the bounds, order, limit and offset
//! an [`Adapter`](crate::Adapter) scan accepts.

pub mod adapter;
pub mod ast;
pub mod plugins;

pub use adapter::SqlScanParser;
pub use ast::ScanQuery;
pub use plugins::{BoundsBuilder, PredicateConverter, PushdownPlugin, PushdownPluginRegistry};
