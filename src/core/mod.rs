pub mod error;
pub mod types;
pub mod value;

pub use error::{JsonlError, Result};
pub use types::{Column, ColumnRef, FilterKind, Order, Row, Schema};
pub use value::{DataType, Value};
