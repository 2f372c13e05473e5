use crate::json::JsonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsonlError {
    #[error("The file has no rows")]
    NoData,

    #[error("Row count changed: expected {expected} rows, read {actual}")]
    RowCountChanged { expected: usize, actual: usize },

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error(transparent)]
    Json(#[from] JsonError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JsonlError>;
