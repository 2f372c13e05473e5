//! JSON-specific error types
//!
//! Errors raised while decoding JSON Lines records, carrying the 1-based
//! line number of the offending record.

use thiserror::Error;

pub type JsonResult<T> = Result<T, JsonError>;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("JSON parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid record at line {line}: {message}")]
    InvalidStructure { line: usize, message: String },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
}
