use crate::executor::SortKey;
use crate::filter::Bounds;

/// A single-table query lowered to an adapter scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanQuery {
    /// Path of the JSON Lines file named in FROM
    pub table: String,
    /// Selected columns; `None` for `SELECT *`
    pub columns: Option<Vec<String>>,
    pub bounds: Bounds,
    pub order: Vec<SortKey>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ScanQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: None,
            bounds: Bounds::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.columns.is_none()
    }
}
