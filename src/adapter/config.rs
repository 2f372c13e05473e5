use crate::json::LinePolicy;
use serde::{Deserialize, Serialize};

/// Default name of the pseudo-column carrying row identifiers.
pub const DEFAULT_ROW_ID_COLUMN: &str = "rowid";

/// JSON Lines adapter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Name under which rows expose their identifier
    pub row_id_column: String,

    /// Handling of non-blank lines that are not JSON objects
    pub line_policy: LinePolicy,
}

impl AdapterConfig {
    pub fn new() -> Self {
        Self {
            row_id_column: DEFAULT_ROW_ID_COLUMN.to_string(),
            line_policy: LinePolicy::default(),
        }
    }

    /// Set the row identifier column name
    pub fn row_id_column(mut self, name: &str) -> Self {
        self.row_id_column = name.to_string();
        self
    }

    /// Set the policy for malformed lines
    pub fn line_policy(mut self, policy: LinePolicy) -> Self {
        self.line_policy = policy;
        self
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self::new()
    }
}
