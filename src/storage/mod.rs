pub mod row_tracker;
pub mod source;

pub use row_tracker::RowIdTracker;
pub use source::RowStream;
