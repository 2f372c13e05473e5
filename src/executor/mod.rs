pub mod scan;
pub mod sort;

pub use scan::{Scan, ScanPlan, evaluate};
pub use sort::{NullOrdering, SortKey};
