use super::FilterEvaluator;
use crate::core::{FilterKind, Value};
use crate::filter::Filter;

/// `=` and `<>` with type-aware equality. NULL satisfies neither.
pub struct ComparisonEvaluator;

impl FilterEvaluator for ComparisonEvaluator {
    fn name(&self) -> &'static str {
        "COMPARISON"
    }

    fn kinds(&self) -> &'static [FilterKind] {
        &[FilterKind::Equal, FilterKind::NotEqual]
    }

    fn matches(&self, filter: &Filter, value: &Value) -> bool {
        if value.is_null() {
            return false;
        }

        match filter {
            Filter::Equal(expected) => value == expected,
            Filter::NotEqual(expected) => value != expected,
            _ => unreachable!("ComparisonEvaluator called with non-comparison filter"),
        }
    }
}
