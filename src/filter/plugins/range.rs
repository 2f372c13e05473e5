use super::FilterEvaluator;
use crate::core::{FilterKind, Value};
use crate::filter::Filter;

pub struct RangeEvaluator;

impl FilterEvaluator for RangeEvaluator {
    fn name(&self) -> &'static str {
        "RANGE"
    }

    fn kinds(&self) -> &'static [FilterKind] {
        &[FilterKind::Range]
    }

    fn matches(&self, filter: &Filter, value: &Value) -> bool {
        let Filter::Range(range) = filter else {
            unreachable!();
        };

        range.contains(value)
    }
}
