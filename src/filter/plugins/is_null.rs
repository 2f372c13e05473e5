use super::FilterEvaluator;
use crate::core::{FilterKind, Value};
use crate::filter::Filter;

/// Missing fields are projected as NULL, so both are caught here.
pub struct IsNullEvaluator;

impl FilterEvaluator for IsNullEvaluator {
    fn name(&self) -> &'static str {
        "IS_NULL"
    }

    fn kinds(&self) -> &'static [FilterKind] {
        &[FilterKind::IsNull, FilterKind::IsNotNull]
    }

    fn matches(&self, filter: &Filter, value: &Value) -> bool {
        let is_null = value.is_null();
        match filter {
            Filter::IsNull => is_null,
            Filter::IsNotNull => !is_null,
            _ => unreachable!("IsNullEvaluator called with wrong filter"),
        }
    }
}
