mod comparison;
mod is_null;
mod range;

pub use comparison::ComparisonEvaluator;
pub use is_null::IsNullEvaluator;
pub use range::RangeEvaluator;

use super::Filter;
use crate::core::{FilterKind, Value};
use tracing::trace;

/// Evaluates one family of pushdown filters against a column value.
pub trait FilterEvaluator: Send + Sync {
    /// Plugin name for debugging
    fn name(&self) -> &'static str;

    /// Filter kinds this plugin handles
    fn kinds(&self) -> &'static [FilterKind];

    fn can_evaluate(&self, filter: &Filter) -> bool {
        filter
            .kind()
            .is_some_and(|kind| self.kinds().contains(&kind))
    }

    /// Whether `value` satisfies `filter`. Only called when `can_evaluate` holds.
    fn matches(&self, filter: &Filter, value: &Value) -> bool;
}

pub struct FilterRegistry {
    evaluators: Vec<Box<dyn FilterEvaluator>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self {
            evaluators: Vec::new(),
        }
    }

    pub fn register(&mut self, evaluator: Box<dyn FilterEvaluator>) {
        trace!(plugin = evaluator.name(), "Registered filter evaluator");
        self.evaluators.push(evaluator);
    }

    pub fn with_default_plugins() -> Self {
        let mut registry = Self::new();

        registry.register(Box::new(RangeEvaluator));
        registry.register(Box::new(ComparisonEvaluator));
        registry.register(Box::new(IsNullEvaluator));

        registry
    }

    pub fn find_evaluator(&self, filter: &Filter) -> Option<&dyn FilterEvaluator> {
        self.evaluators
            .iter()
            .find(|evaluator| evaluator.can_evaluate(filter))
            .map(|boxed| &**boxed)
    }

    /// Filter kinds covered by the registered plugins, in registration order.
    pub fn supported_kinds(&self) -> Vec<FilterKind> {
        self.evaluators
            .iter()
            .flat_map(|evaluator| evaluator.kinds().iter().copied())
            .collect()
    }

    /// A filter no plugin understands (including `Impossible`) matches nothing.
    pub fn matches(&self, filter: &Filter, value: &Value) -> bool {
        self.find_evaluator(filter)
            .is_some_and(|evaluator| evaluator.matches(filter, value))
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_default_plugins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Range;
    use crate::json::SUPPORTED_FILTERS;

    #[test]
    fn test_default_plugins_cover_advertised_filters() {
        let registry = FilterRegistry::with_default_plugins();
        assert_eq!(registry.supported_kinds(), SUPPORTED_FILTERS);
    }

    #[test]
    fn test_dispatch() {
        let registry = FilterRegistry::default();

        assert!(registry.matches(&Filter::Equal(Value::Integer(1)), &Value::Float(1.0)));
        assert!(registry.matches(&Filter::Range(Range::greater_than(1)), &Value::Integer(2)));
        assert!(registry.matches(&Filter::IsNull, &Value::Null));
        assert!(!registry.matches(&Filter::Impossible, &Value::Integer(1)));
    }
}
