//! Pushdown predicates
//!
//! A [`Filter`] is the declarative predicate the engine hands to the adapter
//! for one column; [`Bounds`] maps column names to filters and is always
//! evaluated as a conjunction.

pub mod plugins;

use crate::core::{FilterKind, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

pub use plugins::{FilterEvaluator, FilterRegistry};

/// Column name to predicate; all entries must hold for a row to survive.
pub type Bounds = HashMap<String, Filter>;

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Never satisfiable; the whole scan yields nothing.
    Impossible,
    Equal(Value),
    NotEqual(Value),
    Range(Range),
    IsNull,
    IsNotNull,
}

/// A range with independently optional, inclusive or exclusive endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub start: Option<Value>,
    pub end: Option<Value>,
    pub include_start: bool,
    pub include_end: bool,
}

impl Range {
    pub fn new(
        start: Option<Value>,
        end: Option<Value>,
        include_start: bool,
        include_end: bool,
    ) -> Self {
        Self {
            start,
            end,
            include_start,
            include_end,
        }
    }

    pub fn greater_than(value: impl Into<Value>) -> Self {
        Self::new(Some(value.into()), None, false, false)
    }

    pub fn at_least(value: impl Into<Value>) -> Self {
        Self::new(Some(value.into()), None, true, false)
    }

    pub fn less_than(value: impl Into<Value>) -> Self {
        Self::new(None, Some(value.into()), false, false)
    }

    pub fn at_most(value: impl Into<Value>) -> Self {
        Self::new(None, Some(value.into()), false, true)
    }

    /// NULL and values not comparable with an endpoint are outside every range.
    pub fn contains(&self, value: &Value) -> bool {
        if value.is_null() {
            return false;
        }

        let above_start = match &self.start {
            None => true,
            Some(start) => match value.compare(start) {
                Ok(Ordering::Greater) => true,
                Ok(Ordering::Equal) => self.include_start,
                Ok(Ordering::Less) | Err(_) => false,
            },
        };

        above_start
            && match &self.end {
                None => true,
                Some(end) => match value.compare(end) {
                    Ok(Ordering::Less) => true,
                    Ok(Ordering::Equal) => self.include_end,
                    Ok(Ordering::Greater) | Err(_) => false,
                },
            }
    }

    /// Intersection of two ranges; `None` when the endpoints are not comparable.
    pub fn intersect(&self, other: &Range) -> Option<Filter> {
        let (start, include_start) = tighter(
            (&self.start, self.include_start),
            (&other.start, other.include_start),
            Ordering::Greater,
        )?;
        let (end, include_end) = tighter(
            (&self.end, self.include_end),
            (&other.end, other.include_end),
            Ordering::Less,
        )?;

        if let (Some(lo), Some(hi)) = (&start, &end) {
            match lo.compare(hi).ok()? {
                Ordering::Greater => return Some(Filter::Impossible),
                Ordering::Equal if include_start && include_end => {
                    return Some(Filter::Equal(lo.clone()));
                }
                Ordering::Equal => return Some(Filter::Impossible),
                Ordering::Less => {}
            }
        }

        Some(Filter::Range(Range::new(start, end, include_start, include_end)))
    }
}

/// Pick the more restrictive of two endpoints. `wins` is the ordering that
/// makes the first endpoint tighter (Greater for lower bounds).
fn tighter(
    a: (&Option<Value>, bool),
    b: (&Option<Value>, bool),
    wins: Ordering,
) -> Option<(Option<Value>, bool)> {
    match (a.0, b.0) {
        (None, None) => Some((None, false)),
        (Some(v), None) => Some((Some(v.clone()), a.1)),
        (None, Some(v)) => Some((Some(v.clone()), b.1)),
        (Some(x), Some(y)) => {
            let ordering = x.compare(y).ok()?;
            if ordering == Ordering::Equal {
                Some((Some(x.clone()), a.1 && b.1))
            } else if ordering == wins {
                Some((Some(x.clone()), a.1))
            } else {
                Some((Some(y.clone()), b.1))
            }
        }
    }
}

impl Filter {
    pub fn kind(&self) -> Option<FilterKind> {
        match self {
            Self::Impossible => None,
            Self::Equal(_) => Some(FilterKind::Equal),
            Self::NotEqual(_) => Some(FilterKind::NotEqual),
            Self::Range(_) => Some(FilterKind::Range),
            Self::IsNull => Some(FilterKind::IsNull),
            Self::IsNotNull => Some(FilterKind::IsNotNull),
        }
    }

    pub fn is_impossible(&self) -> bool {
        matches!(self, Self::Impossible)
    }

    /// Fold two predicates on the same column into one.
    ///
    /// Returns `None` when the conjunction has no single-filter form, such as
    /// two `NotEqual` on different values.
    pub fn combine(self, other: Filter) -> Option<Filter> {
        match (self, other) {
            (Filter::Impossible, _) | (_, Filter::Impossible) => Some(Filter::Impossible),

            (Filter::IsNull, Filter::IsNull) => Some(Filter::IsNull),
            (Filter::IsNotNull, Filter::IsNotNull) => Some(Filter::IsNotNull),
            (Filter::IsNull, _) | (_, Filter::IsNull) => Some(Filter::Impossible),
            (Filter::IsNotNull, other) | (other, Filter::IsNotNull) => Some(other),

            (Filter::Equal(a), Filter::Equal(b)) => Some(if a == b { Filter::Equal(a) } else { Filter::Impossible }),
            (Filter::Equal(a), Filter::NotEqual(b)) | (Filter::NotEqual(b), Filter::Equal(a)) => {
                Some(if a == b { Filter::Impossible } else { Filter::Equal(a) })
            }
            (Filter::Equal(a), Filter::Range(range)) | (Filter::Range(range), Filter::Equal(a)) => {
                Some(if range.contains(&a) { Filter::Equal(a) } else { Filter::Impossible })
            }

            (Filter::Range(a), Filter::Range(b)) => a.intersect(&b),

            (Filter::NotEqual(a), Filter::NotEqual(b)) if a == b => Some(Filter::NotEqual(a)),
            (Filter::NotEqual(a), Filter::Range(range)) | (Filter::Range(range), Filter::NotEqual(a)) => {
                // An excluded value outside the range is already excluded
                if range.contains(&a) {
                    None
                } else {
                    Some(Filter::Range(range))
                }
            }
            (Filter::NotEqual(_), Filter::NotEqual(_)) => None,
        }
    }
}
