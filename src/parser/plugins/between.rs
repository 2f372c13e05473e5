use super::{BoundsBuilder, PredicateConverter, PushdownPlugin};
use crate::core::{JsonlError, Result};
use crate::filter::{Filter, Range};
use sqlparser::ast as sql_ast;

/// `col BETWEEN low AND high` is an inclusive range on both ends.
pub struct BetweenPlugin;

impl PushdownPlugin for BetweenPlugin {
    fn name(&self) -> &'static str {
        "BETWEEN"
    }

    fn can_handle(&self, expr: &sql_ast::Expr) -> bool {
        matches!(expr, sql_ast::Expr::Between { .. })
    }

    fn push(
        &self,
        expr: sql_ast::Expr,
        converter: &PredicateConverter,
        bounds: &mut BoundsBuilder,
    ) -> Result<()> {
        match expr {
            sql_ast::Expr::Between {
                expr,
                negated,
                low,
                high,
            } => {
                if negated {
                    return Err(JsonlError::UnsupportedOperation(
                        "NOT BETWEEN cannot be pushed down".into(),
                    ));
                }

                let column = PredicateConverter::expect_column(&expr)?;
                let low = converter.literal(&low)?;
                let high = converter.literal(&high)?;

                let filter = if low.is_null() || high.is_null() {
                    Filter::Impossible
                } else {
                    Filter::Range(Range::new(Some(low), Some(high), true, true))
                };
                bounds.add(column, filter)
            }
            _ => unreachable!("BetweenPlugin called with non-BETWEEN expression"),
        }
    }
}
