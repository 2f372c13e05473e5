use super::{BoundsBuilder, PredicateConverter, PushdownPlugin};
use crate::core::Result;
use sqlparser::ast as sql_ast;

/// Conjunctions split into independent column filters. OR has no
/// per-column form and is left to the registry to reject.
pub struct AndPlugin;

impl PushdownPlugin for AndPlugin {
    fn name(&self) -> &'static str {
        "AND"
    }

    fn can_handle(&self, expr: &sql_ast::Expr) -> bool {
        matches!(
            expr,
            sql_ast::Expr::BinaryOp {
                op: sql_ast::BinaryOperator::And,
                ..
            }
        )
    }

    fn push(
        &self,
        expr: sql_ast::Expr,
        converter: &PredicateConverter,
        bounds: &mut BoundsBuilder,
    ) -> Result<()> {
        match expr {
            sql_ast::Expr::BinaryOp { left, right, .. } => {
                converter.convert(*left, bounds)?;
                converter.convert(*right, bounds)
            }
            _ => unreachable!("AndPlugin called with non-AND expression"),
        }
    }
}
