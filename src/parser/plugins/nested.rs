use super::{BoundsBuilder, PredicateConverter, PushdownPlugin};
use crate::core::Result;
use sqlparser::ast as sql_ast;

pub struct NestedPlugin;

impl PushdownPlugin for NestedPlugin {
    fn name(&self) -> &'static str {
        "NESTED"
    }

    fn can_handle(&self, expr: &sql_ast::Expr) -> bool {
        matches!(expr, sql_ast::Expr::Nested(_))
    }

    fn push(
        &self,
        expr: sql_ast::Expr,
        converter: &PredicateConverter,
        bounds: &mut BoundsBuilder,
    ) -> Result<()> {
        match expr {
            sql_ast::Expr::Nested(inner) => converter.convert(*inner, bounds),
            _ => unreachable!("NestedPlugin called with non-nested expression"),
        }
    }
}
