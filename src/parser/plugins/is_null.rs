use super::{BoundsBuilder, PredicateConverter, PushdownPlugin};
use crate::core::Result;
use crate::filter::Filter;
use sqlparser::ast as sql_ast;

pub struct IsNullPlugin;

impl PushdownPlugin for IsNullPlugin {
    fn name(&self) -> &'static str {
        "IS NULL"
    }

    fn can_handle(&self, expr: &sql_ast::Expr) -> bool {
        matches!(expr, sql_ast::Expr::IsNull(_) | sql_ast::Expr::IsNotNull(_))
    }

    fn push(
        &self,
        expr: sql_ast::Expr,
        _converter: &PredicateConverter,
        bounds: &mut BoundsBuilder,
    ) -> Result<()> {
        match expr {
            sql_ast::Expr::IsNull(inner) => {
                bounds.add(PredicateConverter::expect_column(&inner)?, Filter::IsNull)
            }
            sql_ast::Expr::IsNotNull(inner) => {
                bounds.add(PredicateConverter::expect_column(&inner)?, Filter::IsNotNull)
            }
            _ => unreachable!("IsNullPlugin called with non-IS NULL expression"),
        }
    }
}
