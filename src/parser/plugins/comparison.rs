use super::{BoundsBuilder, PredicateConverter, PushdownPlugin};
use crate::core::{JsonlError, Result, Value};
use crate::filter::{Filter, Range};
use sqlparser::ast as sql_ast;
use sqlparser::ast::BinaryOperator as SqlOp;

/// `col <op> literal`, or the mirrored `literal <op> col`.
pub struct ComparisonPlugin;

impl ComparisonPlugin {
    fn is_comparison(op: &SqlOp) -> bool {
        matches!(
            op,
            SqlOp::Eq | SqlOp::NotEq | SqlOp::Lt | SqlOp::LtEq | SqlOp::Gt | SqlOp::GtEq
        )
    }

    /// `5 < col` is `col > 5`
    fn flip(op: SqlOp) -> SqlOp {
        match op {
            SqlOp::Lt => SqlOp::Gt,
            SqlOp::LtEq => SqlOp::GtEq,
            SqlOp::Gt => SqlOp::Lt,
            SqlOp::GtEq => SqlOp::LtEq,
            other => other,
        }
    }

    fn to_filter(op: &SqlOp, value: Value) -> Filter {
        // Comparisons against NULL are never true
        if value.is_null() {
            return Filter::Impossible;
        }

        match op {
            SqlOp::Eq => Filter::Equal(value),
            SqlOp::NotEq => Filter::NotEqual(value),
            SqlOp::Lt => Filter::Range(Range::less_than(value)),
            SqlOp::LtEq => Filter::Range(Range::at_most(value)),
            SqlOp::Gt => Filter::Range(Range::greater_than(value)),
            SqlOp::GtEq => Filter::Range(Range::at_least(value)),
            _ => unreachable!("not a comparison operator: {}", op),
        }
    }
}

impl PushdownPlugin for ComparisonPlugin {
    fn name(&self) -> &'static str {
        "COMPARISON"
    }

    fn can_handle(&self, expr: &sql_ast::Expr) -> bool {
        matches!(expr, sql_ast::Expr::BinaryOp { op, .. } if Self::is_comparison(op))
    }

    fn push(
        &self,
        expr: sql_ast::Expr,
        converter: &PredicateConverter,
        bounds: &mut BoundsBuilder,
    ) -> Result<()> {
        let sql_ast::Expr::BinaryOp { left, op, right } = expr else {
            unreachable!("ComparisonPlugin called with non-comparison expression");
        };

        let (column, op, literal) = match (
            PredicateConverter::column_name(&left),
            PredicateConverter::column_name(&right),
        ) {
            (Some(column), None) if PredicateConverter::is_literal(&right) => (column, op, right),
            (None, Some(column)) if PredicateConverter::is_literal(&left) => {
                (column, Self::flip(op), left)
            }
            _ => {
                return Err(JsonlError::UnsupportedOperation(format!(
                    "Comparison must be between a column and a literal: {} {} {}",
                    left, op, right
                )));
            }
        };

        let value = converter.literal(&literal)?;
        bounds.add(column, Self::to_filter(&op, value))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{JsonlError, Value};
    use crate::filter::{Filter, Range};
    use crate::parser::SqlScanParser;

    #[test]
    fn test_operators() {
        let parser = SqlScanParser::new();
        let cases = [
            ("a = 1", Filter::Equal(Value::Integer(1))),
            ("a <> 'x'", Filter::NotEqual(Value::from("x"))),
            ("a != true", Filter::NotEqual(Value::Boolean(true))),
            ("a < 1.5", Filter::Range(Range::less_than(1.5))),
            ("a <= -3", Filter::Range(Range::at_most(-3))),
            ("a > 11", Filter::Range(Range::greater_than(11))),
            ("a >= -0.5", Filter::Range(Range::at_least(-0.5))),
        ];

        for (sql, expected) in cases {
            let bounds = parser.parse_predicate(sql).unwrap();
            assert_eq!(bounds["a"], expected, "{}", sql);
        }
    }

    #[test]
    fn test_literal_on_left_is_flipped() {
        let bounds = SqlScanParser::new().parse_predicate("11 < a").unwrap();
        assert_eq!(bounds["a"], Filter::Range(Range::greater_than(11)));
    }

    #[test]
    fn test_null_comparison_is_impossible() {
        let bounds = SqlScanParser::new().parse_predicate("a = NULL").unwrap();
        assert_eq!(bounds["a"], Filter::Impossible);
    }

    #[test]
    fn test_column_to_column_rejected() {
        let result = SqlScanParser::new().parse_predicate("a = b");
        assert!(matches!(result, Err(JsonlError::UnsupportedOperation(_))));
    }

    #[test]
    fn test_contradiction_folds_to_impossible() {
        let bounds = SqlScanParser::new()
            .parse_predicate("a > 5 AND (a < 2)")
            .unwrap();
        assert_eq!(bounds["a"], Filter::Impossible);
    }
}
