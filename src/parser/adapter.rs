// ============================================================================
// src/parser/adapter.rs - sqlparser front door for JSON Lines scans
// ============================================================================

use super::ast::ScanQuery;
use super::plugins::{BoundsBuilder, PredicateConverter};
use crate::core::{JsonlError, Result};
use crate::executor::{NullOrdering, SortKey};
use crate::filter::Bounds;
use sqlparser::ast as sql_ast;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

/// Parses `SELECT ... FROM "<file>" [WHERE ...] [ORDER BY ...] [LIMIT n] [OFFSET m]`
/// into a [`ScanQuery`] whose WHERE clause is fully pushed down.
pub struct SqlScanParser {
    dialect: PostgreSqlDialect,
    converter: PredicateConverter,
}

impl SqlScanParser {
    pub fn new() -> Self {
        Self {
            dialect: PostgreSqlDialect {},
            converter: PredicateConverter::new(),
        }
    }

    pub fn parse(&self, sql: &str) -> Result<ScanQuery> {
        let mut statements = Parser::parse_sql(&self.dialect, sql)
            .map_err(|e| JsonlError::ParseError(e.to_string()))?;

        if statements.len() != 1 {
            return Err(JsonlError::UnsupportedOperation(format!(
                "Expected exactly one statement, got {}",
                statements.len()
            )));
        }

        match statements.remove(0) {
            sql_ast::Statement::Query(query) => self.convert_query(*query),
            other => Err(JsonlError::UnsupportedOperation(format!(
                "Only SELECT is supported, got: {}",
                other
            ))),
        }
    }

    /// Lower a bare predicate, such as the body of a WHERE clause.
    pub fn parse_predicate(&self, sql: &str) -> Result<Bounds> {
        let expr = Parser::new(&self.dialect)
            .try_with_sql(sql)
            .and_then(|mut parser| parser.parse_expr())
            .map_err(|e| JsonlError::ParseError(e.to_string()))?;

        let mut bounds = BoundsBuilder::new();
        self.converter.convert(expr, &mut bounds)?;
        Ok(bounds.build())
    }

    fn convert_query(&self, query: sql_ast::Query) -> Result<ScanQuery> {
        let select = match *query.body {
            sql_ast::SetExpr::Select(select) => select,
            other => {
                return Err(JsonlError::UnsupportedOperation(format!(
                    "Only simple SELECT is supported, got: {}",
                    other
                )));
            }
        };

        if select.distinct.is_some() || select.having.is_some() {
            return Err(JsonlError::UnsupportedOperation(
                "DISTINCT and HAVING are not supported".into(),
            ));
        }
        if !matches!(&select.group_by, sql_ast::GroupByExpr::Expressions(exprs, _) if exprs.is_empty())
        {
            return Err(JsonlError::UnsupportedOperation("GROUP BY is not supported".into()));
        }

        let mut scan = ScanQuery::new(self.convert_from(&select.from)?);
        scan.columns = self.convert_projection(select.projection)?;

        if let Some(selection) = select.selection {
            let mut bounds = BoundsBuilder::new();
            self.converter.convert(selection, &mut bounds)?;
            scan.bounds = bounds.build();
        }

        scan.order = self.convert_order_by(query.order_by)?;
        (scan.limit, scan.offset) = self.convert_limit_clause(query.limit_clause)?;

        Ok(scan)
    }

    fn convert_from(&self, from: &[sql_ast::TableWithJoins]) -> Result<String> {
        let [table] = from else {
            return Err(JsonlError::UnsupportedOperation(
                "Exactly one table is required in FROM".into(),
            ));
        };

        if !table.joins.is_empty() {
            return Err(JsonlError::UnsupportedOperation("JOIN is not supported".into()));
        }

        match &table.relation {
            sql_ast::TableFactor::Table { name, .. } => extract_table_name(name),
            other => Err(JsonlError::UnsupportedOperation(format!(
                "Unsupported table reference: {}",
                other
            ))),
        }
    }

    fn convert_projection(&self, projection: Vec<sql_ast::SelectItem>) -> Result<Option<Vec<String>>> {
        if matches!(projection.as_slice(), [sql_ast::SelectItem::Wildcard(_)]) {
            return Ok(None);
        }

        projection
            .into_iter()
            .map(|item| match item {
                sql_ast::SelectItem::UnnamedExpr(expr) => PredicateConverter::column_name(&expr)
                    .ok_or_else(|| {
                        JsonlError::UnsupportedOperation(format!(
                            "Only column references can be selected, got: {}",
                            expr
                        ))
                    }),
                other => Err(JsonlError::UnsupportedOperation(format!(
                    "Unsupported select item: {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn convert_order_by(&self, order_by: Option<sql_ast::OrderBy>) -> Result<Vec<SortKey>> {
        let Some(order_by) = order_by else {
            return Ok(Vec::new());
        };

        match order_by.kind {
            sql_ast::OrderByKind::Expressions(exprs) => exprs
                .into_iter()
                .map(|expr| self.convert_order_by_expr(expr))
                .collect(),
            sql_ast::OrderByKind::All(_) => Err(JsonlError::UnsupportedOperation(
                "ORDER BY ALL is not supported".into(),
            )),
        }
    }

    fn convert_order_by_expr(&self, order: sql_ast::OrderByExpr) -> Result<SortKey> {
        let column = PredicateConverter::column_name(&order.expr).ok_or_else(|| {
            JsonlError::UnsupportedOperation(format!(
                "Only column references can be ordered by, got: {}",
                order.expr
            ))
        })?;

        // ASC by default
        let descending = order.options.asc.map(|asc| !asc).unwrap_or(false);
        let key = SortKey::new(column, descending);

        Ok(match order.options.nulls_first {
            Some(true) => key.with_null_ordering(NullOrdering::NullsFirst),
            Some(false) => key.with_null_ordering(NullOrdering::NullsLast),
            None => key,
        })
    }

    fn convert_limit_clause(
        &self,
        limit_clause: Option<sql_ast::LimitClause>,
    ) -> Result<(Option<usize>, Option<usize>)> {
        let Some(clause) = limit_clause else {
            return Ok((None, None));
        };

        match clause {
            sql_ast::LimitClause::LimitOffset { limit, offset, .. } => {
                let limit = limit.as_ref().map(|expr| extract_count(expr, "LIMIT")).transpose()?;
                let offset = offset
                    .as_ref()
                    .map(|offset| extract_count(&offset.value, "OFFSET"))
                    .transpose()?;
                Ok((limit, offset))
            }
            // MySQL style: LIMIT offset, limit
            sql_ast::LimitClause::OffsetCommaLimit { offset, limit } => Ok((
                Some(extract_count(&limit, "LIMIT")?),
                Some(extract_count(&offset, "OFFSET")?),
            )),
        }
    }
}

impl Default for SqlScanParser {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_count(expr: &sql_ast::Expr, clause: &str) -> Result<usize> {
    match expr {
        sql_ast::Expr::Value(value_with_span) => match &value_with_span.value {
            sql_ast::Value::Number(n, _) => n
                .parse::<usize>()
                .map_err(|_| JsonlError::ParseError(format!("Invalid {} value: {}", clause, n))),
            other => Err(JsonlError::UnsupportedOperation(format!(
                "Only numeric {} supported, got: {}",
                clause, other
            ))),
        },
        other => Err(JsonlError::UnsupportedOperation(format!(
            "Only numeric {} supported, got: {}",
            clause, other
        ))),
    }
}

/// Quoted identifiers keep their text verbatim, so `"data/test.jsonl"` is a path.
fn extract_table_name(name: &sql_ast::ObjectName) -> Result<String> {
    let parts = name
        .0
        .iter()
        .map(|part| match part {
            sql_ast::ObjectNamePart::Identifier(ident) => Ok(ident.value.clone()),
            #[allow(unreachable_patterns)]
            other => Err(JsonlError::UnsupportedOperation(format!(
                "Unsupported table name: {}",
                other
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    if parts.is_empty() {
        return Err(JsonlError::ParseError("Invalid table name".into()));
    }
    Ok(parts.join("."))
}
