pub mod between;
pub mod comparison;
pub mod is_null;
pub mod logical;
pub mod nested;

use crate::core::{JsonlError, Result, Value};
use crate::filter::{Bounds, Filter};
use sqlparser::ast as sql_ast;
use tracing::trace;

/// Lowers one shape of WHERE expression into column filters.
pub trait PushdownPlugin: Send + Sync {
    /// Plugin name for diagnostics
    fn name(&self) -> &'static str;

    fn can_handle(&self, expr: &sql_ast::Expr) -> bool;

    /// Add the filters implied by `expr` to `bounds`
    fn push(
        &self,
        expr: sql_ast::Expr,
        converter: &PredicateConverter,
        bounds: &mut BoundsBuilder,
    ) -> Result<()>;
}

pub struct PushdownPluginRegistry {
    plugins: Vec<Box<dyn PushdownPlugin>>,
}

impl PushdownPluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    pub fn register(&mut self, plugin: Box<dyn PushdownPlugin>) {
        trace!(plugin = plugin.name(), "registered pushdown plugin");
        self.plugins.push(plugin);
    }

    pub fn with_default_plugins() -> Self {
        let mut registry = Self::new();

        // Nested first so parentheses are unwrapped before anything else
        registry.register(Box::new(nested::NestedPlugin));
        registry.register(Box::new(logical::AndPlugin));
        registry.register(Box::new(between::BetweenPlugin));
        registry.register(Box::new(is_null::IsNullPlugin));
        registry.register(Box::new(comparison::ComparisonPlugin));

        registry
    }

    pub fn find_plugin(&self, expr: &sql_ast::Expr) -> Option<&dyn PushdownPlugin> {
        self.plugins
            .iter()
            .find(|plugin| plugin.can_handle(expr))
            .map(|boxed| &**boxed)
    }
}

impl Default for PushdownPluginRegistry {
    fn default() -> Self {
        Self::with_default_plugins()
    }
}

/// Accumulates per-column filters, folding repeated columns together.
#[derive(Debug, Default)]
pub struct BoundsBuilder {
    bounds: Bounds,
}

impl BoundsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, column: String, filter: Filter) -> Result<()> {
        let combined = match self.bounds.remove(&column) {
            None => filter,
            Some(existing) => {
                let description = format!("{:?} AND {:?}", existing, filter);
                existing.combine(filter).ok_or_else(|| {
                    JsonlError::UnsupportedOperation(format!(
                        "Cannot combine conditions on column '{}': {}",
                        column, description
                    ))
                })?
            }
        };

        self.bounds.insert(column, combined);
        Ok(())
    }

    pub fn build(self) -> Bounds {
        self.bounds
    }
}

/// Converts WHERE expressions into [`Bounds`] through the plugin registry.
pub struct PredicateConverter {
    registry: PushdownPluginRegistry,
}

impl PredicateConverter {
    pub fn new() -> Self {
        Self {
            registry: PushdownPluginRegistry::with_default_plugins(),
        }
    }

    pub fn convert(&self, expr: sql_ast::Expr, bounds: &mut BoundsBuilder) -> Result<()> {
        match self.registry.find_plugin(&expr) {
            Some(plugin) => {
                trace!(plugin = plugin.name(), "pushing down predicate");
                plugin.push(expr, self, bounds)
            }
            None => Err(JsonlError::UnsupportedOperation(format!(
                "Cannot push down predicate: {}",
                expr
            ))),
        }
    }

    /// Column named by an identifier; compound names keep their dots.
    pub fn column_name(expr: &sql_ast::Expr) -> Option<String> {
        match expr {
            sql_ast::Expr::Identifier(ident) => Some(ident.value.clone()),
            sql_ast::Expr::CompoundIdentifier(idents) => Some(
                idents
                    .iter()
                    .map(|ident| ident.value.as_str())
                    .collect::<Vec<_>>()
                    .join("."),
            ),
            _ => None,
        }
    }

    /// The column an operand names, or an error naming the operand.
    pub fn expect_column(expr: &sql_ast::Expr) -> Result<String> {
        Self::column_name(expr).ok_or_else(|| {
            JsonlError::UnsupportedOperation(format!("Expected a column, got: {}", expr))
        })
    }

    /// Literal operand, with a leading sign folded into numbers.
    pub fn literal(&self, expr: &sql_ast::Expr) -> Result<Value> {
        match expr {
            sql_ast::Expr::Value(value_with_span) => self.convert_value(&value_with_span.value),
            sql_ast::Expr::Nested(inner) => self.literal(inner),
            sql_ast::Expr::UnaryOp { op, expr } => {
                let value = self.literal(expr)?;
                match (op, value) {
                    (sql_ast::UnaryOperator::Plus, value @ (Value::Integer(_) | Value::Float(_))) => {
                        Ok(value)
                    }
                    (sql_ast::UnaryOperator::Minus, Value::Integer(i)) => i
                        .checked_neg()
                        .map(Value::Integer)
                        .ok_or_else(|| JsonlError::TypeMismatch(format!("Integer overflow: -{}", i))),
                    (sql_ast::UnaryOperator::Minus, Value::Float(f)) => Ok(Value::Float(-f)),
                    (op, value) => Err(JsonlError::UnsupportedOperation(format!(
                        "Unsupported unary operator {} on {}",
                        op, value
                    ))),
                }
            }
            other => Err(JsonlError::UnsupportedOperation(format!(
                "Expected a literal, got: {}",
                other
            ))),
        }
    }

    pub fn is_literal(expr: &sql_ast::Expr) -> bool {
        match expr {
            sql_ast::Expr::Value(_) => true,
            sql_ast::Expr::Nested(inner) | sql_ast::Expr::UnaryOp { expr: inner, .. } => {
                Self::is_literal(inner)
            }
            _ => false,
        }
    }

    pub fn convert_value(&self, val: &sql_ast::Value) -> Result<Value> {
        match val {
            sql_ast::Value::Number(n, _) => {
                if let Ok(i) = n.parse::<i64>() {
                    Ok(Value::Integer(i))
                } else if let Ok(f) = n.parse::<f64>() {
                    Ok(Value::Float(f))
                } else {
                    Err(JsonlError::TypeMismatch(format!("Invalid number: {}", n)))
                }
            }
            sql_ast::Value::SingleQuotedString(s) | sql_ast::Value::DoubleQuotedString(s) => {
                Ok(Value::Text(s.clone()))
            }
            sql_ast::Value::Boolean(b) => Ok(Value::Boolean(*b)),
            sql_ast::Value::Null => Ok(Value::Null),
            _ => Err(JsonlError::UnsupportedOperation(format!(
                "Unsupported value: {}",
                val
            ))),
        }
    }
}

impl Default for PredicateConverter {
    fn default() -> Self {
        Self::new()
    }
}
