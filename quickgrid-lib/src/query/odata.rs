//! OData `$filter` and `$orderby` generation.

use super::CompareOp;
use super::Direction;
use super::Expr;
use super::Lambda;
use super::LogicalOp;
use super::Predicate;
use super::SortChain;
use super::TextOp;
use crate::model::Value;

/// Converts a lambda to an OData `$filter` expression.
///
/// Fields render as their column names. Predicates are expected as built;
/// rewritten ones render too, with `tolower()` for lowered fields and an
/// explicit `ne null` test for guards.
pub fn lambda_to_odata(lambda: &Lambda) -> String {
    predicate_to_odata(&lambda.body)
}

/// Converts a predicate to an OData `$filter` expression.
pub fn predicate_to_odata(predicate: &Predicate) -> String {
    match predicate {
        Predicate::Compare { left, op, right } => {
            format!("{} {} {}", expr_to_odata(left), compare_to_odata(*op), expr_to_odata(right))
        }
        Predicate::Text { subject, op, needle } => {
            let function = match op {
                TextOp::Contains => "contains",
                TextOp::StartsWith => "startswith",
                TextOp::EndsWith => "endswith",
            };
            format!("{}({},{})", function, expr_to_odata(subject), expr_to_odata(needle))
        }
        Predicate::Guard { subject, body } => {
            format!("({} ne null and {})", expr_to_odata(subject), predicate_to_odata(body))
        }
        Predicate::Logical { op, children } => {
            if children.is_empty() {
                return String::new();
            }
            let joiner = match op {
                LogicalOp::And | LogicalOp::AndAlso | LogicalOp::AndAssign => " and ",
                LogicalOp::Or | LogicalOp::OrElse | LogicalOp::OrAssign => " or ",
            };
            let parts: Vec<_> = children.iter().map(predicate_to_odata).collect();
            format!("({})", parts.join(joiner))
        }
    }
}

fn compare_to_odata(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "eq",
        CompareOp::Ne => "ne",
        CompareOp::Gt => "gt",
        CompareOp::Ge => "ge",
        CompareOp::Lt => "lt",
        CompareOp::Le => "le",
    }
}

fn expr_to_odata(expr: &Expr) -> String {
    match expr {
        Expr::Field { column, .. } => column.to_string(),
        Expr::Literal(value) => value_to_odata(value),
        // The backend applies its own null rules.
        Expr::Coalesce(inner, _) => expr_to_odata(inner),
        Expr::Lower(inner) => format!("tolower({})", expr_to_odata(inner)),
    }
}

/// Converts a `Value` to an OData literal representation.
pub fn value_to_odata(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(n) => {
            // OData needs a decimal point to read this as a double
            let s = n.to_string();
            if s.contains('.') || s.contains('e') || s.contains('E') || !n.is_finite() {
                s
            } else {
                format!("{}.0", s)
            }
        }
        Value::Decimal(d) => d.to_string(),
        Value::String(s) => escape_string(s),
        Value::Guid(g) => g.to_string(),
        Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        Value::Time(t) => t.format("%H:%M:%S%.f").to_string(),
        Value::DateTime(dt) => dt.to_rfc3339(),
        Value::Duration(d) => format!("duration'{}'", d),
        Value::Enum(e) => e.ordinal.to_string(),
    }
}

/// Converts a `SortChain` to an OData `$orderby` expression.
pub fn order_to_odata(chain: &SortChain) -> String {
    chain
        .keys()
        .iter()
        .map(|key| {
            let dir = match key.direction {
                Direction::Asc => "asc",
                Direction::Desc => "desc",
            };
            format!("{} {}", key.column, dir)
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Escapes a string for use in OData queries.
///
/// OData strings are enclosed in single quotes, with internal single quotes doubled.
pub fn escape_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
