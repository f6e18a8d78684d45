//! Builds one predicate from a column, an operator and an operand.

use super::CompareOp;
use super::Expr;
use super::FilterOperator;
use super::Lambda;
use super::Param;
use super::Predicate;
use super::operators_for;
use crate::error::GridError;
use crate::error::UnsupportedOperatorError;
use crate::model::Column;
use crate::model::Value;

/// Builds the predicate for `column <operator> operand`.
///
/// A substring operator without an operand degrades to `field == null`.
/// `Equal`/`NotEqual` without an operand compare against null; the ordering
/// operators have no meaning against "no value" and are rejected.
///
/// # Errors
///
/// - [`GridError::MissingAccessor`] for template columns.
/// - [`GridError::Operator`] if the column's category does not offer the
///   operator, or an ordering operator has no operand.
///
/// # Example
///
/// ```
/// use quickgrid_lib::model::{Column, ValueKind};
/// use quickgrid_lib::query::{build_predicate, FilterOperator};
///
/// struct Person { age: i32 }
/// let age = Column::property("Age", ValueKind::Integer, |p: &Person| p.age);
///
/// let lambda = build_predicate(&age, FilterOperator::GreaterThan, Some(30.into())).unwrap();
/// assert_eq!(lambda.to_string(), format!("{0} => {0}.Age > 30", lambda.param()));
/// ```
pub fn build_predicate<T>(
    column: &Column<T>,
    operator: FilterOperator,
    operand: Option<Value>,
) -> Result<Lambda, GridError> {
    if !column.has_accessor() {
        return Err(GridError::missing_accessor(column.id.as_str()));
    }
    let category = column.category();
    if !operators_for(category).contains(&operator) {
        return Err(UnsupportedOperatorError::not_in_category(column.id.as_str(), operator, category).into());
    }

    let param = Param::default();
    let field = Expr::field(param, &column.id, column.kind, column.nullable);

    let body = match (operator.text_op(), operand) {
        (Some(op), Some(needle)) => Predicate::Text {
            subject: field,
            op,
            needle: Expr::Literal(needle),
        },
        (Some(_), None) => Predicate::Compare {
            left: field,
            op: CompareOp::Eq,
            right: Expr::Literal(Value::Null),
        },
        (None, operand) => {
            let Some(op) = operator.compare_op() else {
                return Err(UnsupportedOperatorError::not_in_category(column.id.as_str(), operator, category).into());
            };
            if operand.is_none() && operator.is_relational() {
                return Err(UnsupportedOperatorError::absent_operand(column.id.as_str(), operator).into());
            }
            Predicate::Compare {
                left: field,
                op,
                right: Expr::Literal(operand.unwrap_or_default()),
            }
        }
    };

    let lambda = Lambda::new(param, body);
    log::trace!("Built predicate for column '{}': {}", column.id, lambda);
    Ok(lambda)
}
