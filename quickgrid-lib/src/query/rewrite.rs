//! Null-safety and case-normalization pass for in-memory evaluation.
//!
//! Exported predicates (OData) are left as built; the backend decides null
//! and collation rules there. Predicates run against records go through
//! [`rewrite`] first.

use super::CompareOp;
use super::Expr;
use super::Lambda;
use super::Predicate;
use crate::model::Value;
use crate::model::ValueKind;

/// The two policies of the in-memory rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewritePolicy {
    /// Treat a missing field as its kind's default value.
    pub null_default: bool,
    /// Lowercase text fields and text operands before comparing.
    pub case_fold: bool,
}

impl RewritePolicy {
    /// Creates a policy.
    pub fn new(null_default: bool, case_fold: bool) -> Self {
        Self {
            null_default,
            case_fold,
        }
    }
}

/// Rewrites a lambda for in-memory evaluation. The param is kept.
///
/// - With `null_default`, nullable fields are coalesced to their kind's
///   default (text fields always are), so comparisons run on every record.
/// - Without it, substring tests and comparisons on nullable fields are
///   guarded: a missing value makes the test `false`.
/// - With `case_fold`, text fields and text literals are lowercased.
///
/// Comparisons against a null literal are left untouched.
pub fn rewrite(lambda: &Lambda, policy: RewritePolicy) -> Lambda {
    let body = rewrite_predicate(&lambda.body, policy);
    let rewritten = Lambda::new(lambda.param, body);
    log::trace!("Rewrote {} as {}", lambda, rewritten);
    rewritten
}

fn rewrite_predicate(predicate: &Predicate, policy: RewritePolicy) -> Predicate {
    match predicate {
        Predicate::Logical { op, children } => Predicate::Logical {
            op: *op,
            children: children.iter().map(|c| rewrite_predicate(c, policy)).collect(),
        },
        Predicate::Guard { subject, body } => Predicate::Guard {
            subject: subject.clone(),
            body: Box::new(rewrite_predicate(body, policy)),
        },
        Predicate::Text { subject, op, needle } => {
            let node = Predicate::Text {
                subject: normalize_text(subject, policy),
                op: *op,
                needle: fold_literal(needle, policy),
            };
            if policy.null_default || subject.field_kind().is_none() {
                node
            } else {
                Predicate::Guard {
                    subject: subject.clone(),
                    body: Box::new(node),
                }
            }
        }
        Predicate::Compare { left, op, right } => rewrite_compare(left, *op, right, policy),
    }
}

fn rewrite_compare(left: &Expr, op: CompareOp, right: &Expr, policy: RewritePolicy) -> Predicate {
    let untouched = || Predicate::Compare {
        left: left.clone(),
        op,
        right: right.clone(),
    };
    if left.is_null_literal() || right.is_null_literal() {
        return untouched();
    }

    // Field on either side, literal on the other.
    let (field, literal, field_on_left) = match (left.field_kind(), right.field_kind()) {
        (Some(_), None) => (left, right, true),
        (None, Some(_)) => (right, left, false),
        _ => return untouched(),
    };
    let Some((kind, nullable)) = field.field_kind() else {
        return untouched();
    };

    let (new_field, guard) = if kind == ValueKind::Text {
        (normalize_text(field, policy), !policy.null_default && nullable)
    } else if policy.null_default && nullable {
        (Expr::Coalesce(Box::new(field.clone()), kind.default_value()), false)
    } else {
        (field.clone(), nullable)
    };
    let new_literal = fold_literal(literal, policy);

    let node = if field_on_left {
        Predicate::Compare {
            left: new_field,
            op,
            right: new_literal,
        }
    } else {
        Predicate::Compare {
            left: new_literal,
            op,
            right: new_field,
        }
    };

    if guard {
        Predicate::Guard {
            subject: field.clone(),
            body: Box::new(node),
        }
    } else {
        node
    }
}

/// Coalesces and lowercases a text field read according to the policy.
fn normalize_text(expr: &Expr, policy: RewritePolicy) -> Expr {
    if expr.field_kind().is_none() {
        return fold_literal(expr, policy);
    }
    let expr = if policy.null_default {
        Expr::Coalesce(Box::new(expr.clone()), Value::String(String::new()))
    } else {
        expr.clone()
    };
    if policy.case_fold {
        Expr::Lower(Box::new(expr))
    } else {
        expr
    }
}

fn fold_literal(expr: &Expr, policy: RewritePolicy) -> Expr {
    match expr {
        Expr::Literal(value) if policy.case_fold => Expr::Literal(value.to_lowercase()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;
    use crate::model::ColumnSet;
    use crate::query::FilterOperator;
    use crate::query::build_predicate;

    #[derive(Default)]
    struct Row {
        name: Option<&'static str>,
        score: Option<i32>,
        level: i32,
    }

    fn columns() -> ColumnSet<Row> {
        let mut set = ColumnSet::new();
        set.insert(Column::property("Name", ValueKind::Text, |r: &Row| r.name).nullable());
        set.insert(Column::property("Score", ValueKind::Integer, |r: &Row| r.score).nullable());
        set.insert(Column::property("Level", ValueKind::Integer, |r: &Row| r.level));
        set
    }

    fn predicate(column: &str, op: FilterOperator, value: Value) -> Lambda {
        let cols = columns();
        let column = cols.get(&column.into()).unwrap();
        build_predicate(column, op, Some(value)).unwrap()
    }

    #[test]
    fn test_param_is_preserved() {
        let lambda = predicate("Score", FilterOperator::Equal, Value::Int(5));
        let rewritten = rewrite(&lambda, RewritePolicy::new(true, true));
        assert_eq!(rewritten.param(), lambda.param());
        assert!(rewritten.is_closed());
    }

    #[test]
    fn test_missing_value_without_null_default() {
        let cols = columns();
        let row = Row::default();
        for value in [0, 5] {
            let lambda = rewrite(
                &predicate("Score", FilterOperator::Equal, Value::Int(value)),
                RewritePolicy::new(false, true),
            );
            assert!(!lambda.evaluate(&row, &cols));
        }
        let lambda = rewrite(
            &predicate("Score", FilterOperator::NotEqual, Value::Int(5)),
            RewritePolicy::new(false, true),
        );
        assert!(!lambda.evaluate(&row, &cols));
    }

    #[test]
    fn test_missing_value_with_null_default() {
        let cols = columns();
        let row = Row::default();
        let policy = RewritePolicy::new(true, true);
        let five = rewrite(&predicate("Score", FilterOperator::Equal, Value::Int(5)), policy);
        let zero = rewrite(&predicate("Score", FilterOperator::Equal, Value::Int(0)), policy);
        assert!(!five.evaluate(&row, &cols));
        assert!(zero.evaluate(&row, &cols));
    }

    #[test]
    fn test_non_nullable_field_is_not_guarded() {
        let lambda = predicate("Level", FilterOperator::GreaterThan, Value::Int(1));
        let rewritten = rewrite(&lambda, RewritePolicy::new(false, false));
        assert_eq!(rewritten, lambda);
    }

    #[test]
    fn test_case_fold() {
        let cols = columns();
        let row = Row {
            name: Some("John"),
            ..Row::default()
        };
        let lambda = predicate("Name", FilterOperator::Contains, Value::from("jo"));
        assert!(rewrite(&lambda, RewritePolicy::new(false, true)).evaluate(&row, &cols));
        assert!(!rewrite(&lambda, RewritePolicy::new(false, false)).evaluate(&row, &cols));

        let lambda = predicate("Name", FilterOperator::Equal, Value::from("JOHN"));
        assert!(rewrite(&lambda, RewritePolicy::new(true, true)).evaluate(&row, &cols));
    }

    #[test]
    fn test_missing_text_with_null_default() {
        let cols = columns();
        let row = Row::default();
        let lambda = predicate("Name", FilterOperator::NotEqual, Value::from("x"));
        assert!(rewrite(&lambda, RewritePolicy::new(true, false)).evaluate(&row, &cols));
        assert!(!rewrite(&lambda, RewritePolicy::new(false, false)).evaluate(&row, &cols));

        let lambda = predicate("Name", FilterOperator::StartsWith, Value::from(""));
        assert!(rewrite(&lambda, RewritePolicy::new(true, true)).evaluate(&row, &cols));
        assert!(!rewrite(&lambda, RewritePolicy::new(false, true)).evaluate(&row, &cols));
    }

    #[test]
    fn test_null_literal_is_untouched() {
        let cols = columns();
        let column = cols.get(&"Score".into()).unwrap();
        let lambda = build_predicate(column, FilterOperator::Equal, None).unwrap();
        let rewritten = rewrite(&lambda, RewritePolicy::new(true, true));
        assert_eq!(rewritten, lambda);
        assert!(rewritten.evaluate(&Row::default(), &cols));
    }
}
