//! Predicate syntax tree.
//!
//! A [`Lambda`] is a boolean test over one record. Its body refers to the
//! record through [`Expr::Field`] nodes tagged with the lambda's [`Param`].
//! Fragments are built against [`Param::default`]; combining them rebinds
//! every fragment to one param numbered past all of theirs.

use std::fmt;

use super::CompareOp;
use super::LogicalOp;
use super::TextOp;
use crate::model::ColumnId;
use crate::model::ColumnSet;
use crate::model::Value;
use crate::model::ValueKind;

/// The bound variable standing for "the record under test".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Param(usize);

impl Param {
    /// Creates the param with the given index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the param numbered right after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A value-producing expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A record field read through a column accessor.
    Field {
        param: Param,
        column: ColumnId,
        kind: ValueKind,
        nullable: bool,
    },
    /// A constant.
    Literal(Value),
    /// The inner value, or the fallback when it is null.
    Coalesce(Box<Expr>, Value),
    /// The inner value lowercased (text only).
    Lower(Box<Expr>),
}

impl Expr {
    /// Creates a field read.
    pub fn field(param: Param, column: impl Into<ColumnId>, kind: ValueKind, nullable: bool) -> Self {
        Expr::Field {
            param,
            column: column.into(),
            kind,
            nullable,
        }
    }

    /// Creates a constant.
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    /// Returns `true` for a null constant.
    pub fn is_null_literal(&self) -> bool {
        matches!(self, Expr::Literal(Value::Null))
    }

    /// Returns the kind and nullability of the field read, looking through wrappers.
    pub fn field_kind(&self) -> Option<(ValueKind, bool)> {
        match self {
            Expr::Field { kind, nullable, .. } => Some((*kind, *nullable)),
            Expr::Literal(_) => None,
            Expr::Coalesce(inner, _) | Expr::Lower(inner) => inner.field_kind(),
        }
    }

    /// Evaluates against a record.
    pub fn evaluate<T>(&self, record: &T, columns: &ColumnSet<T>) -> Value {
        match self {
            Expr::Field { column, .. } => columns.read(column, record),
            Expr::Literal(value) => value.clone(),
            Expr::Coalesce(inner, fallback) => inner.evaluate(record, columns).or_default_to(fallback),
            Expr::Lower(inner) => inner.evaluate(record, columns).to_lowercase(),
        }
    }

    fn rebind(&self, param: Param) -> Expr {
        match self {
            Expr::Field {
                column, kind, nullable, ..
            } => Expr::Field {
                param,
                column: column.clone(),
                kind: *kind,
                nullable: *nullable,
            },
            Expr::Literal(value) => Expr::Literal(value.clone()),
            Expr::Coalesce(inner, fallback) => Expr::Coalesce(Box::new(inner.rebind(param)), fallback.clone()),
            Expr::Lower(inner) => Expr::Lower(Box::new(inner.rebind(param))),
        }
    }

    fn collect_params(&self, out: &mut Vec<Param>) {
        match self {
            Expr::Field { param, .. } => {
                if !out.contains(param) {
                    out.push(*param);
                }
            }
            Expr::Literal(_) => {}
            Expr::Coalesce(inner, _) | Expr::Lower(inner) => inner.collect_params(out),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Field { param, column, .. } => write!(f, "{}.{}", param, column),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Coalesce(inner, fallback) => write!(f, "({} ?? {})", inner, fallback),
            Expr::Lower(inner) => write!(f, "{}.ToLower()", inner),
        }
    }
}

/// A boolean-producing node.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `left op right`.
    Compare { left: Expr, op: CompareOp, right: Expr },
    /// `subject.Contains(needle)` and friends.
    Text { subject: Expr, op: TextOp, needle: Expr },
    /// `false` when `subject` is null, otherwise `body`.
    Guard { subject: Expr, body: Box<Predicate> },
    /// The children folded with one boolean operator.
    Logical { op: LogicalOp, children: Vec<Predicate> },
}

impl Predicate {
    /// Evaluates against a record.
    pub fn evaluate<T>(&self, record: &T, columns: &ColumnSet<T>) -> bool {
        match self {
            Predicate::Compare { left, op, right } => {
                op.evaluate(&left.evaluate(record, columns), &right.evaluate(record, columns))
            }
            Predicate::Text { subject, op, needle } => {
                op.evaluate(&subject.evaluate(record, columns), &needle.evaluate(record, columns))
            }
            Predicate::Guard { subject, body } => {
                !subject.evaluate(record, columns).is_null() && body.evaluate(record, columns)
            }
            Predicate::Logical { op, children } => {
                let mut results = children.iter().map(|child| child.evaluate(record, columns));
                match (op.is_conjunction(), op.is_short_circuit()) {
                    (true, true) => results.all(|r| r),
                    (false, true) => results.any(|r| r),
                    (true, false) => results.fold(true, |acc, r| acc & r),
                    (false, false) => results.fold(false, |acc, r| acc | r),
                }
            }
        }
    }

    pub(crate) fn rebind(&self, param: Param) -> Predicate {
        match self {
            Predicate::Compare { left, op, right } => Predicate::Compare {
                left: left.rebind(param),
                op: *op,
                right: right.rebind(param),
            },
            Predicate::Text { subject, op, needle } => Predicate::Text {
                subject: subject.rebind(param),
                op: *op,
                needle: needle.rebind(param),
            },
            Predicate::Guard { subject, body } => Predicate::Guard {
                subject: subject.rebind(param),
                body: Box::new(body.rebind(param)),
            },
            Predicate::Logical { op, children } => Predicate::Logical {
                op: *op,
                children: children.iter().map(|c| c.rebind(param)).collect(),
            },
        }
    }

    fn collect_params(&self, out: &mut Vec<Param>) {
        match self {
            Predicate::Compare { left, right, .. } => {
                left.collect_params(out);
                right.collect_params(out);
            }
            Predicate::Text { subject, needle, .. } => {
                subject.collect_params(out);
                needle.collect_params(out);
            }
            Predicate::Guard { subject, body } => {
                subject.collect_params(out);
                body.collect_params(out);
            }
            Predicate::Logical { children, .. } => {
                for child in children {
                    child.collect_params(out);
                }
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { left, op, right } => write!(f, "{} {} {}", left, op.symbol(), right),
            Predicate::Text { subject, op, needle } => write!(f, "{}.{}({})", subject, op.name(), needle),
            Predicate::Guard { subject, body } => write!(f, "({} == null ? false : {})", subject, body),
            Predicate::Logical { op, children } => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.symbol())?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A predicate closed over a single record param.
///
/// # Example
///
/// ```
/// use quickgrid_lib::model::{ColumnSet, ValueKind};
/// use quickgrid_lib::query::{CompareOp, Expr, Lambda, Param, Predicate};
///
/// let x = Param::default();
/// let lambda = Lambda::new(
///     x,
///     Predicate::Compare {
///         left: Expr::field(x, "Age", ValueKind::Integer, false),
///         op: CompareOp::Gt,
///         right: Expr::literal(30),
///     },
/// );
/// assert_eq!(lambda.to_string(), format!("{x} => {x}.Age > 30"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub(crate) param: Param,
    pub(crate) body: Predicate,
}

impl Lambda {
    /// Creates a lambda.
    pub fn new(param: Param, body: Predicate) -> Self {
        Self { param, body }
    }

    /// Returns the bound param.
    pub fn param(&self) -> Param {
        self.param
    }

    /// Returns the body.
    pub fn body(&self) -> &Predicate {
        &self.body
    }

    /// Returns the params the body refers to, in first-use order.
    pub fn free_params(&self) -> Vec<Param> {
        let mut params = Vec::new();
        self.body.collect_params(&mut params);
        params
    }

    /// Returns `true` if the body refers to no param but its own.
    pub fn is_closed(&self) -> bool {
        self.free_params().iter().all(|p| *p == self.param)
    }

    /// Rewrites the lambda to bind `param` in place of every field's param.
    pub fn rebind(&self, param: Param) -> Lambda {
        Lambda {
            param,
            body: self.body.rebind(param),
        }
    }

    /// Evaluates against a record.
    pub fn evaluate<T>(&self, record: &T, columns: &ColumnSet<T>) -> bool {
        self.body.evaluate(record, columns)
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.param, self.body)
    }
}
