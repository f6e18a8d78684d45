//! Filter, comparison and boolean operators.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Value;
use crate::model::ValueCategory;

/// A filter operator a user can pick for a column.
///
/// Which operators a column offers depends on its [`ValueCategory`], see
/// [`operators_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Contains,
    StartsWith,
    EndsWith,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl FilterOperator {
    /// Returns the substring operator, if this is one.
    pub fn text_op(self) -> Option<TextOp> {
        match self {
            FilterOperator::Contains => Some(TextOp::Contains),
            FilterOperator::StartsWith => Some(TextOp::StartsWith),
            FilterOperator::EndsWith => Some(TextOp::EndsWith),
            _ => None,
        }
    }

    /// Returns the comparison operator, if this is one.
    pub fn compare_op(self) -> Option<CompareOp> {
        match self {
            FilterOperator::Equal => Some(CompareOp::Eq),
            FilterOperator::NotEqual => Some(CompareOp::Ne),
            FilterOperator::GreaterThan => Some(CompareOp::Gt),
            FilterOperator::GreaterThanOrEqual => Some(CompareOp::Ge),
            FilterOperator::LessThan => Some(CompareOp::Lt),
            FilterOperator::LessThanOrEqual => Some(CompareOp::Le),
            _ => None,
        }
    }

    /// Returns `true` for ordering operators (`>`, `>=`, `<`, `<=`).
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            FilterOperator::GreaterThan
                | FilterOperator::GreaterThanOrEqual
                | FilterOperator::LessThan
                | FilterOperator::LessThanOrEqual
        )
    }

    /// Returns the operator name.
    pub fn name(self) -> &'static str {
        match self {
            FilterOperator::Contains => "Contains",
            FilterOperator::StartsWith => "StartsWith",
            FilterOperator::EndsWith => "EndsWith",
            FilterOperator::Equal => "Equal",
            FilterOperator::NotEqual => "NotEqual",
            FilterOperator::GreaterThan => "GreaterThan",
            FilterOperator::GreaterThanOrEqual => "GreaterThanOrEqual",
            FilterOperator::LessThan => "LessThan",
            FilterOperator::LessThanOrEqual => "LessThanOrEqual",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const STRING_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Contains,
    FilterOperator::StartsWith,
    FilterOperator::EndsWith,
    FilterOperator::Equal,
    FilterOperator::NotEqual,
];

const ORDERED_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equal,
    FilterOperator::NotEqual,
    FilterOperator::GreaterThan,
    FilterOperator::GreaterThanOrEqual,
    FilterOperator::LessThan,
    FilterOperator::LessThanOrEqual,
];

const EQUALITY_OPERATORS: &[FilterOperator] = &[FilterOperator::Equal, FilterOperator::NotEqual];

const BOOLEAN_OPERATORS: &[FilterOperator] = &[FilterOperator::Equal];

/// Returns the operators offered for a category, in menu order.
pub fn operators_for(category: ValueCategory) -> &'static [FilterOperator] {
    match category {
        ValueCategory::String => STRING_OPERATORS,
        ValueCategory::Numeric | ValueCategory::Temporal => ORDERED_OPERATORS,
        ValueCategory::Enumeration | ValueCategory::Identifier => EQUALITY_OPERATORS,
        ValueCategory::Boolean => BOOLEAN_OPERATORS,
    }
}

/// Returns the operator preselected for a new filter slot.
pub fn default_operator(category: ValueCategory) -> FilterOperator {
    match category {
        ValueCategory::String => FilterOperator::Contains,
        _ => FilterOperator::Equal,
    }
}

/// Relational comparison between two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// Evaluates `left op right` with lifted-null semantics.
    ///
    /// `Eq`/`Ne` treat two nulls as equal; ordering against null is `false`.
    pub fn evaluate(self, left: &Value, right: &Value) -> bool {
        match self {
            CompareOp::Eq => left.equals(right),
            CompareOp::Ne => !left.equals(right),
            CompareOp::Gt => left.compare(right).is_some_and(|o| o.is_gt()),
            CompareOp::Ge => left.compare(right).is_some_and(|o| o.is_ge()),
            CompareOp::Lt => left.compare(right).is_some_and(|o| o.is_lt()),
            CompareOp::Le => left.compare(right).is_some_and(|o| o.is_le()),
        }
    }

    /// Returns the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }
}

/// Substring test on text values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextOp {
    Contains,
    StartsWith,
    EndsWith,
}

impl TextOp {
    /// Evaluates the test. Non-text values never match.
    pub fn evaluate(self, subject: &Value, needle: &Value) -> bool {
        let (Some(subject), Some(needle)) = (subject.as_str(), needle.as_str()) else {
            return false;
        };
        match self {
            TextOp::Contains => subject.contains(needle),
            TextOp::StartsWith => subject.starts_with(needle),
            TextOp::EndsWith => subject.ends_with(needle),
        }
    }

    /// Returns the method name.
    pub fn name(self) -> &'static str {
        match self {
            TextOp::Contains => "Contains",
            TextOp::StartsWith => "StartsWith",
            TextOp::EndsWith => "EndsWith",
        }
    }
}

/// Boolean operator used to fold predicates together.
///
/// The short-circuit forms (`AndAlso`, `OrElse`) are the meaningful ones for
/// filtering. The plain and assignment forms evaluate every operand and give
/// the same result for side-effect-free predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    And,
    #[default]
    AndAlso,
    AndAssign,
    Or,
    OrElse,
    OrAssign,
}

impl LogicalOp {
    /// Returns `true` for the AND family.
    pub fn is_conjunction(self) -> bool {
        matches!(self, LogicalOp::And | LogicalOp::AndAlso | LogicalOp::AndAssign)
    }

    /// Returns `true` if evaluation stops at the first deciding operand.
    pub fn is_short_circuit(self) -> bool {
        matches!(self, LogicalOp::AndAlso | LogicalOp::OrElse)
    }

    /// Returns the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "&",
            LogicalOp::AndAlso => "&&",
            LogicalOp::AndAssign => "&=",
            LogicalOp::Or => "|",
            LogicalOp::OrElse => "||",
            LogicalOp::OrAssign => "|=",
        }
    }
}

/// How the clauses of one column's filter group are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOperator {
    #[default]
    And,
    Or,
}

impl GroupOperator {
    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            GroupOperator::And => GroupOperator::Or,
            GroupOperator::Or => GroupOperator::And,
        }
    }

    /// Returns the boolean operator the group folds with.
    pub fn logical(self) -> LogicalOp {
        match self {
            GroupOperator::And => LogicalOp::AndAlso,
            GroupOperator::Or => LogicalOp::Or,
        }
    }
}
