//! Operator selection errors

use crate::model::ValueCategory;
use crate::query::FilterOperator;

/// An operator was requested that the column cannot honor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedOperatorError {
    /// The operator is not part of the column's category operator set.
    #[error("Column '{column}': operator {operator} is not available for {category} values")]
    NotInCategory {
        column: String,
        operator: FilterOperator,
        category: ValueCategory,
    },

    /// A relational operator was requested without an operand.
    #[error("Column '{column}': operator {operator} needs a value")]
    AbsentOperand {
        column: String,
        operator: FilterOperator,
    },

    /// The operator is hidden by another clause of the same AND group.
    #[error("Column '{column}': operator {operator} conflicts with {conflicts_with}")]
    Conflict {
        column: String,
        operator: FilterOperator,
        conflicts_with: FilterOperator,
    },
}

impl UnsupportedOperatorError {
    /// Creates a category mismatch error.
    pub fn not_in_category(column: impl Into<String>, operator: FilterOperator, category: ValueCategory) -> Self {
        Self::NotInCategory {
            column: column.into(),
            operator,
            category,
        }
    }

    /// Creates an absent operand error.
    pub fn absent_operand(column: impl Into<String>, operator: FilterOperator) -> Self {
        Self::AbsentOperand {
            column: column.into(),
            operator,
        }
    }

    /// Creates an exclusion conflict error.
    pub fn conflict(column: impl Into<String>, operator: FilterOperator, conflicts_with: FilterOperator) -> Self {
        Self::Conflict {
            column: column.into(),
            operator,
            conflicts_with,
        }
    }
}
