//! Grid entrypoint errors

use super::ParseError;
use super::UnsupportedOperatorError;

/// Errors returned by [`Grid`](crate::Grid) entrypoints.
///
/// `Parse` and `Operator` are expected user-input conditions. The remaining
/// variants indicate the host wired the grid incorrectly.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// The operand text did not match the column's value kind.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The operator is not valid for the column or its current clauses.
    #[error(transparent)]
    Operator(#[from] UnsupportedOperatorError),

    /// Sorting or filtering was enabled on a column without an accessor.
    #[error("Column '{column}' has no accessor")]
    MissingAccessor { column: String },

    /// No column is registered under this name.
    #[error("Unknown column '{column}'")]
    UnknownColumn { column: String },

    /// A column with this name is already registered.
    #[error("Column '{column}' is already registered")]
    DuplicateColumn { column: String },

    /// Sort was toggled on a column that is not sortable.
    #[error("Column '{column}' is not sortable")]
    NotSortable { column: String },

    /// A filter was applied to a column without filter options.
    #[error("Column '{column}' has no filter options")]
    NotFilterable { column: String },

    /// More clauses were supplied than the column allows.
    #[error("Column '{column}' accepts at most {max} filter clauses")]
    TooManyClauses { column: String, max: usize },
}

impl GridError {
    /// Creates a missing accessor error.
    pub fn missing_accessor(column: impl Into<String>) -> Self {
        Self::MissingAccessor {
            column: column.into(),
        }
    }

    /// Creates an unknown column error.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    /// Returns `true` for errors caused by user input rather than host wiring.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Operator(_) | Self::TooManyClauses { .. })
    }
}
