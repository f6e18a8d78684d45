//! Operand parse errors

/// A raw operand could not be coerced into the column's value kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Column '{column}': cannot parse '{raw}' as {expected}")]
pub struct ParseError {
    /// The column the operand was typed into.
    pub column: String,
    /// The raw text as entered.
    pub raw: String,
    /// Name of the value kind the column expects.
    pub expected: &'static str,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(column: impl Into<String>, raw: impl Into<String>, expected: &'static str) -> Self {
        Self {
            column: column.into(),
            raw: raw.into(),
            expected,
        }
    }
}
