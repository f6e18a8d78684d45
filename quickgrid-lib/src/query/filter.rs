//! Filter clauses and per-column filter groups.

use super::FilterOperator;
use super::GroupOperator;
use super::Lambda;
use super::combine::combine;
use crate::model::ColumnId;
use crate::model::Value;

/// One `column <operator> operand` test with its built predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub(crate) column: ColumnId,
    pub(crate) operator: FilterOperator,
    pub(crate) operand: Option<Value>,
    pub(crate) predicate: Lambda,
}

impl FilterClause {
    pub fn column(&self) -> &ColumnId {
        &self.column
    }

    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    /// Returns the coerced operand, `None` when the user typed nothing.
    pub fn operand(&self) -> Option<&Value> {
        self.operand.as_ref()
    }

    /// Returns the predicate as built, before any in-memory rewrite.
    pub fn predicate(&self) -> &Lambda {
        &self.predicate
    }
}

/// The clauses set on one column, joined by one operator.
///
/// Groups held by a grid are never empty: clearing the last clause removes
/// the group.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGroup {
    pub(crate) column: ColumnId,
    pub(crate) mode: GroupOperator,
    pub(crate) clauses: Vec<FilterClause>,
}

impl FilterGroup {
    pub(crate) fn new(column: ColumnId, mode: GroupOperator, clauses: Vec<FilterClause>) -> Self {
        Self { column, mode, clauses }
    }

    pub fn column(&self) -> &ColumnId {
        &self.column
    }

    /// Returns how the clauses are joined.
    pub fn mode(&self) -> GroupOperator {
        self.mode
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Returns the operators in use, in clause order.
    pub fn operators(&self) -> Vec<FilterOperator> {
        self.clauses.iter().map(|c| c.operator).collect()
    }

    /// Returns the clause predicates joined with the group's operator.
    pub fn predicate(&self) -> Option<Lambda> {
        let mut predicates = self.clauses.iter().map(|c| c.predicate.clone());
        let first = predicates.next()?;
        Some(combine(first, predicates, self.mode.logical()))
    }
}
