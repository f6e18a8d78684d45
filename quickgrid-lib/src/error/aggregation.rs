//! Predicate aggregation errors

/// Attempted to combine an empty set of predicate fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Cannot combine zero predicates")]
pub struct AggregationError;
