//! Folding predicate fragments into one.

use super::Lambda;
use super::LogicalOp;
use super::Predicate;
use crate::error::AggregationError;

/// Combines fragments left to right with `op`.
///
/// One fragment is returned unchanged. Two or more are rebound to a single
/// param, numbered past every param the fragments use, and joined under one
/// [`Predicate::Logical`] node.
///
/// # Errors
///
/// Returns [`AggregationError`] when `fragments` is empty.
///
/// # Example
///
/// ```
/// use quickgrid_lib::model::{Column, ValueKind};
/// use quickgrid_lib::query::{build_predicate, try_combine, FilterOperator, LogicalOp};
///
/// struct Person { name: String, age: i32 }
/// let name = Column::property("Name", ValueKind::Text, |p: &Person| p.name.clone());
/// let age = Column::property("Age", ValueKind::Integer, |p: &Person| p.age);
///
/// let combined = try_combine(
///     [
///         build_predicate(&age, FilterOperator::GreaterThan, Some(30.into())).unwrap(),
///         build_predicate(&name, FilterOperator::Contains, Some("jo".into())).unwrap(),
///     ],
///     LogicalOp::AndAlso,
/// )
/// .unwrap();
/// assert!(combined.is_closed());
/// assert!(try_combine(Vec::new(), LogicalOp::AndAlso).is_err());
/// ```
pub fn try_combine<I>(fragments: I, op: LogicalOp) -> Result<Lambda, AggregationError>
where
    I: IntoIterator<Item = Lambda>,
{
    let mut fragments = fragments.into_iter();
    let Some(first) = fragments.next() else {
        log::error!("Attempted to combine zero predicates");
        return Err(AggregationError);
    };
    Ok(combine(first, fragments, op))
}

/// Combines a non-empty sequence of fragments.
pub(crate) fn combine<I>(first: Lambda, rest: I, op: LogicalOp) -> Lambda
where
    I: IntoIterator<Item = Lambda>,
{
    let mut rest = rest.into_iter().peekable();
    if rest.peek().is_none() {
        return first;
    }

    let fragments: Vec<Lambda> = std::iter::once(first).chain(rest).collect();
    let param = fragments
        .iter()
        .flat_map(|fragment| std::iter::once(fragment.param()).chain(fragment.free_params()))
        .max()
        .unwrap_or_default()
        .next();
    let children: Vec<Predicate> = fragments
        .iter()
        .map(|fragment| fragment.rebind(param).body)
        .collect();
    log::trace!("Combining {} predicates with {:?}", children.len(), op);
    Lambda::new(param, Predicate::Logical { op, children })
}
