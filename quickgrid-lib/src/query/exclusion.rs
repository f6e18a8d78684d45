//! Operator exclusion rules for AND-combined filter groups.
//!
//! In an AND group some operator pairs can never both hold (`Name == "a" &&
//! Name != "a"`) or make each other redundant (`Age > 3 && Age >= 3`). Once
//! a clause uses one of them, the menu hides the others. OR groups hide
//! nothing.

use super::FilterOperator;
use super::GroupOperator;
use super::operators_for;
use crate::model::ValueCategory;

use FilterOperator::*;

/// Returns the operators a clause using `operator` hides from its siblings.
pub fn excluded_operators(category: ValueCategory, operator: FilterOperator) -> &'static [FilterOperator] {
    match category {
        ValueCategory::String => match operator {
            StartsWith => &[StartsWith, Equal],
            EndsWith => &[EndsWith, Equal],
            Contains | NotEqual => &[Equal],
            Equal => &[Contains, StartsWith, EndsWith, Equal, NotEqual],
            _ => &[],
        },
        ValueCategory::Numeric | ValueCategory::Temporal => match operator {
            Equal => &[NotEqual, GreaterThan, GreaterThanOrEqual, LessThan, LessThanOrEqual],
            GreaterThan => &[GreaterThan, GreaterThanOrEqual, Equal],
            GreaterThanOrEqual => &[GreaterThanOrEqual, GreaterThan, Equal],
            LessThan => &[LessThan, LessThanOrEqual, Equal],
            LessThanOrEqual => &[LessThanOrEqual, LessThan, Equal],
            NotEqual => &[Equal],
            _ => &[],
        },
        ValueCategory::Enumeration | ValueCategory::Identifier => match operator {
            Equal => &[NotEqual],
            NotEqual => &[Equal],
            _ => &[],
        },
        ValueCategory::Boolean => match operator {
            Equal => &[Equal],
            _ => &[],
        },
    }
}

/// Returns the first operator among `others` that hides `operator`.
pub fn conflicting_operator(
    category: ValueCategory,
    mode: GroupOperator,
    operator: FilterOperator,
    others: &[FilterOperator],
) -> Option<FilterOperator> {
    if mode == GroupOperator::Or {
        return None;
    }
    others
        .iter()
        .copied()
        .find(|&other| excluded_operators(category, other).contains(&operator))
}

/// Returns the operators still selectable next to `others`, in menu order.
///
/// An AND group holding `Equal` offers nothing, matching [`can_add_clause`].
///
/// # Example
///
/// ```
/// use quickgrid_lib::model::ValueCategory;
/// use quickgrid_lib::query::{available_operators, FilterOperator, GroupOperator};
///
/// let left = available_operators(
///     ValueCategory::Numeric,
///     GroupOperator::And,
///     &[FilterOperator::GreaterThan],
/// );
/// assert_eq!(
///     left,
///     vec![
///         FilterOperator::NotEqual,
///         FilterOperator::LessThan,
///         FilterOperator::LessThanOrEqual,
///     ]
/// );
/// ```
pub fn available_operators(
    category: ValueCategory,
    mode: GroupOperator,
    others: &[FilterOperator],
) -> Vec<FilterOperator> {
    if mode == GroupOperator::And && others.contains(&Equal) {
        return Vec::new();
    }
    operators_for(category)
        .iter()
        .copied()
        .filter(|&op| conflicting_operator(category, mode, op, others).is_none())
        .collect()
}

/// Returns `true` if a group may take another clause.
///
/// The group must be below `max` clauses, and an AND group that already
/// pins the value with `Equal` takes nothing more.
pub fn can_add_clause(mode: GroupOperator, operators: &[FilterOperator], max: usize) -> bool {
    if operators.len() >= max {
        return false;
    }
    mode == GroupOperator::Or || !operators.contains(&Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_equal_is_exclusive() {
        let category = ValueCategory::String;
        assert!(available_operators(category, GroupOperator::And, &[Equal]).is_empty());
        for op in [Contains, StartsWith, EndsWith, NotEqual] {
            let left = available_operators(category, GroupOperator::And, &[op]);
            assert!(!left.contains(&Equal), "{op} should hide Equal");
        }
    }

    #[test]
    fn test_string_prefix_hides_itself() {
        let left = available_operators(ValueCategory::String, GroupOperator::And, &[StartsWith]);
        assert_eq!(left, vec![Contains, EndsWith, NotEqual]);
    }

    #[test]
    fn test_ordered_bounds() {
        let left = available_operators(ValueCategory::Temporal, GroupOperator::And, &[GreaterThanOrEqual, LessThan]);
        assert_eq!(left, vec![NotEqual]);
    }

    #[test]
    fn test_enum_equal_and_not_equal_exclude_each_other() {
        assert_eq!(
            available_operators(ValueCategory::Enumeration, GroupOperator::And, &[NotEqual]),
            vec![NotEqual]
        );
        assert_eq!(
            conflicting_operator(ValueCategory::Enumeration, GroupOperator::And, Equal, &[NotEqual]),
            Some(NotEqual)
        );
    }

    #[test]
    fn test_menu_agrees_with_clause_gate() {
        for category in [ValueCategory::Enumeration, ValueCategory::Identifier, ValueCategory::Numeric] {
            let left = available_operators(category, GroupOperator::And, &[Equal]);
            assert!(left.is_empty(), "{category} offered {left:?}");
            assert!(!can_add_clause(GroupOperator::And, &[Equal], 5));
        }
    }

    #[test]
    fn test_or_mode_hides_nothing() {
        assert_eq!(
            available_operators(ValueCategory::String, GroupOperator::Or, &[Equal, Contains]),
            operators_for(ValueCategory::String).to_vec()
        );
    }

    #[test]
    fn test_can_add_clause() {
        assert!(can_add_clause(GroupOperator::And, &[GreaterThan], 2));
        assert!(!can_add_clause(GroupOperator::And, &[GreaterThan, LessThan], 2));
        assert!(!can_add_clause(GroupOperator::And, &[Equal], 5));
        assert!(can_add_clause(GroupOperator::Or, &[Equal], 5));
    }
}
