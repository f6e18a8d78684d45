//! Sort directions and the sort-key chain.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::model::ColumnId;

/// Per-column sort state, cycled by header clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Not sorted.
    #[default]
    Default,
    Ascending,
    Descending,
}

impl SortDirection {
    /// Returns the next state: Default, Ascending, Descending, Default.
    pub fn next(self) -> Self {
        match self {
            SortDirection::Default => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Default,
        }
    }

    /// Returns `true` if the column takes part in the sort.
    pub fn is_active(self) -> bool {
        self != SortDirection::Default
    }

    /// Returns the ordering direction, or `None` for `Default`.
    pub fn direction(self) -> Option<Direction> {
        match self {
            SortDirection::Default => None,
            SortDirection::Ascending => Some(Direction::Asc),
            SortDirection::Descending => Some(Direction::Desc),
        }
    }

    /// Returns the `aria-sort` attribute value for a sortable header.
    pub fn aria_sort(self) -> &'static str {
        match self {
            SortDirection::Default => "other",
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// Sort direction of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

/// One key of a [`SortChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: ColumnId,
    pub direction: Direction,
}

/// How a key is applied: the first key orders, later keys break ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStep {
    OrderBy,
    OrderByDescending,
    ThenBy,
    ThenByDescending,
}

impl SortStep {
    fn new(position: usize, direction: Direction) -> Self {
        match (position, direction) {
            (0, Direction::Asc) => SortStep::OrderBy,
            (0, Direction::Desc) => SortStep::OrderByDescending,
            (_, Direction::Asc) => SortStep::ThenBy,
            (_, Direction::Desc) => SortStep::ThenByDescending,
        }
    }

    /// Returns the step name.
    pub fn name(self) -> &'static str {
        match self {
            SortStep::OrderBy => "OrderBy",
            SortStep::OrderByDescending => "OrderByDescending",
            SortStep::ThenBy => "ThenBy",
            SortStep::ThenByDescending => "ThenByDescending",
        }
    }
}

impl fmt::Display for SortStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered sort keys: position 0 is the primary key.
///
/// # Example
///
/// ```
/// use quickgrid_lib::query::{SortChain, SortStep};
///
/// let chain = SortChain::desc("Age").then_asc("Name");
/// let steps: Vec<_> = chain.steps().map(|(step, key)| (step, key.column.to_string())).collect();
/// assert_eq!(
///     steps,
///     vec![
///         (SortStep::OrderByDescending, "Age".to_string()),
///         (SortStep::ThenBy, "Name".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortChain {
    pub(crate) keys: Vec<SortKey>,
}

impl SortChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an ascending order on a column.
    pub fn asc(column: impl Into<ColumnId>) -> Self {
        Self::new().then_asc(column)
    }

    /// Creates a descending order on a column.
    pub fn desc(column: impl Into<ColumnId>) -> Self {
        Self::new().then_desc(column)
    }

    /// Adds an ascending tie-break key.
    pub fn then_asc(mut self, column: impl Into<ColumnId>) -> Self {
        self.push(column.into(), Direction::Asc);
        self
    }

    /// Adds a descending tie-break key.
    pub fn then_desc(mut self, column: impl Into<ColumnId>) -> Self {
        self.push(column.into(), Direction::Desc);
        self
    }

    /// Returns the keys, primary first.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Returns each key with its step label.
    pub fn steps(&self) -> impl Iterator<Item = (SortStep, &SortKey)> {
        self.keys
            .iter()
            .enumerate()
            .map(|(i, key)| (SortStep::new(i, key.direction), key))
    }

    /// Returns the position of a column's key.
    pub fn position(&self, column: &ColumnId) -> Option<usize> {
        self.keys.iter().position(|k| &k.column == column)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn push(&mut self, column: ColumnId, direction: Direction) {
        self.remove(&column);
        self.keys.push(SortKey { column, direction });
    }

    pub(crate) fn remove(&mut self, column: &ColumnId) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| &k.column != column);
        self.keys.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_cycle() {
        let d = SortDirection::Default;
        assert_eq!(d.next(), SortDirection::Ascending);
        assert_eq!(d.next().next(), SortDirection::Descending);
        assert_eq!(d.next().next().next(), SortDirection::Default);
    }

    #[test]
    fn test_aria_sort() {
        assert_eq!(SortDirection::Default.aria_sort(), "other");
        assert_eq!(SortDirection::Descending.aria_sort(), "descending");
    }

    #[test]
    fn test_push_replaces_existing_key() {
        let mut chain = SortChain::asc("A").then_asc("B");
        chain.push("A".into(), Direction::Desc);
        assert_eq!(chain.position(&"B".into()), Some(0));
        assert_eq!(chain.keys()[1].direction, Direction::Desc);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_step_labels() {
        let chain = SortChain::asc("A").then_desc("B").then_asc("C");
        let steps: Vec<_> = chain.steps().map(|(step, _)| step).collect();
        assert_eq!(steps, vec![SortStep::OrderBy, SortStep::ThenByDescending, SortStep::ThenBy]);
    }
}
