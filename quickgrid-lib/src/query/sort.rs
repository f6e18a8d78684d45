//! Per-column sort state machine.

use std::collections::HashMap;

use super::SortChain;
use super::SortDirection;
use crate::model::ColumnId;

/// Current direction of every column plus the resulting [`SortChain`].
///
/// Columns start in [`SortDirection::Default`] and are absent from the
/// chain until toggled.
#[derive(Debug, Clone, Default)]
pub struct SortState {
    directions: HashMap<ColumnId, SortDirection>,
    chain: SortChain,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances a column's direction and updates the chain.
    ///
    /// When the toggled column does not allow multi-column sort, every other
    /// column is reset to `Default` first. The column's own key is removed
    /// and, if the new state is active, appended at the end.
    pub fn toggle(&mut self, column: &ColumnId, multi_sort: bool) -> &SortChain {
        if !multi_sort {
            let others: Vec<ColumnId> = self.directions.keys().filter(|id| *id != column).cloned().collect();
            for other in others {
                if self.directions.remove(&other).is_some_and(SortDirection::is_active) {
                    log::debug!("Resetting sort on '{}'", other);
                }
                self.chain.remove(&other);
            }
        }

        let next = self.direction(column).next();
        self.chain.remove(column);
        match next.direction() {
            Some(direction) => {
                self.directions.insert(column.clone(), next);
                self.chain.push(column.clone(), direction);
            }
            None => {
                self.directions.remove(column);
            }
        }
        log::debug!("Sort on '{}' is now {:?} ({} keys)", column, next, self.chain.len());
        &self.chain
    }

    /// Returns a column's current direction.
    pub fn direction(&self, column: &ColumnId) -> SortDirection {
        self.directions.get(column).copied().unwrap_or_default()
    }

    /// Resets one column to `Default`. Returns `true` if it was active.
    pub fn reset(&mut self, column: &ColumnId) -> bool {
        self.chain.remove(column);
        self.directions.remove(column).is_some_and(SortDirection::is_active)
    }

    /// Resets every column.
    pub fn clear(&mut self) {
        self.directions.clear();
        self.chain.clear();
    }

    /// Returns the active keys, primary first.
    pub fn chain(&self) -> &SortChain {
        &self.chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Direction;

    fn id(name: &str) -> ColumnId {
        ColumnId::new(name)
    }

    #[test]
    fn test_three_toggles_return_to_default() {
        let mut state = SortState::new();
        let name = id("Name");

        let chain = state.toggle(&name, false).clone();
        assert_eq!(state.direction(&name), SortDirection::Ascending);
        assert_eq!(chain.keys()[0].direction, Direction::Asc);

        let chain = state.toggle(&name, false).clone();
        assert_eq!(state.direction(&name), SortDirection::Descending);
        assert_eq!(chain.keys()[0].direction, Direction::Desc);

        assert!(state.toggle(&name, false).is_empty());
        assert_eq!(state.direction(&name), SortDirection::Default);
    }

    #[test]
    fn test_single_sort_resets_others() {
        let mut state = SortState::new();
        state.toggle(&id("A"), false);
        state.toggle(&id("B"), false);
        assert_eq!(state.direction(&id("A")), SortDirection::Default);
        assert_eq!(state.chain().len(), 1);
        assert_eq!(state.chain().position(&id("B")), Some(0));
    }

    #[test]
    fn test_multi_sort_keeps_others() {
        let mut state = SortState::new();
        state.toggle(&id("A"), true);
        state.toggle(&id("B"), true);
        state.toggle(&id("B"), true);
        assert_eq!(state.direction(&id("A")), SortDirection::Ascending);
        assert_eq!(state.direction(&id("B")), SortDirection::Descending);
        assert_eq!(state.chain().position(&id("A")), Some(0));
        assert_eq!(state.chain().position(&id("B")), Some(1));
    }

    #[test]
    fn test_retoggle_moves_key_to_end() {
        let mut state = SortState::new();
        state.toggle(&id("A"), true);
        state.toggle(&id("B"), true);
        state.toggle(&id("A"), true);
        assert_eq!(state.chain().position(&id("B")), Some(0));
        assert_eq!(state.chain().position(&id("A")), Some(1));
    }

    #[test]
    fn test_reset() {
        let mut state = SortState::new();
        state.toggle(&id("A"), true);
        assert!(state.reset(&id("A")));
        assert!(!state.reset(&id("A")));
        assert!(state.chain().is_empty());
    }
}
