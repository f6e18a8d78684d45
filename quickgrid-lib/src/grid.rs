//! Grid state holder

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::GridConfig;
use crate::error::GridError;
use crate::error::UnsupportedOperatorError;
use crate::listener::ChangeListener;
use crate::model::Column;
use crate::model::ColumnId;
use crate::model::ColumnSet;
use crate::query::FilterClause;
use crate::query::FilterGroup;
use crate::query::FilterOperator;
use crate::query::GridQuery;
use crate::query::GroupOperator;
use crate::query::SortChain;
use crate::query::SortDirection;
use crate::query::SortState;
use crate::query::available_operators;
use crate::query::build_predicate;
use crate::query::can_add_clause;
use crate::query::coerce;
use crate::query::conflicting_operator;

/// Filter and sort state for one grid.
///
/// Columns are registered once. User actions (filter changes, sort toggles)
/// are applied one at a time and either succeed completely or leave the
/// state untouched. After every change the listener receives a fresh
/// [`GridQuery`] snapshot.
///
/// # Example
///
/// ```
/// use quickgrid_lib::model::{Column, ValueKind};
/// use quickgrid_lib::query::FilterOperator;
/// use quickgrid_lib::{Grid, QueryOptions};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Person {
///     name: &'static str,
///     age: i32,
/// }
///
/// let mut grid = Grid::new();
/// grid.register_column(Column::property("Name", ValueKind::Text, |p: &Person| p.name).sortable().filterable())?;
/// grid.register_column(Column::property("Age", ValueKind::Integer, |p: &Person| p.age).filterable())?;
///
/// grid.apply_filter("Age", FilterOperator::GreaterThan, "30")?;
/// grid.apply_filter("Name", FilterOperator::Contains, "jo")?;
///
/// let people = vec![Person { name: "John", age: 35 }, Person { name: "Anna", age: 20 }];
/// let view = grid.snapshot().apply_all(people, &QueryOptions::default());
/// assert_eq!(view, vec![Person { name: "John", age: 35 }]);
/// # Ok::<(), quickgrid_lib::error::GridError>(())
/// ```
pub struct Grid<T> {
    config: GridConfig,
    columns: Arc<ColumnSet<T>>,
    filters: Vec<FilterGroup>,
    modes: HashMap<ColumnId, GroupOperator>,
    sort: SortState,
    listener: Option<Box<dyn ChangeListener<T>>>,
}

impl<T> Grid<T> {
    /// Creates a grid with default configuration.
    pub fn new() -> Self {
        Self::with_config(GridConfig::default())
    }

    /// Creates a grid with the given configuration.
    pub fn with_config(config: GridConfig) -> Self {
        Self {
            config,
            columns: Arc::new(ColumnSet::new()),
            filters: Vec::new(),
            modes: HashMap::new(),
            sort: SortState::new(),
            listener: None,
        }
    }

    /// Sets the change listener.
    pub fn with_listener(mut self, listener: impl ChangeListener<T> + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    /// Replaces the change listener.
    pub fn set_listener(&mut self, listener: impl ChangeListener<T> + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Registers a column.
    ///
    /// # Errors
    ///
    /// - [`GridError::MissingAccessor`] if the column is sortable or
    ///   filterable but has no accessor.
    /// - [`GridError::DuplicateColumn`] if the name is taken.
    pub fn register_column(&mut self, column: Column<T>) -> Result<(), GridError> {
        if (column.is_sortable() || column.is_filterable()) && !column.has_accessor() {
            log::error!("Column '{}' is sortable or filterable but has no accessor", column.id());
            return Err(GridError::missing_accessor(column.id().as_str()));
        }
        let name = column.id().to_string();
        if !Arc::make_mut(&mut self.columns).insert(column) {
            return Err(GridError::DuplicateColumn { column: name });
        }
        log::debug!("Registered column '{}'", name);
        Ok(())
    }

    pub fn columns(&self) -> &ColumnSet<T> {
        &self.columns
    }

    /// Returns a registered column.
    pub fn column(&self, column: &ColumnId) -> Result<&Column<T>, GridError> {
        self.columns
            .get(column)
            .ok_or_else(|| GridError::unknown_column(column.as_str()))
    }

    /// Changes whether a column is sortable.
    ///
    /// Disabling sort on a sorted column drops it from the sort chain.
    pub fn set_sortable(&mut self, column: impl Into<ColumnId>, sortable: bool) -> Result<(), GridError> {
        let id = column.into();
        let current = self.column(&id)?;
        if sortable && !current.has_accessor() {
            log::error!("Column '{}' cannot be sortable without an accessor", id);
            return Err(GridError::missing_accessor(id.as_str()));
        }
        if let Some(col) = Arc::make_mut(&mut self.columns).get_mut(&id) {
            col.sortable = sortable;
        }
        if !sortable && self.sort.reset(&id) {
            self.notify();
        }
        Ok(())
    }

    /// Sets a single-clause filter on a column, replacing its current clauses.
    ///
    /// Empty input removes the column's filter and returns `Ok(None)`. The
    /// column's filter moves to the end of the filter list.
    ///
    /// # Errors
    ///
    /// Fails without changing state if the column is unknown or has no
    /// filter options, the input does not parse, or the operator does not
    /// apply to the column.
    pub fn apply_filter(
        &mut self,
        column: impl Into<ColumnId>,
        operator: FilterOperator,
        raw: &str,
    ) -> Result<Option<FilterClause>, GridError> {
        let id = column.into();
        let col = self.filterable_column(&id)?;
        let Some(operand) = coerce(col, raw)? else {
            if self.remove_group(&id) {
                log::debug!("Removed filter on '{}'", id);
                self.notify();
            }
            return Ok(None);
        };
        let predicate = build_predicate(col, operator, Some(operand.clone()))?;

        let clause = FilterClause {
            column: id.clone(),
            operator,
            operand: Some(operand),
            predicate,
        };
        let mode = self.filter_mode(&id);
        self.replace_group(FilterGroup::new(id.clone(), mode, vec![clause.clone()]));
        log::debug!("Filter on '{}': {} {:?}", id, operator, clause.operand);
        self.notify();
        Ok(Some(clause))
    }

    /// Replaces all clauses of a column's filter at once.
    ///
    /// Clauses join with the column's current [`filter_mode`](Self::filter_mode).
    /// An operand of `None` (or empty text) compares against null. An empty
    /// slice removes the filter.
    ///
    /// # Errors
    ///
    /// On top of the [`apply_filter`](Self::apply_filter) errors, fails with
    /// [`GridError::TooManyClauses`] above the column's clause bound and with
    /// [`UnsupportedOperatorError::Conflict`] when AND-mode clauses exclude
    /// each other. Nothing is applied unless every clause is valid.
    pub fn apply_filters(
        &mut self,
        column: impl Into<ColumnId>,
        clauses: &[(FilterOperator, Option<&str>)],
    ) -> Result<Option<FilterGroup>, GridError> {
        let id = column.into();
        let mode = self.filter_mode(&id);
        let col = self.filterable_column(&id)?;

        if clauses.is_empty() {
            if self.remove_group(&id) {
                self.notify();
            }
            return Ok(None);
        }

        let max = col.filter_limit(self.config.default_max_filters);
        if clauses.len() > max {
            return Err(GridError::TooManyClauses {
                column: id.to_string(),
                max,
            });
        }

        let category = col.category();
        let mut operators = Vec::with_capacity(clauses.len());
        let mut built = Vec::with_capacity(clauses.len());
        for &(operator, raw) in clauses {
            if let Some(other) = conflicting_operator(category, mode, operator, &operators) {
                return Err(UnsupportedOperatorError::conflict(id.as_str(), operator, other).into());
            }
            if !can_add_clause(mode, &operators, max) {
                return Err(UnsupportedOperatorError::conflict(id.as_str(), operator, FilterOperator::Equal).into());
            }
            let operand = match raw {
                Some(raw) => coerce(col, raw)?,
                None => None,
            };
            let predicate = build_predicate(col, operator, operand.clone())?;
            operators.push(operator);
            built.push(FilterClause {
                column: id.clone(),
                operator,
                operand,
                predicate,
            });
        }

        let group = FilterGroup::new(id.clone(), mode, built);
        self.replace_group(group.clone());
        log::debug!("Filter on '{}': {} clauses ({:?})", id, group.clauses.len(), mode);
        self.notify();
        Ok(Some(group))
    }

    /// Returns how a column's clauses are joined. Defaults to AND.
    pub fn filter_mode(&self, column: &ColumnId) -> GroupOperator {
        self.modes.get(column).copied().unwrap_or_default()
    }

    /// Switches a column between AND and OR mode.
    ///
    /// Switching from OR back to AND discards the column's clauses.
    pub fn toggle_filter_mode(&mut self, column: impl Into<ColumnId>) -> Result<GroupOperator, GridError> {
        let id = column.into();
        self.filterable_column(&id)?;
        let next = self.filter_mode(&id).toggled();
        self.modes.insert(id.clone(), next);

        let changed = match next {
            GroupOperator::And => self.remove_group(&id),
            GroupOperator::Or => match self.filters.iter_mut().find(|g| g.column == id) {
                Some(group) => {
                    group.mode = next;
                    true
                }
                None => false,
            },
        };
        log::debug!("Filter mode on '{}' is now {:?}", id, next);
        if changed {
            self.notify();
        }
        Ok(next)
    }

    /// Removes a column's filter. Returns `true` if there was one.
    pub fn clear_filter(&mut self, column: impl Into<ColumnId>) -> bool {
        let removed = self.remove_group(&column.into());
        if removed {
            self.notify();
        }
        removed
    }

    /// Removes every filter.
    pub fn clear_filters(&mut self) {
        if self.filters.is_empty() {
            return;
        }
        self.filters.clear();
        self.notify();
    }

    /// Returns a column's filter group.
    pub fn filter(&self, column: &ColumnId) -> Option<&FilterGroup> {
        self.filters.iter().find(|g| &g.column == column)
    }

    /// Returns the filter groups, least recently applied first.
    pub fn filters(&self) -> &[FilterGroup] {
        &self.filters
    }

    /// Returns the operators still selectable for a new clause on a column.
    pub fn available_operators(&self, column: &ColumnId) -> Result<Vec<FilterOperator>, GridError> {
        let col = self.filterable_column(column)?;
        let used = self.filter(column).map(FilterGroup::operators).unwrap_or_default();
        let mode = self.filter_mode(column);
        if !can_add_clause(mode, &used, col.filter_limit(self.config.default_max_filters)) {
            return Ok(Vec::new());
        }
        Ok(available_operators(col.category(), mode, &used))
    }

    /// Returns `true` if the column's filter can take another clause.
    pub fn can_add_filter(&self, column: &ColumnId) -> Result<bool, GridError> {
        let col = self.filterable_column(column)?;
        let used = self.filter(column).map(FilterGroup::operators).unwrap_or_default();
        Ok(can_add_clause(
            self.filter_mode(column),
            &used,
            col.filter_limit(self.config.default_max_filters),
        ))
    }

    /// Advances a column's sort direction and returns the new sort chain.
    ///
    /// # Errors
    ///
    /// Fails if the column is unknown or not sortable.
    pub fn toggle_sort(&mut self, column: impl Into<ColumnId>) -> Result<&SortChain, GridError> {
        let id = column.into();
        let col = self.column(&id)?;
        if !col.is_sortable() {
            return Err(GridError::NotSortable { column: id.to_string() });
        }
        let multi_sort = col.allows_multi_sort();
        self.sort.toggle(&id, multi_sort);
        self.notify();
        Ok(self.sort.chain())
    }

    /// Returns a column's sort direction.
    pub fn sort_direction(&self, column: &ColumnId) -> SortDirection {
        self.sort.direction(column)
    }

    /// Returns the `aria-sort` value for a column header.
    pub fn aria_sort(&self, column: &ColumnId) -> &'static str {
        match self.columns.get(column) {
            Some(col) if col.is_sortable() => self.sort.direction(column).aria_sort(),
            _ => "none",
        }
    }

    pub fn sort_chain(&self) -> &SortChain {
        self.sort.chain()
    }

    /// Returns a snapshot of the current filters and sort keys.
    pub fn snapshot(&self) -> GridQuery<T> {
        GridQuery::new(Arc::clone(&self.columns), self.filters.clone(), self.sort.chain().clone())
    }

    fn filterable_column(&self, column: &ColumnId) -> Result<&Column<T>, GridError> {
        let col = self.column(column)?;
        if !col.is_filterable() {
            return Err(GridError::NotFilterable {
                column: column.to_string(),
            });
        }
        Ok(col)
    }

    fn remove_group(&mut self, column: &ColumnId) -> bool {
        let before = self.filters.len();
        self.filters.retain(|g| &g.column != column);
        self.filters.len() != before
    }

    fn replace_group(&mut self, group: FilterGroup) {
        self.remove_group(&group.column);
        self.filters.push(group);
    }

    fn notify(&mut self) {
        if self.listener.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(listener) = self.listener.as_mut() {
            listener.on_change(snapshot);
        }
    }
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("config", &self.config)
            .field("columns", &self.columns)
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::ParseError;
    use crate::model::ValueKind;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: String,
        age: Option<i32>,
    }

    fn grid() -> Grid<Row> {
        let mut grid = Grid::new();
        grid.register_column(
            Column::property("Name", ValueKind::Text, |r: &Row| r.name.clone())
                .sortable()
                .filterable(),
        )
        .unwrap();
        grid.register_column(
            Column::property("Age", ValueKind::Integer, |r: &Row| r.age)
                .nullable()
                .sortable()
                .multi_sort()
                .max_filters(3),
        )
        .unwrap();
        grid.register_column(Column::template("Actions")).unwrap();
        grid
    }

    fn id(name: &str) -> ColumnId {
        ColumnId::new(name)
    }

    #[test]
    fn test_register_rejects_missing_accessor() {
        let mut grid = Grid::<Row>::new();
        let err = grid.register_column(Column::template("Actions").sortable()).unwrap_err();
        assert_eq!(err, GridError::missing_accessor("Actions"));
        assert!(!err.is_recoverable());
        assert!(grid.columns().is_empty());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut grid = grid();
        let err = grid.register_column(Column::template("Name")).unwrap_err();
        assert!(matches!(err, GridError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_empty_input_removes_filter() {
        let mut grid = grid();
        grid.apply_filter("Name", FilterOperator::Contains, "jo").unwrap();
        assert!(grid.filter(&id("Name")).is_some());
        assert_eq!(grid.apply_filter("Name", FilterOperator::Contains, "").unwrap(), None);
        assert!(grid.filters().is_empty());
    }

    #[test]
    fn test_parse_error_keeps_state() {
        let mut grid = grid();
        grid.apply_filter("Age", FilterOperator::Equal, "3").unwrap();
        let err = grid.apply_filter("Age", FilterOperator::Equal, "three").unwrap_err();
        assert_eq!(err, GridError::Parse(ParseError::new("Age", "three", "integer")));
        assert!(err.is_recoverable());
        let group = grid.filter(&id("Age")).unwrap();
        assert_eq!(group.clauses()[0].operand(), Some(&crate::model::Value::Int(3)));
    }

    #[test]
    fn test_reapplied_filter_moves_to_end() {
        let mut grid = grid();
        grid.apply_filter("Name", FilterOperator::Contains, "a").unwrap();
        grid.apply_filter("Age", FilterOperator::Equal, "1").unwrap();
        grid.apply_filter("Name", FilterOperator::Contains, "b").unwrap();
        let order: Vec<_> = grid.filters().iter().map(|g| g.column().to_string()).collect();
        assert_eq!(order, vec!["Age", "Name"]);
    }

    #[test]
    fn test_unknown_and_unfilterable_columns() {
        let mut grid = grid();
        assert_eq!(
            grid.apply_filter("Nope", FilterOperator::Equal, "1").unwrap_err(),
            GridError::unknown_column("Nope")
        );
        assert!(matches!(
            grid.apply_filter("Actions", FilterOperator::Equal, "1").unwrap_err(),
            GridError::NotFilterable { .. }
        ));
        assert!(matches!(grid.toggle_sort("Actions").unwrap_err(), GridError::NotSortable { .. }));
    }

    #[test]
    fn test_advanced_filter_limits() {
        let mut grid = grid();
        let err = grid
            .apply_filters(
                "Age",
                &[
                    (FilterOperator::NotEqual, Some("1")),
                    (FilterOperator::NotEqual, Some("2")),
                    (FilterOperator::NotEqual, Some("3")),
                    (FilterOperator::NotEqual, Some("4")),
                ],
            )
            .unwrap_err();
        assert_eq!(
            err,
            GridError::TooManyClauses {
                column: "Age".to_string(),
                max: 3
            }
        );
        assert!(grid.filters().is_empty());
    }

    #[test]
    fn test_advanced_filter_conflicts() {
        let mut grid = grid();
        let err = grid
            .apply_filters(
                "Age",
                &[
                    (FilterOperator::GreaterThan, Some("1")),
                    (FilterOperator::GreaterThanOrEqual, Some("2")),
                ],
            )
            .unwrap_err();
        assert_eq!(
            err,
            GridError::Operator(UnsupportedOperatorError::conflict(
                "Age",
                FilterOperator::GreaterThanOrEqual,
                FilterOperator::GreaterThan
            ))
        );

        let err = grid
            .apply_filters(
                "Age",
                &[(FilterOperator::Equal, Some("1")), (FilterOperator::Equal, Some("2"))],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            GridError::Operator(UnsupportedOperatorError::Conflict { .. })
        ));
    }

    #[test]
    fn test_advanced_filter_range() {
        let mut grid = grid();
        grid.apply_filters(
            "Age",
            &[
                (FilterOperator::GreaterThanOrEqual, Some("18")),
                (FilterOperator::LessThan, Some("65")),
            ],
        )
        .unwrap();
        assert_eq!(
            grid.available_operators(&id("Age")).unwrap(),
            vec![FilterOperator::NotEqual]
        );
        assert!(grid.can_add_filter(&id("Age")).unwrap());
    }

    #[test]
    fn test_or_mode_and_reset() {
        let mut grid = grid();
        assert_eq!(grid.toggle_filter_mode("Age").unwrap(), GroupOperator::Or);
        grid.apply_filters(
            "Age",
            &[(FilterOperator::Equal, Some("1")), (FilterOperator::Equal, Some("2"))],
        )
        .unwrap();
        assert_eq!(grid.filter(&id("Age")).map(FilterGroup::mode), Some(GroupOperator::Or));

        assert_eq!(grid.toggle_filter_mode("Age").unwrap(), GroupOperator::And);
        assert!(grid.filter(&id("Age")).is_none());
    }

    #[test]
    fn test_full_group_offers_no_operators() {
        let mut grid = grid();
        grid.toggle_filter_mode("Age").unwrap();
        grid.apply_filters(
            "Age",
            &[
                (FilterOperator::Equal, Some("1")),
                (FilterOperator::Equal, Some("2")),
                (FilterOperator::Equal, Some("3")),
            ],
        )
        .unwrap();
        assert!(!grid.can_add_filter(&id("Age")).unwrap());
        assert!(grid.available_operators(&id("Age")).unwrap().is_empty());

        grid.toggle_filter_mode("Age").unwrap();
        grid.apply_filter("Age", FilterOperator::Equal, "4").unwrap();
        assert!(!grid.can_add_filter(&id("Age")).unwrap());
        assert!(grid.available_operators(&id("Age")).unwrap().is_empty());
    }

    #[test]
    fn test_listener_sees_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut grid = grid().with_listener(move |q: GridQuery<Row>| {
            sink.borrow_mut().push((q.filters().len(), q.sort_chain().len()));
        });

        grid.apply_filter("Name", FilterOperator::Contains, "a").unwrap();
        grid.toggle_sort("Name").unwrap();
        let _ = grid.apply_filter("Age", FilterOperator::Equal, "x");
        grid.clear_filter("Name");
        grid.clear_filter("Name");

        assert_eq!(*seen.borrow(), vec![(1, 0), (1, 1), (0, 1)]);
    }

    #[test]
    fn test_set_sortable_drops_sort() {
        let mut grid = grid();
        grid.toggle_sort("Name").unwrap();
        grid.set_sortable("Name", false).unwrap();
        assert!(grid.sort_chain().is_empty());
        assert_eq!(grid.aria_sort(&id("Name")), "none");
        assert_eq!(
            grid.set_sortable("Actions", true).unwrap_err(),
            GridError::missing_accessor("Actions")
        );
    }

    #[test]
    fn test_aria_sort() {
        let mut grid = grid();
        assert_eq!(grid.aria_sort(&id("Age")), "other");
        grid.toggle_sort("Age").unwrap();
        assert_eq!(grid.aria_sort(&id("Age")), "ascending");
        assert_eq!(grid.aria_sort(&id("Actions")), "none");
    }
}
