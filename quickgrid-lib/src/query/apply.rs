//! Applying a filter/sort snapshot to records.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::Direction;
use super::FilterGroup;
use super::Lambda;
use super::LogicalOp;
use super::SortChain;
use super::SortKey;
use super::SortStep;
use super::combine::combine;
use super::odata::lambda_to_odata;
use super::odata::order_to_odata;
use super::rewrite::rewrite;
use crate::QueryOptions;
use crate::model::ColumnId;
use crate::model::ColumnSet;

/// An immutable snapshot of a grid's filters and sort keys.
///
/// Handed to change listeners. Hosts either apply it to records directly
/// ([`apply_all`](Self::apply_all)) or export the predicate and sort chain
/// to another backend ([`combine_predicate`](Self::combine_predicate),
/// [`to_odata`](Self::to_odata)).
pub struct GridQuery<T> {
    columns: Arc<ColumnSet<T>>,
    filters: Vec<FilterGroup>,
    sort: SortChain,
}

impl<T> GridQuery<T> {
    pub(crate) fn new(columns: Arc<ColumnSet<T>>, filters: Vec<FilterGroup>, sort: SortChain) -> Self {
        Self { columns, filters, sort }
    }

    /// Returns the filter groups, in the order they were last applied.
    pub fn filters(&self) -> &[FilterGroup] {
        &self.filters
    }

    /// Returns the sort keys, primary first.
    pub fn sort_chain(&self) -> &SortChain {
        &self.sort
    }

    pub fn columns(&self) -> &ColumnSet<T> {
        &self.columns
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn has_sort(&self) -> bool {
        !self.sort.is_empty()
    }

    /// Returns every group's predicate joined with `op`, as built.
    ///
    /// Returns `None` when no filter is set.
    pub fn combine_predicate(&self, op: LogicalOp) -> Option<Lambda> {
        let mut groups = self.filters.iter().filter_map(FilterGroup::predicate);
        let first = groups.next()?;
        Some(combine(first, groups, op))
    }

    /// Returns the combined predicate rewritten for in-memory evaluation.
    pub fn combine_predicate_for_in_memory(&self, options: &QueryOptions) -> Option<Lambda> {
        self.combine_predicate(options.combinator)
            .map(|lambda| rewrite(&lambda, options.rewrite_policy()))
    }

    /// Returns the in-memory predicate as a callable.
    pub fn compile(&self, options: &QueryOptions) -> Option<CompiledPredicate<T>> {
        self.combine_predicate_for_in_memory(options)
            .map(|lambda| CompiledPredicate {
                lambda,
                columns: Arc::clone(&self.columns),
            })
    }

    /// Keeps the records matching every filter. Without filters the records
    /// are returned as they are.
    pub fn apply_filter<I>(&self, records: I, options: &QueryOptions) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
    {
        match self.compile(options) {
            Some(predicate) => records.into_iter().filter(|r| predicate.matches(r)).collect(),
            None => records.into_iter().collect(),
        }
    }

    /// Sorts records by the chain. Returns `None` when no key is active.
    ///
    /// The sort is stable: records equal on every key keep their order.
    pub fn apply_sort(&self, mut records: Vec<T>) -> Option<Vec<T>> {
        if self.sort.is_empty() {
            return None;
        }
        records.sort_by(|a, b| self.compare(a, b));
        Some(records)
    }

    /// Filters, then sorts. Without sort keys the filtered order is kept.
    pub fn apply_all<I>(&self, records: I, options: &QueryOptions) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
    {
        let filtered = self.apply_filter(records, options);
        log::debug!(
            "Applied {} filter groups, {} sort keys: {} records",
            self.filters.len(),
            self.sort.len(),
            filtered.len()
        );
        if self.sort.is_empty() {
            return filtered;
        }
        let mut sorted = filtered;
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }

    /// Returns the sort keys labelled for a LINQ-style backend.
    pub fn sort_steps(&self) -> Vec<(SortStep, ColumnId)> {
        self.sort
            .steps()
            .map(|(step, key)| (step, key.column.clone()))
            .collect()
    }

    /// Exports the snapshot as OData query options.
    pub fn to_odata(&self, op: LogicalOp) -> ODataQuery {
        ODataQuery {
            filter: self.combine_predicate(op).map(|lambda| lambda_to_odata(&lambda)),
            orderby: (!self.sort.is_empty()).then(|| order_to_odata(&self.sort)),
        }
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.sort
            .keys()
            .iter()
            .map(|key| self.compare_key(key, a, b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    fn compare_key(&self, key: &SortKey, a: &T, b: &T) -> Ordering {
        let ordering = self
            .columns
            .read(&key.column, a)
            .sort_cmp(&self.columns.read(&key.column, b));
        match key.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

impl<T> Clone for GridQuery<T> {
    fn clone(&self) -> Self {
        Self {
            columns: Arc::clone(&self.columns),
            filters: self.filters.clone(),
            sort: self.sort.clone(),
        }
    }
}

impl<T> fmt::Debug for GridQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridQuery")
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .finish()
    }
}

/// A predicate closed over the column accessors it reads.
pub struct CompiledPredicate<T> {
    lambda: Lambda,
    columns: Arc<ColumnSet<T>>,
}

impl<T> CompiledPredicate<T> {
    /// Returns `true` if the record passes.
    pub fn matches(&self, record: &T) -> bool {
        self.lambda.evaluate(record, &self.columns)
    }

    /// Returns the predicate being evaluated.
    pub fn lambda(&self) -> &Lambda {
        &self.lambda
    }

    /// Converts into a plain closure.
    pub fn into_fn(self) -> impl Fn(&T) -> bool {
        move |record| self.matches(record)
    }
}

impl<T> fmt::Debug for CompiledPredicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledPredicate").field(&self.lambda.to_string()).finish()
    }
}

/// OData query options produced from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ODataQuery {
    /// The `$filter` expression, if any filter is set.
    pub filter: Option<String>,
    /// The `$orderby` expression, if any sort key is active.
    pub orderby: Option<String>,
}

impl ODataQuery {
    /// Builds the query string (without a leading `?`).
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(filter) = &self.filter {
            params.push(format!("$filter={}", filter));
        }
        if let Some(orderby) = &self.orderby {
            params.push(format!("$orderby={}", orderby));
        }
        params.join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;
    use crate::model::ValueKind;
    use crate::query::FilterClause;
    use crate::query::FilterOperator;
    use crate::query::GroupOperator;
    use crate::query::build_predicate;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: &'static str,
        age: Option<i32>,
    }

    fn person(name: &'static str, age: Option<i32>) -> Person {
        Person { name, age }
    }

    fn columns() -> Arc<ColumnSet<Person>> {
        let mut set = ColumnSet::new();
        set.insert(Column::property("Name", ValueKind::Text, |p: &Person| p.name));
        set.insert(Column::property("Age", ValueKind::Integer, |p: &Person| p.age).nullable());
        Arc::new(set)
    }

    fn group(columns: &ColumnSet<Person>, column: &str, operator: FilterOperator, value: crate::model::Value) -> FilterGroup {
        let id = ColumnId::new(column);
        let predicate = build_predicate(columns.get(&id).unwrap(), operator, Some(value.clone())).unwrap();
        FilterGroup::new(
            id.clone(),
            GroupOperator::And,
            vec![FilterClause {
                column: id,
                operator,
                operand: Some(value),
                predicate,
            }],
        )
    }

    #[test]
    fn test_empty_snapshot_passes_through() {
        let query = GridQuery::new(columns(), Vec::new(), SortChain::new());
        let records = vec![person("B", None), person("A", Some(1))];
        assert_eq!(query.combine_predicate(LogicalOp::AndAlso), None);
        assert!(query.apply_sort(records.clone()).is_none());
        assert_eq!(query.apply_all(records.clone(), &QueryOptions::default()), records);
    }

    #[test]
    fn test_descending_sort_puts_nulls_last() {
        let query = GridQuery::new(columns(), Vec::new(), SortChain::desc("Age"));
        let sorted = query
            .apply_sort(vec![person("A", None), person("B", Some(1)), person("C", Some(9))])
            .unwrap();
        let names: Vec<_> = sorted.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_sort_is_stable_across_keys() {
        let query = GridQuery::new(columns(), Vec::new(), SortChain::asc("Age").then_desc("Name"));
        let sorted = query
            .apply_sort(vec![person("A", Some(2)), person("B", Some(1)), person("C", Some(2))])
            .unwrap();
        let names: Vec<_> = sorted.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_sort_with_nan_scores_is_ordered() {
        struct Reading {
            score: f64,
        }
        let mut set = ColumnSet::new();
        set.insert(Column::property("Score", ValueKind::Float, |r: &Reading| r.score));
        let query = GridQuery::new(Arc::new(set), Vec::new(), SortChain::asc("Score"));

        let readings = (0..200)
            .map(|i| Reading {
                score: if i % 7 == 0 { f64::NAN } else { ((i * 37) % 100) as f64 },
            })
            .collect::<Vec<_>>();
        let sorted = query.apply_all(readings, &QueryOptions::default());
        let scores: Vec<f64> = sorted.iter().map(|r| r.score).collect();

        let nans = scores.iter().take_while(|s| s.is_nan()).count();
        assert_eq!(nans, 29);
        let rest = &scores[nans..];
        assert!(rest.iter().all(|s| !s.is_nan()));
        assert!(rest.windows(2).all(|w| w[0] <= w[1]), "{rest:?}");
    }

    #[test]
    fn test_odata_export() {
        let cols = columns();
        let filters = vec![
            group(&cols, "Age", FilterOperator::GreaterThan, 30.into()),
            group(&cols, "Name", FilterOperator::Contains, "jo".into()),
        ];
        let query = GridQuery::new(cols, filters, SortChain::asc("Name"));
        let odata = query.to_odata(LogicalOp::AndAlso);
        assert_eq!(
            odata.to_query_string(),
            "$filter=(Age gt 30 and contains(Name,'jo'))&$orderby=Name asc"
        );
    }

    #[test]
    fn test_compiled_predicate() {
        let cols = columns();
        let filters = vec![group(&cols, "Name", FilterOperator::StartsWith, "an".into())];
        let query = GridQuery::new(cols, filters, SortChain::new());
        let matches = query.compile(&QueryOptions::default()).unwrap().into_fn();
        assert!(matches(&person("Anna", None)));
        assert!(!matches(&person("John", None)));
    }

    #[test]
    fn test_sort_steps() {
        let query = GridQuery::new(columns(), Vec::new(), SortChain::desc("Age").then_asc("Name"));
        assert_eq!(
            query.sort_steps(),
            vec![
                (SortStep::OrderByDescending, ColumnId::new("Age")),
                (SortStep::ThenBy, ColumnId::new("Name")),
            ]
        );
    }
}
