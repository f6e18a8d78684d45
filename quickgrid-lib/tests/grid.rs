//! End-to-end filter and sort scenarios.

use quickgrid_lib::error::GridError;
use quickgrid_lib::model::Column;
use quickgrid_lib::model::ColumnId;
use quickgrid_lib::model::ValueKind;
use quickgrid_lib::query::FilterOperator;
use quickgrid_lib::query::LogicalOp;
use quickgrid_lib::query::SortDirection;
use quickgrid_lib::query::SortStep;
use quickgrid_lib::{Grid, QueryOptions};

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: String,
    age: Option<i32>,
    city: Option<String>,
}

fn person(name: &str, age: Option<i32>) -> Person {
    Person {
        name: name.to_string(),
        age,
        city: None,
    }
}

fn grid(name_multi_sort: bool) -> Grid<Person> {
    let mut grid = Grid::new();
    let mut name = Column::property("Name", ValueKind::Text, |p: &Person| p.name.clone())
        .sortable()
        .filterable();
    if name_multi_sort {
        name = name.multi_sort();
    }
    grid.register_column(name).unwrap();
    grid.register_column(
        Column::property("Age", ValueKind::Integer, |p: &Person| p.age)
            .nullable()
            .sortable()
            .multi_sort()
            .filterable(),
    )
    .unwrap();
    grid.register_column(
        Column::property("City", ValueKind::Text, |p: &Person| p.city.clone())
            .nullable()
            .sortable()
            .filterable(),
    )
    .unwrap();
    grid
}

fn names(people: &[Person]) -> Vec<&str> {
    people.iter().map(|p| p.name.as_str()).collect()
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_filter_groups_combine_with_and() {
    let mut grid = grid(false);
    grid.apply_filter("Age", FilterOperator::GreaterThan, "30").unwrap();
    grid.apply_filter("Name", FilterOperator::Contains, "jo").unwrap();

    let records = vec![person("John", Some(35)), person("Anna", Some(20))];
    let view = grid.snapshot().apply_all(records, &QueryOptions::default());
    assert_eq!(view, vec![person("John", Some(35))]);
}

#[test]
fn test_single_clause_matches_direct_evaluation() {
    let mut grid = grid(false);
    let clause = grid
        .apply_filter("Age", FilterOperator::LessThanOrEqual, "20")
        .unwrap()
        .unwrap();
    let snapshot = grid.snapshot();
    let combined = snapshot.combine_predicate(LogicalOp::AndAlso).unwrap();
    assert_eq!(&combined, clause.predicate());

    for record in [person("A", Some(10)), person("B", Some(20)), person("C", Some(30))] {
        assert_eq!(
            combined.evaluate(&record, snapshot.columns()),
            clause.predicate().evaluate(&record, snapshot.columns())
        );
    }
}

#[test]
fn test_case_fold_policy() {
    let mut grid = grid(false);
    grid.apply_filter("Name", FilterOperator::Contains, "jo").unwrap();
    let snapshot = grid.snapshot();
    let records = vec![person("John", None)];

    let folded = QueryOptions::default().with_case_fold(true);
    let exact = QueryOptions::default().with_case_fold(false);
    assert_eq!(snapshot.apply_filter(records.clone(), &folded).len(), 1);
    assert!(snapshot.apply_filter(records, &exact).is_empty());
}

#[test]
fn test_null_default_policy() {
    let mut grid = grid(false);
    let records = vec![person("Nobody", None)];

    grid.apply_filter("Age", FilterOperator::Equal, "5").unwrap();
    let five = grid.snapshot();
    grid.apply_filter("Age", FilterOperator::Equal, "0").unwrap();
    let zero = grid.snapshot();

    let guarded = QueryOptions::default().with_null_default(false);
    let defaulted = QueryOptions::default().with_null_default(true);
    assert!(five.apply_filter(records.clone(), &guarded).is_empty());
    assert!(five.apply_filter(records.clone(), &defaulted).is_empty());
    assert!(zero.apply_filter(records.clone(), &guarded).is_empty());
    assert_eq!(zero.apply_filter(records, &defaulted).len(), 1);
}

#[test]
fn test_or_combinator_across_groups() {
    let mut grid = grid(false);
    grid.apply_filter("Age", FilterOperator::GreaterThan, "30").unwrap();
    grid.apply_filter("Name", FilterOperator::StartsWith, "an").unwrap();

    let records = vec![
        person("John", Some(35)),
        person("Anna", Some(20)),
        person("Bob", Some(10)),
    ];
    let options = QueryOptions::default().with_combinator(LogicalOp::OrElse);
    let view = grid.snapshot().apply_all(records, &options);
    assert_eq!(names(&view), vec!["John", "Anna"]);
}

#[test]
fn test_empty_filter_is_pass_through() {
    let grid = grid(false);
    let records = vec![person("B", None), person("A", None)];
    assert_eq!(grid.snapshot().apply_all(records.clone(), &QueryOptions::default()), records);
}

#[test]
fn test_advanced_group_modes() {
    let mut grid = grid(false);
    grid.toggle_filter_mode("Age").unwrap();
    grid.apply_filters(
        "Age",
        &[
            (FilterOperator::LessThan, Some("18")),
            (FilterOperator::GreaterThanOrEqual, Some("65")),
        ],
    )
    .unwrap();

    let records = vec![
        person("Kid", Some(10)),
        person("Adult", Some(40)),
        person("Senior", Some(70)),
        person("Unknown", None),
    ];
    let view = grid.snapshot().apply_all(records, &QueryOptions::default());
    assert_eq!(names(&view), vec!["Kid", "Senior"]);
}

#[test]
fn test_string_equal_is_exclusive_in_and_mode() {
    let mut grid = grid(false);
    let err = grid
        .apply_filters(
            "Name",
            &[
                (FilterOperator::Contains, Some("a")),
                (FilterOperator::Equal, Some("Anna")),
            ],
        )
        .unwrap_err();
    assert!(err.is_recoverable());
    assert!(matches!(err, GridError::Operator(_)));
    assert!(grid.filters().is_empty());
}

#[test]
fn test_absent_operand_matches_missing_values() {
    let mut grid = grid(false);
    grid.apply_filters("City", &[(FilterOperator::Contains, None)]).unwrap();

    let mut paris = person("P", None);
    paris.city = Some("Paris".to_string());
    let records = vec![person("N", None), paris];
    let view = grid.snapshot().apply_all(records, &QueryOptions::default());
    assert_eq!(names(&view), vec!["N"]);
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn test_sort_by_name() {
    let mut grid = grid(false);
    grid.toggle_sort("Name").unwrap();
    let records = vec![person("Bob", None), person("Amy", None)];
    let sorted = grid.snapshot().apply_sort(records).unwrap();
    assert_eq!(names(&sorted), vec!["Amy", "Bob"]);
}

#[test]
fn test_secondary_key_keeps_total_order() {
    let mut grid = grid(true);
    grid.toggle_sort("Name").unwrap();
    grid.toggle_sort("Age").unwrap();
    assert_eq!(grid.sort_chain().len(), 2);

    let records = vec![person("Bob", Some(1)), person("Amy", Some(2))];
    let sorted = grid.snapshot().apply_sort(records).unwrap();
    assert_eq!(names(&sorted), vec!["Amy", "Bob"]);
}

#[test]
fn test_three_toggles_cycle_back() {
    let mut grid = grid(false);
    let name = ColumnId::new("Name");

    assert_eq!(grid.toggle_sort("Name").unwrap().len(), 1);
    assert_eq!(grid.sort_direction(&name), SortDirection::Ascending);
    assert_eq!(grid.toggle_sort("Name").unwrap().len(), 1);
    assert_eq!(grid.sort_direction(&name), SortDirection::Descending);
    assert!(grid.toggle_sort("Name").unwrap().is_empty());
    assert_eq!(grid.sort_direction(&name), SortDirection::Default);
}

#[test]
fn test_multi_sort_isolation() {
    let mut grid = grid(true);
    let (name, age) = (ColumnId::new("Name"), ColumnId::new("Age"));

    grid.toggle_sort("Age").unwrap();
    grid.toggle_sort("Name").unwrap();
    assert_eq!(grid.sort_direction(&age), SortDirection::Ascending);

    let mut grid = self::grid(false);
    grid.toggle_sort("Age").unwrap();
    grid.toggle_sort("Name").unwrap();
    assert_eq!(grid.sort_direction(&age), SortDirection::Default);
    assert_eq!(grid.sort_direction(&name), SortDirection::Ascending);
    assert_eq!(grid.sort_chain().len(), 1);
}

#[test]
fn test_sort_steps_and_odata() {
    let mut grid = grid(true);
    grid.toggle_sort("Age").unwrap();
    grid.toggle_sort("Age").unwrap();
    grid.toggle_sort("Name").unwrap();
    grid.apply_filter("City", FilterOperator::Equal, "O'Fallon").unwrap();

    let snapshot = grid.snapshot();
    assert_eq!(
        snapshot.sort_steps(),
        vec![
            (SortStep::OrderByDescending, ColumnId::new("Age")),
            (SortStep::ThenBy, ColumnId::new("Name")),
        ]
    );
    assert_eq!(
        snapshot.to_odata(LogicalOp::AndAlso).to_query_string(),
        "$filter=City eq 'O''Fallon'&$orderby=Age desc,Name asc"
    );
}
