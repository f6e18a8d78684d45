//! Column descriptors and the column registry

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::Value;
use super::ValueCategory;
use super::ValueKind;
use crate::query::coerce::ParseFn;
use crate::query::coerce::parser_for;

/// Reads one field from a record.
pub type Accessor<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;

/// Identifies a registered column by name.
///
/// The name doubles as the field name when predicates are exported to a
/// remote query language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(String);

impl ColumnId {
    /// Creates a column id.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the column name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ColumnId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&ColumnId> for ColumnId {
    fn from(id: &ColumnId) -> Self {
        id.clone()
    }
}

/// Column configuration.
///
/// Columns bind a record field (through an accessor) to a value kind and
/// declare whether the grid may sort or filter on it.
///
/// # Examples
///
/// ```
/// use quickgrid_lib::model::{Column, ValueKind};
///
/// struct Person {
///     name: String,
///     age: Option<i32>,
/// }
///
/// let columns: Vec<Column<Person>> = vec![
///     Column::property("Name", ValueKind::Text, |p: &Person| p.name.clone())
///         .sortable()
///         .filterable(),
///     Column::property("Age", ValueKind::Integer, |p: &Person| p.age)
///         .nullable()
///         .sortable()
///         .multi_sort(),
///     Column::template("Actions"),
/// ];
/// ```
pub struct Column<T> {
    pub(crate) id: ColumnId,
    pub(crate) title: Option<String>,
    pub(crate) accessor: Option<Accessor<T>>,
    pub(crate) kind: ValueKind,
    pub(crate) nullable: bool,
    pub(crate) members: Vec<String>,
    pub(crate) sortable: bool,
    pub(crate) multi_sort: bool,
    pub(crate) filterable: bool,
    pub(crate) max_filters: Option<usize>,
    pub(crate) parse: ParseFn,
}

impl<T> Column<T> {
    /// Creates a column bound to a record field.
    pub fn property<V, F>(name: impl Into<String>, kind: ValueKind, accessor: F) -> Self
    where
        T: 'static,
        V: Into<Value> + 'static,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let accessor: Accessor<T> = Arc::new(move |record: &T| accessor(record).into());
        Self {
            accessor: Some(accessor),
            ..Self::template(name).kind(kind)
        }
    }

    /// Creates a display-only column without an accessor.
    ///
    /// Template columns can never be sorted or filtered.
    pub fn template(name: impl Into<String>) -> Self {
        Self {
            id: ColumnId::new(name),
            title: None,
            accessor: None,
            kind: ValueKind::Text,
            nullable: false,
            members: Vec::new(),
            sortable: false,
            multi_sort: false,
            filterable: false,
            max_filters: None,
            parse: parser_for(ValueKind::Text),
        }
    }

    fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self.parse = parser_for(kind);
        self
    }

    /// Sets the header title. Defaults to the column name.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Marks the field as possibly absent.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Declares the member names of an enumeration column, in ordinal order.
    pub fn members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }

    /// Makes the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Lets this column's sort coexist with other active sorts.
    pub fn multi_sort(mut self) -> Self {
        self.multi_sort = true;
        self
    }

    /// Enables filter options for the column.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Sets the maximum number of filter clauses. Values below 2 become 2.
    pub fn max_filters(mut self, max: usize) -> Self {
        self.max_filters = Some(max.max(2));
        self.filterable = true;
        self
    }

    /// Returns the column id.
    pub fn id(&self) -> &ColumnId {
        &self.id
    }

    /// Returns the header title.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(self.id.as_str())
    }

    /// Returns the declared value kind.
    pub fn value_kind(&self) -> ValueKind {
        self.kind
    }

    /// Returns the filter category of the column.
    pub fn category(&self) -> ValueCategory {
        self.kind.category()
    }

    /// Returns `true` if the field may be absent.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the declared enumeration members.
    pub fn enum_members(&self) -> &[String] {
        &self.members
    }

    /// Returns `true` if the column is sortable.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Returns `true` if the column participates in multi-column sort.
    pub fn allows_multi_sort(&self) -> bool {
        self.multi_sort
    }

    /// Returns `true` if the column has filter options.
    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    /// Returns `true` if the column reads a record field.
    pub fn has_accessor(&self) -> bool {
        self.accessor.is_some()
    }

    /// Returns the clause bound, falling back to `default` when unset.
    pub fn filter_limit(&self, default: usize) -> usize {
        self.max_filters.unwrap_or(default).max(2)
    }

    /// Reads the column's field from a record. Template columns read `Null`.
    pub fn read(&self, record: &T) -> Value {
        match &self.accessor {
            Some(accessor) => accessor(record),
            None => Value::Null,
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            accessor: self.accessor.clone(),
            kind: self.kind,
            nullable: self.nullable,
            members: self.members.clone(),
            sortable: self.sortable,
            multi_sort: self.multi_sort,
            filterable: self.filterable,
            max_filters: self.max_filters,
            parse: self.parse,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("has_accessor", &self.accessor.is_some())
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .field("sortable", &self.sortable)
            .field("multi_sort", &self.multi_sort)
            .field("filterable", &self.filterable)
            .field("max_filters", &self.max_filters)
            .finish()
    }
}

/// Registered columns in registration order.
pub struct ColumnSet<T> {
    columns: Vec<Column<T>>,
    index: HashMap<ColumnId, usize>,
}

impl<T> ColumnSet<T> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Adds a column. Returns `false` if the id is already taken.
    pub(crate) fn insert(&mut self, column: Column<T>) -> bool {
        if self.index.contains_key(&column.id) {
            return false;
        }
        self.index.insert(column.id.clone(), self.columns.len());
        self.columns.push(column);
        true
    }

    /// Returns the column with this id.
    pub fn get(&self, id: &ColumnId) -> Option<&Column<T>> {
        self.index.get(id).map(|&i| &self.columns[i])
    }

    pub(crate) fn get_mut(&mut self, id: &ColumnId) -> Option<&mut Column<T>> {
        self.index.get(id).map(|&i| &mut self.columns[i])
    }

    /// Reads a column's field from a record. Unknown columns read `Null`.
    pub fn read(&self, id: &ColumnId, record: &T) -> Value {
        self.get(id).map(|c| c.read(record)).unwrap_or(Value::Null)
    }

    /// Iterates columns in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns.iter()
    }

    /// Returns the number of registered columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no column is registered.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<T> Default for ColumnSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ColumnSet<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            index: self.index.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}
