//! Grid and query configuration

use serde::Deserialize;
use serde::Serialize;

use crate::query::LogicalOp;
use crate::query::RewritePolicy;

/// Policy for evaluating filters against in-memory records.
///
/// # Example
///
/// ```
/// use quickgrid_lib::QueryOptions;
/// use quickgrid_lib::query::LogicalOp;
///
/// let options = QueryOptions::default()
///     .with_null_default(true)
///     .with_combinator(LogicalOp::OrElse);
/// assert!(options.case_fold);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Treat missing field values as their kind's default.
    ///
    /// Default: false
    pub null_default: bool,

    /// Compare text case-insensitively.
    ///
    /// Default: true
    pub case_fold: bool,

    /// Operator joining the per-column filter groups.
    ///
    /// Default: `AndAlso`
    pub combinator: LogicalOp,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            null_default: false,
            case_fold: true,
            combinator: LogicalOp::AndAlso,
        }
    }
}

impl QueryOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the null-default policy.
    pub fn with_null_default(mut self, null_default: bool) -> Self {
        self.null_default = null_default;
        self
    }

    /// Sets the case-fold policy.
    pub fn with_case_fold(mut self, case_fold: bool) -> Self {
        self.case_fold = case_fold;
        self
    }

    /// Sets the group combinator.
    pub fn with_combinator(mut self, combinator: LogicalOp) -> Self {
        self.combinator = combinator;
        self
    }

    /// Returns the rewrite policy these options describe.
    pub fn rewrite_policy(&self) -> RewritePolicy {
        RewritePolicy::new(self.null_default, self.case_fold)
    }
}

/// Grid-wide defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Clause bound for columns that do not set their own.
    ///
    /// Default: 5, never below 2
    pub default_max_filters: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { default_max_filters: 5 }
    }
}

impl GridConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default clause bound. Values below 2 become 2.
    pub fn with_default_max_filters(mut self, max: usize) -> Self {
        self.default_max_filters = max.max(2);
        self
    }
}
