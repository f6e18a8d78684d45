//! Filter and sort expression engine.
//!
//! Turns per-column filter selections and sort toggles into one predicate
//! and an ordered sort-key chain.
//!
//! # Building Predicates
//!
//! - [`coerce`] - Raw operand text to a typed [`Value`](crate::model::Value)
//! - [`build_predicate`] - One predicate from column, operator and operand
//! - [`rewrite`] - Null-safety and case folding for in-memory evaluation
//! - [`try_combine`] - Fold fragments under one boolean operator
//!
//! # Sorting
//!
//! - [`SortState`] - Per-column Default/Ascending/Descending cycle
//! - [`SortChain`] - Active keys, primary first
//!
//! # Applying
//!
//! - [`GridQuery`] - Snapshot applied to records or exported
//! - [`odata`] - `$filter`/`$orderby` generation

mod apply;
mod builder;
pub(crate) mod coerce;
mod combine;
mod exclusion;
mod expr;
mod filter;
pub mod odata;
mod operator;
mod order;
mod rewrite;
mod sort;

pub use apply::*;
pub use builder::build_predicate;
pub use coerce::coerce;
pub use combine::try_combine;
pub use exclusion::*;
pub use expr::*;
pub use filter::*;
pub use operator::*;
pub use order::*;
pub use rewrite::*;
pub use sort::SortState;
