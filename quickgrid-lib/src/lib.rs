//! Dynamic filter and sort engine for data grids
//!
//! Turns per-column filter selections and sort toggles into a single
//! predicate and an ordered sort-key chain, applies them to in-memory
//! records, or exports them as OData query options.

pub mod config;
pub mod error;
pub mod model;
pub mod query;

mod grid;
mod listener;

pub use config::GridConfig;
pub use config::QueryOptions;
pub use grid::*;
pub use listener::*;
