//! Error types

mod aggregation;
mod grid;
mod operator;
mod parse;

pub use aggregation::*;
pub use grid::*;
pub use operator::*;
pub use parse::*;
