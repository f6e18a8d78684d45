//! Column and value models

mod column;
mod kind;
pub mod types;
mod value;

pub use column::*;
pub use kind::*;
pub use value::*;
