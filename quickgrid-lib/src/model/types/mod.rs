//! Grid value types

mod enumeration;

pub use enumeration::*;
