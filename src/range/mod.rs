// src/range/mod.rs
mod expander;

pub use expander::{expand, parse_items, RangeError, RangeItem};
