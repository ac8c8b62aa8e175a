//! Cell-related types
//!
//! This module contains:
//! - [`Value`] - A scalar value (integer, real, text, boolean, timestamp or absent)
//! - [`ValueKind`] - The kind of a value, cell or column
//! - [`Cell`] - A typed, nullable holder of one value

mod item;
mod value;

pub use item::Cell;
pub use value::{Value, ValueKind, NULL_MARKER};
