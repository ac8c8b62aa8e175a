//! # tabula-core
//!
//! Core data structures for the tabula value store.
//!
//! This crate provides the fundamental types used throughout tabula:
//! - [`Value`] and [`ValueKind`] - Scalar values and their kinds
//! - [`Cell`] - A typed, nullable value holder
//! - [`Container`] - Named, typed columns of cells, which may nest
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{Container, Value};
//!
//! let mut container = Container::new();
//! container.add_integer_column("qty", Some(34)).unwrap();
//! container.add_row("qty", 50).unwrap();
//!
//! assert_eq!(container.number_of_rows("qty").unwrap(), 2);
//! assert_eq!(container.cell(1, "qty").unwrap().get(), &Value::Integer(50));
//! ```

pub mod cell;
pub mod column;
pub mod container;
pub mod error;

// Re-exports for convenience
pub use cell::{Cell, Value, ValueKind, NULL_MARKER};
pub use column::{Column, ColumnRef};
pub use container::{Container, Entry};
pub use error::{Error, Result};
