//! # tabula
//!
//! Typed, nestable columnar containers with dependency propagation.
//!
//! Tabula provides three layers:
//!
//! - Cells: a typed, nullable value with null-aware comparisons
//! - Containers: named columns of cells, where a column may hold nested containers
//! - Systems: single-row containers whose columns are wired together, so
//!   changing one column recomputes the columns that depend on it
//!
//! ## Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! fn price_to_yield(
//!     system: &mut System,
//!     price: usize,
//!     yield_col: usize,
//! ) -> Result<DependencyResult> {
//!     let price = system.value(price)?.as_real().unwrap_or_default();
//!     system.set_value(yield_col, price / 100.0 * 1.5)?;
//!     Ok(DependencyResult::Success)
//! }
//!
//! let mut bond: System = System::new();
//! bond.add_real_column("price", None).unwrap();
//! bond.add_real_column("yield", Some(0.0)).unwrap();
//! bond.add_dependency("price", "yield", price_to_yield).unwrap();
//!
//! bond.set_value("price", 100.0).unwrap();
//! assert_eq!(bond.value("yield").unwrap(), &Value::Real(1.5));
//! assert_eq!(
//!     bond.to_string(),
//!     "price: 100.0, -> price_to_yield,\nyield: 1.5,\n"
//! );
//! ```

pub mod prelude;

// Re-export core types
pub use tabula_core::{
    // Cell types
    Cell,
    // Column types
    Column,
    ColumnRef,
    // Container types
    Container,
    Entry,
    // Error types
    Error,
    Result,
    Value,
    ValueKind,
    NULL_MARKER,
};

// Re-export system types
pub use tabula_system::{ActionFn, DependencyFn, DependencyResult, Edge, System, SystemOptions};
