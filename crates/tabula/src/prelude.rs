//! Prelude module - common imports for tabula users
//!
//! ```rust
//! use tabula::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Cell,
    ColumnRef,
    // Main types
    Container,
    DependencyResult,
    // Error types
    Error,
    Result,
    System,
    SystemOptions,
    Value,
    ValueKind,
};
