//! # tabula-system
//!
//! Dependency propagation for tabula.
//!
//! This crate provides:
//! - [`System`] - A single-row container whose columns are wired together
//! - [`DependencyResult`] - What a callback reports back
//! - [`SystemOptions`] - Engine switch and circle bound
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{Result, Value};
//! use tabula_system::{DependencyResult, System};
//!
//! fn celsius_to_fahrenheit(
//!     system: &mut System,
//!     celsius: usize,
//!     fahrenheit: usize,
//! ) -> Result<DependencyResult> {
//!     let c = system.value(celsius)?.as_real().unwrap_or_default();
//!     system.set_value(fahrenheit, c * 9.0 / 5.0 + 32.0)?;
//!     Ok(DependencyResult::Success)
//! }
//!
//! let mut system: System = System::new();
//! system.add_real_column("celsius", Some(0.0)).unwrap();
//! system.add_real_column("fahrenheit", Some(32.0)).unwrap();
//! system
//!     .add_dependency("celsius", "fahrenheit", celsius_to_fahrenheit)
//!     .unwrap();
//!
//! system.set_value("celsius", 100.0).unwrap();
//! assert_eq!(system.value("fahrenheit").unwrap(), &Value::Real(212.0));
//! ```

pub mod dependency;
pub mod options;
pub mod system;

pub use dependency::{ActionFn, DependencyFn, DependencyResult, Edge};
pub use options::SystemOptions;
pub use system::System;
