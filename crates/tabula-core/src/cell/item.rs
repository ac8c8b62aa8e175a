//! Typed, nullable cells

use std::cmp::Ordering;
use std::fmt;

use super::value::{Value, ValueKind};
use crate::error::{Error, Result};

/// A single typed value that may be null.
///
/// A cell keeps the kind it was created with. A cell created without a kind
/// (see [`Cell::null`]) adopts the kind of the first non-null value written
/// to it and keeps that kind from then on.
///
/// Comparisons are null-aware: an absent cell is never equal to, less than or
/// greater than anything, including another absent cell. `<=` and `>=` are
/// the negations of `>` and `<`, so `null <= x` holds. Comparing values that do
/// not convert into each other's kind is simply unequal and unordered; use
/// [`Cell::try_eq`] to have that reported as a `TypeMismatch`.
#[derive(Debug, Clone)]
pub struct Cell {
    kind: ValueKind,
    value: Value,
    /// Whether a kind-free cell may pick its own kind; rows of a container
    /// column without a kind leave that to the column
    adopts: bool,
}

impl Cell {
    /// Create a cell whose kind is the kind of `value`
    pub fn new<V: Into<Value>>(value: V) -> Self {
        let value = value.into();
        Self {
            kind: value.kind(),
            value,
            adopts: true,
        }
    }

    /// Create a kind-free null cell
    pub fn null() -> Self {
        Self {
            kind: ValueKind::Absent,
            value: Value::Absent,
            adopts: true,
        }
    }

    /// Kind-free null cell owned by a column that has no kind yet
    pub(crate) fn column_null() -> Self {
        Self {
            adopts: false,
            ..Self::null()
        }
    }

    /// Give a kind-free cell the kind its column settled on
    pub(crate) fn adopt_kind(&mut self, kind: ValueKind) {
        if self.is_kind_free() && kind.is_scalar() {
            self.kind = kind;
        }
    }

    /// Create a cell of a fixed kind, converting `value` into that kind
    pub fn typed<V: Into<Value>>(kind: ValueKind, value: V) -> Result<Self> {
        if kind == ValueKind::Nested {
            return Err(Error::mismatch("scalar", kind.name()));
        }
        let value = value.into();
        let value = if value.is_absent() {
            value
        } else {
            value.coerce_to(kind)?
        };
        Ok(Self {
            kind,
            value,
            adopts: true,
        })
    }

    /// Get the cell's kind
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Get the current value
    pub fn get(&self) -> &Value {
        &self.value
    }

    /// Check if the cell is null
    pub fn is_null(&self) -> bool {
        self.value.is_absent()
    }

    /// Check if the cell has not settled on a kind yet
    pub fn is_kind_free(&self) -> bool {
        self.kind == ValueKind::Absent
    }

    /// Check if the cell holds a number
    pub fn is_numeric(&self) -> bool {
        self.value.is_numeric()
    }

    /// Check if the cell holds a timestamp
    pub fn is_datetime(&self) -> bool {
        self.value.is_datetime()
    }

    /// Set a new value, converting it into the cell's kind.
    ///
    /// Returns `Ok(true)` if the stored value changed and `Ok(false)` if the
    /// converted value equals the current one. Writing a null value into a
    /// non-null cell is a `TypeMismatch`; use [`Cell::set_to_null`]. A
    /// kind-free cell in a container column without a kind refuses non-null
    /// values; write those through [`Container::set_value`](crate::Container::set_value).
    pub fn set_value<V: Into<Value>>(&mut self, value: V) -> Result<bool> {
        let value = value.into();

        if value.is_absent() {
            return if self.is_null() {
                Ok(false)
            } else {
                Err(Error::mismatch(self.kind.name(), value.type_name()))
            };
        }

        if self.is_kind_free() {
            if !self.adopts {
                return Err(Error::mismatch(self.kind.name(), value.type_name()));
            }
            self.kind = value.kind();
            self.value = value;
            return Ok(true);
        }

        let value = value.coerce_to(self.kind)?;
        if value == self.value {
            return Ok(false);
        }
        self.value = value;
        Ok(true)
    }

    /// Set the value from another cell
    pub fn set_from(&mut self, other: &Cell) -> Result<bool> {
        self.set_value(other.value.clone())
    }

    /// Compare with another cell, reporting values of incompatible kinds.
    ///
    /// Null cells are unequal, as with `==`. Where `==` answers `false` for
    /// values that do not convert (an integer against non-numeric text), this
    /// returns a `TypeMismatch`.
    pub fn try_eq(&self, other: &Cell) -> Result<bool> {
        Ok(self.value.try_compare(&other.value)? == Some(Ordering::Equal))
    }

    /// Clear the value. Returns `true` if the cell was not already null.
    pub fn set_to_null(&mut self) -> bool {
        if self.is_null() {
            return false;
        }
        self.value = Value::Absent;
        true
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::null()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.value.compare(&other.value) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.compare(&other.value)
    }

    fn le(&self, other: &Self) -> bool {
        !self.gt(other)
    }

    fn ge(&self, other: &Self) -> bool {
        !self.lt(other)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
