//! Value kinds and scalar values

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDateTime, Timelike};

use crate::error::{Error, Result};

/// Marker rendered in place of an absent value
pub const NULL_MARKER: &str = "~~NULL~~";

/// The kind of value a cell or column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    /// 64-bit signed integer
    Integer,
    /// 64-bit float
    Real,
    /// UTF-8 text
    Text,
    /// Boolean
    Boolean,
    /// Naive date and time
    Timestamp,
    /// No kind yet (null-declared column or kind-free cell)
    Absent,
    /// A whole nested container (columns only)
    Nested,
}

impl ValueKind {
    /// Get the kind name for error messages
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::Real => "real",
            ValueKind::Text => "text",
            ValueKind::Boolean => "boolean",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Absent => "absent",
            ValueKind::Nested => "container",
        }
    }

    /// Check if the kind is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Real)
    }

    /// Check if cells can hold this kind (everything but `Nested`)
    pub fn is_scalar(&self) -> bool {
        *self != ValueKind::Nested
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// No value (null)
    #[default]
    Absent,

    /// Integer value
    Integer(i64),

    /// Real value
    Real(f64),

    /// Text value
    Text(String),

    /// Boolean value
    Boolean(bool),

    /// Timestamp value
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    /// Get the kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Absent => ValueKind::Absent,
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::Text(_) => ValueKind::Text,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Timestamp(_) => ValueKind::Timestamp,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Check if the value is absent
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Check if the value is an integer or a real
    pub fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }

    /// Check if the value is a timestamp
    pub fn is_datetime(&self) -> bool {
        matches!(self, Value::Timestamp(_))
    }

    /// Try to get the value as an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get the value as a real (integers widen)
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get the value as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a timestamp
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Convert this value into the given kind.
    ///
    /// Integers, reals, text and booleans convert into each other the way the
    /// target kind would construct itself from the source. Timestamps only
    /// convert to timestamps. An absent value never converts into a concrete
    /// kind, and converting into [`ValueKind::Absent`] keeps the value as is.
    pub fn coerce_to(&self, kind: ValueKind) -> Result<Value> {
        let mismatch = || Error::mismatch(kind.name(), self.type_name());

        match (kind, self) {
            (ValueKind::Absent, v) => Ok(v.clone()),
            (_, Value::Absent) | (ValueKind::Nested, _) => Err(mismatch()),
            (ValueKind::Timestamp, Value::Timestamp(t)) => Ok(Value::Timestamp(*t)),
            (ValueKind::Timestamp, _) | (_, Value::Timestamp(_)) => Err(mismatch()),
            (ValueKind::Integer, v) => v.to_integer().map(Value::Integer).ok_or_else(mismatch),
            (ValueKind::Real, v) => v.to_real().map(Value::Real).ok_or_else(mismatch),
            (ValueKind::Text, v) => Ok(Value::Text(v.to_string())),
            (ValueKind::Boolean, v) => v.to_bool().map(Value::Boolean).ok_or_else(mismatch),
        }
    }

    fn to_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(r) => {
                let t = r.trunc();
                (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then(|| t as i64)
            }
            Value::Text(s) => s.trim().parse().ok(),
            Value::Boolean(b) => Some(i64::from(*b)),
            Value::Absent | Value::Timestamp(_) => None,
        }
    }

    fn to_real(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Absent | Value::Timestamp(_) => None,
        }
    }

    fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Integer(i) => Some(*i != 0),
            Value::Real(r) => Some(*r != 0.0),
            Value::Text(s) => Some(!s.is_empty()),
            Value::Boolean(b) => Some(*b),
            Value::Absent | Value::Timestamp(_) => None,
        }
    }

    /// Null-aware comparison.
    ///
    /// Returns `None` when either side is absent or when `other` cannot be
    /// expressed in this value's kind. Otherwise `other` is converted into this
    /// value's kind first, so the comparison is not symmetric across kinds.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        self.try_compare(other).ok().flatten()
    }

    /// Null-aware comparison that reports incompatible kinds.
    ///
    /// `Ok(None)` means one side is absent. A timestamp compared with a
    /// non-timestamp, or an `other` that does not convert into this value's
    /// kind, is a `TypeMismatch`.
    pub fn try_compare(&self, other: &Value) -> Result<Option<Ordering>> {
        let mismatch = || Error::mismatch(self.type_name(), other.type_name());

        match (self, other) {
            (Value::Absent, _) | (_, Value::Absent) => Ok(None),
            (Value::Timestamp(a), Value::Timestamp(b)) => Ok(Some(a.cmp(b))),
            (Value::Timestamp(_), _) | (_, Value::Timestamp(_)) => Err(mismatch()),
            _ => match (self, &other.coerce_to(self.kind())?) {
                (Value::Integer(a), Value::Integer(b)) => Ok(Some(a.cmp(b))),
                (Value::Real(a), Value::Real(b)) => Ok(a.partial_cmp(b)),
                (Value::Text(a), Value::Text(b)) => Ok(Some(a.cmp(b))),
                (Value::Boolean(a), Value::Boolean(b)) => Ok(Some(a.cmp(b))),
                _ => Err(mismatch()),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str(NULL_MARKER),
            Value::Integer(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" on integral reals
            Value::Real(r) => write!(f, "{:?}", r),
            Value::Text(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Timestamp(t) if t.nanosecond() == 0 => {
                write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S"))
            }
            Value::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S%.6f")),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(t: NaiveDateTime) -> Self {
        Value::Timestamp(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Absent)
    }
}
