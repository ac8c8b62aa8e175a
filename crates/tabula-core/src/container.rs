//! Container type - named, typed columns of cells

use std::fmt;

use ahash::AHashMap;
use chrono::NaiveDateTime;

use crate::cell::{Cell, Value, ValueKind, NULL_MARKER};
use crate::column::{Column, ColumnRef};
use crate::error::{Error, Result};

/// Indentation added per nesting level when rendering
const INDENT: &str = "    ";

/// A single row entry of a column: a cell or a nested container
#[derive(Debug, Clone)]
pub enum Entry {
    /// Scalar cell
    Cell(Cell),
    /// Nested container
    Container(Container),
}

impl Entry {
    /// Check if this entry is a null cell
    pub fn is_null(&self) -> bool {
        matches!(self, Entry::Cell(cell) if cell.is_null())
    }

    /// Check if this entry is a nested container
    pub fn is_container(&self) -> bool {
        matches!(self, Entry::Container(_))
    }

    /// Get the kind of this entry
    pub fn kind(&self) -> ValueKind {
        match self {
            Entry::Cell(cell) => cell.kind(),
            Entry::Container(_) => ValueKind::Nested,
        }
    }

    /// Get the entry as a cell
    pub fn as_cell(&self) -> Option<&Cell> {
        match self {
            Entry::Cell(cell) => Some(cell),
            Entry::Container(_) => None,
        }
    }

    /// Get the entry as a mutable cell
    pub fn as_cell_mut(&mut self) -> Option<&mut Cell> {
        match self {
            Entry::Cell(cell) => Some(cell),
            Entry::Container(_) => None,
        }
    }

    /// Get the entry as a container
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Entry::Container(container) => Some(container),
            Entry::Cell(_) => None,
        }
    }

    /// Get the entry as a mutable container
    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match self {
            Entry::Container(container) => Some(container),
            Entry::Cell(_) => None,
        }
    }

    /// Compare two entries.
    ///
    /// Cells compare with null-aware cell equality and containers compare
    /// structurally. Comparing a container with a cell is a `TypeMismatch`.
    pub fn structural_eq(&self, other: &Entry) -> Result<bool> {
        match (self, other) {
            (Entry::Cell(a), Entry::Cell(b)) => Ok(a == b),
            (Entry::Container(a), Entry::Container(b)) => Ok(a == b),
            (Entry::Container(_), Entry::Cell(cell)) | (Entry::Cell(cell), Entry::Container(_)) => {
                Err(Error::mismatch("container", cell.kind().name()))
            }
        }
    }

    /// Write this entry the way it appears inside a rendered column
    pub fn write_rendered<W: fmt::Write>(&self, out: &mut W, offset: &str) -> fmt::Result {
        match self {
            Entry::Cell(cell) if cell.is_null() => write!(out, "{},", NULL_MARKER),
            Entry::Cell(cell) => write!(out, "{},", cell),
            Entry::Container(container) => {
                out.write_str(" {\n")?;
                container.write_indented(out, &format!("{}{}", offset, INDENT))?;
                out.write_str("}\n")
            }
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other).unwrap_or(false)
    }
}

impl From<Cell> for Entry {
    fn from(cell: Cell) -> Self {
        Entry::Cell(cell)
    }
}

impl From<Container> for Entry {
    fn from(container: Container) -> Self {
        Entry::Container(container)
    }
}

/// A container of named columns.
///
/// Every column holds an ordered sequence of rows that share the column's
/// kind; null cells are allowed in any column. A column may hold nested
/// containers, so a container is not necessarily rectangular.
///
/// A container owns everything in it. Cloning or assigning a container makes
/// a deep copy.
#[derive(Debug, Clone, Default)]
pub struct Container {
    /// Column names and kinds, in declaration order
    columns: Vec<Column>,
    /// Row data per column
    data: Vec<Vec<Entry>>,
    /// Column name → column index
    names: AHashMap<String, usize>,
}

impl Container {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of columns
    pub fn number_of_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check if the container has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get the number of rows in a column
    pub fn number_of_rows<'a, C: Into<ColumnRef<'a>>>(&self, column: C) -> Result<usize> {
        let idx = self.resolve(column.into())?;
        Ok(self.data[idx].len())
    }

    /// Iterate over column metadata in declaration order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Get the rows of a column
    pub fn rows<'a, C: Into<ColumnRef<'a>>>(&self, column: C) -> Result<&[Entry]> {
        let idx = self.resolve(column.into())?;
        Ok(&self.data[idx])
    }

    /// Check if a column with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Get a column index by name
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    /// Get a column name by index
    pub fn column_name(&self, index: usize) -> Result<&str> {
        self.columns
            .get(index)
            .map(|column| column.name.as_str())
            .ok_or_else(|| Error::UnknownColumn(ColumnRef::Index(index).to_string()))
    }

    /// Resolve a column reference to its index
    pub fn resolve(&self, column: ColumnRef<'_>) -> Result<usize> {
        match column {
            ColumnRef::Name(name) => self.column_index(name),
            ColumnRef::Index(index) if index < self.columns.len() => Ok(index),
            ColumnRef::Index(_) => Err(Error::UnknownColumn(column.to_string())),
        }
    }

    /// Get the kind of a column.
    ///
    /// A null-declared column reports `Absent` until its first non-null row
    /// fixes its kind.
    pub fn column_kind<'a, C: Into<ColumnRef<'a>>>(&self, column: C) -> Result<ValueKind> {
        let idx = self.resolve(column.into())?;
        Ok(self.columns[idx].kind)
    }

    /// Fix the kind of a null-declared column and of its kind-free rows
    fn fix_kind(&mut self, idx: usize, kind: ValueKind) {
        self.columns[idx].kind = kind;
        for entry in &mut self.data[idx] {
            if let Entry::Cell(cell) = entry {
                cell.adopt_kind(kind);
            }
        }
    }

    // === Column construction ===

    fn push_column(&mut self, name: &str, kind: ValueKind, entry: Entry) -> Result<usize> {
        if self.contains(name) {
            return Err(Error::DuplicateColumn(name.to_string()));
        }
        let idx = self.columns.len();
        self.columns.push(Column::new(name, kind));
        self.data.push(vec![entry]);
        self.names.insert(name.to_string(), idx);
        Ok(idx)
    }

    /// Add a scalar column of the given kind with one row holding `value`.
    ///
    /// The value is converted into `kind`; a null value leaves the row null.
    /// A column declared `Absent` with a non-null value takes the value's kind.
    pub fn add_column<V: Into<Value>>(
        &mut self,
        name: &str,
        value: V,
        kind: ValueKind,
    ) -> Result<&mut Cell> {
        if self.contains(name) {
            return Err(Error::DuplicateColumn(name.to_string()));
        }
        let value = value.into();
        let kind = match kind {
            ValueKind::Absent if !value.is_absent() => value.kind(),
            kind => kind,
        };
        let cell = match kind {
            ValueKind::Absent => Cell::column_null(),
            kind => Cell::typed(kind, value)?,
        };
        let idx = self.push_column(name, kind, Entry::Cell(cell))?;
        self.cell_mut(0, idx)
    }

    /// Add an integer column
    pub fn add_integer_column(&mut self, name: &str, value: Option<i64>) -> Result<&mut Cell> {
        self.add_column(name, value, ValueKind::Integer)
    }

    /// Add a real column
    pub fn add_real_column(&mut self, name: &str, value: Option<f64>) -> Result<&mut Cell> {
        self.add_column(name, value, ValueKind::Real)
    }

    /// Add a text column
    pub fn add_text_column(&mut self, name: &str, value: Option<&str>) -> Result<&mut Cell> {
        self.add_column(name, value, ValueKind::Text)
    }

    /// Add a boolean column
    pub fn add_bool_column(&mut self, name: &str, value: Option<bool>) -> Result<&mut Cell> {
        self.add_column(name, value, ValueKind::Boolean)
    }

    /// Add a timestamp column
    pub fn add_timestamp_column(
        &mut self,
        name: &str,
        value: Option<NaiveDateTime>,
    ) -> Result<&mut Cell> {
        self.add_column(name, value, ValueKind::Timestamp)
    }

    /// Add a column with no kind yet.
    ///
    /// The column's kind is fixed by the first non-null row added to it.
    pub fn add_null_column(&mut self, name: &str) -> Result<&mut Cell> {
        self.add_column(name, Value::Absent, ValueKind::Absent)
    }

    /// Add a column holding a nested container
    pub fn add_container_column(&mut self, name: &str, child: Container) -> Result<&mut Container> {
        let idx = self.push_column(name, ValueKind::Nested, Entry::Container(child))?;
        self.container_mut(0, idx)
    }

    // === Row mutation ===

    /// Append a scalar row to a column.
    ///
    /// A null value is accepted by every column. A non-null value must match
    /// the column kind exactly; for a null-declared column it fixes the kind.
    pub fn add_row<'a, C, V>(&mut self, column: C, value: V) -> Result<&mut Cell>
    where
        C: Into<ColumnRef<'a>>,
        V: Into<Value>,
    {
        let idx = self.resolve(column.into())?;
        let value = value.into();

        let cell = match self.columns[idx].kind {
            ValueKind::Absent | ValueKind::Nested if value.is_absent() => Cell::column_null(),
            kind if value.is_absent() => Cell::typed(kind, value)?,
            ValueKind::Absent => {
                self.fix_kind(idx, value.kind());
                Cell::new(value)
            }
            kind if kind == value.kind() => Cell::new(value),
            kind => return Err(Error::mismatch(kind.name(), value.type_name())),
        };

        self.data[idx].push(Entry::Cell(cell));
        let row = self.data[idx].len() - 1;
        self.cell_mut(row, idx)
    }

    /// Append a nested container row to a column
    pub fn add_container_row<'a, C: Into<ColumnRef<'a>>>(
        &mut self,
        column: C,
        child: Container,
    ) -> Result<&mut Container> {
        let idx = self.resolve(column.into())?;
        match self.columns[idx].kind {
            ValueKind::Nested => {}
            ValueKind::Absent => self.fix_kind(idx, ValueKind::Nested),
            kind => return Err(Error::mismatch(kind.name(), ValueKind::Nested.name())),
        }

        self.data[idx].push(Entry::Container(child));
        let row = self.data[idx].len() - 1;
        self.container_mut(row, idx)
    }

    /// Remove a row from a column.
    ///
    /// Removing the only row of a column removes the whole column.
    pub fn remove_row<'a, C: Into<ColumnRef<'a>>>(&mut self, column: C, row: usize) -> Result<()> {
        let idx = self.resolve(column.into())?;
        let len = self.data[idx].len();
        if row >= len {
            return Err(Error::IndexOutOfRange { index: row, len });
        }

        if len == 1 {
            self.remove_column(idx)
        } else {
            self.data[idx].remove(row);
            Ok(())
        }
    }

    /// Remove a column and all its rows
    pub fn remove_column<'a, C: Into<ColumnRef<'a>>>(&mut self, column: C) -> Result<()> {
        let idx = self.resolve(column.into())?;
        self.columns.remove(idx);
        self.data.remove(idx);

        // Keep indices dense after the removal
        self.names = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| (column.name.clone(), i))
            .collect();
        Ok(())
    }

    // === Access ===

    /// Get a row entry
    pub fn get<'a, C: Into<ColumnRef<'a>>>(&self, row: usize, column: C) -> Result<&Entry> {
        let idx = self.resolve(column.into())?;
        let rows = &self.data[idx];
        rows.get(row).ok_or(Error::IndexOutOfRange {
            index: row,
            len: rows.len(),
        })
    }

    /// Get a mutable row entry
    pub fn get_mut<'a, C: Into<ColumnRef<'a>>>(
        &mut self,
        row: usize,
        column: C,
    ) -> Result<&mut Entry> {
        let idx = self.resolve(column.into())?;
        let rows = &mut self.data[idx];
        let len = rows.len();
        rows.get_mut(row)
            .ok_or(Error::IndexOutOfRange { index: row, len })
    }

    /// Get a scalar cell
    pub fn cell<'a, C: Into<ColumnRef<'a>>>(&self, row: usize, column: C) -> Result<&Cell> {
        self.get(row, column)?
            .as_cell()
            .ok_or_else(|| Error::mismatch("scalar", ValueKind::Nested.name()))
    }

    /// Get a mutable scalar cell
    pub fn cell_mut<'a, C: Into<ColumnRef<'a>>>(
        &mut self,
        row: usize,
        column: C,
    ) -> Result<&mut Cell> {
        self.get_mut(row, column)?
            .as_cell_mut()
            .ok_or_else(|| Error::mismatch("scalar", ValueKind::Nested.name()))
    }

    /// Get a nested container
    pub fn container<'a, C: Into<ColumnRef<'a>>>(
        &self,
        row: usize,
        column: C,
    ) -> Result<&Container> {
        let entry = self.get(row, column)?;
        entry
            .as_container()
            .ok_or_else(|| Error::mismatch(ValueKind::Nested.name(), entry.kind().name()))
    }

    /// Get a mutable nested container
    pub fn container_mut<'a, C: Into<ColumnRef<'a>>>(
        &mut self,
        row: usize,
        column: C,
    ) -> Result<&mut Container> {
        let entry = self.get_mut(row, column)?;
        let kind = entry.kind();
        entry
            .as_container_mut()
            .ok_or_else(|| Error::mismatch(ValueKind::Nested.name(), kind.name()))
    }

    /// Set a cell value. Returns whether the cell changed.
    ///
    /// The first non-null value written into a null-declared column fixes the
    /// column's kind.
    pub fn set_value<'a, C, V>(&mut self, row: usize, column: C, value: V) -> Result<bool>
    where
        C: Into<ColumnRef<'a>>,
        V: Into<Value>,
    {
        let idx = self.resolve(column.into())?;
        let value = value.into();
        self.cell(row, idx)?;

        if self.columns[idx].kind == ValueKind::Absent && !value.is_absent() {
            self.fix_kind(idx, value.kind());
        }
        self.cell_mut(row, idx)?.set_value(value)
    }

    /// Set a cell to null. Returns whether the cell changed.
    pub fn set_to_null<'a, C: Into<ColumnRef<'a>>>(
        &mut self,
        row: usize,
        column: C,
    ) -> Result<bool> {
        Ok(self.cell_mut(row, column)?.set_to_null())
    }

    /// Replace this container's columns and rows with a deep copy of `source`.
    ///
    /// Returns `false` without copying when both are already equal.
    pub fn assign_from(&mut self, source: &Container) -> bool {
        if self == source {
            return false;
        }
        self.columns = source.columns.clone();
        self.data = source.data.clone();
        self.names = source.names.clone();
        true
    }

    // === Rendering ===

    /// Render every column, prefixing each line with `offset`
    pub fn write_indented<W: fmt::Write>(&self, out: &mut W, offset: &str) -> fmt::Result {
        for (column, rows) in self.columns.iter().zip(&self.data) {
            write!(out, "{}{}: ", offset, column.name)?;
            for entry in rows {
                entry.write_rendered(out, offset)?;
            }
            out.write_str("\n")?;
        }
        Ok(())
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.columns.len() == other.columns.len()
            && (0..self.columns.len()).all(|i| {
                self.columns[i].name == other.columns[i].name
                    && self.columns[i].kind == other.columns[i].kind
            })
            && self.data == other.data
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, "")
    }
}
