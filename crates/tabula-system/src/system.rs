//! System type - a single-row container with a dependency graph
//!
//! Every column of a system owns an ordered list of edges. A dependency edge
//! recomputes another column from the changed one; an action edge only
//! reacts to the change. When a column changes, its edges run in
//! registration order. Dependencies write through [`System::set_value`], so a
//! dependent column's own edges run in turn.
//!
//! Cycles are allowed. A per-column circle count bounds how often a
//! propagation may run into a column that is already being propagated:
//! a dependency into column `t` only runs while `t`'s count is below
//! [`SystemOptions::max_circle_count`]. With the default bound of 1 a cycle
//! `price -> yield -> price` is walked exactly once.
//!
//! A system can hold another system as a column. When a change inside the
//! nested system runs at least one of its edges, the nested system counts as
//! changed and the parent propagates from that column.

use std::fmt;
use std::rc::Rc;

use chrono::NaiveDateTime;
use tabula_core::{Cell, ColumnRef, Container, Entry, Error, Result, Value, ValueKind};

use crate::dependency::{callback_name, Callback, DependencyResult, Edge};
use crate::options::SystemOptions;

/// A single-row container wired into a dependency graph.
///
/// `C` is a host context owned by the system and reachable from callbacks
/// through [`System::context_mut`].
pub struct System<C = ()> {
    /// Column data, always exactly one row per column
    container: Container,
    /// Edges per independent column
    edges: Vec<Vec<Edge<C>>>,
    /// Active propagations per column
    circle_counts: Vec<u32>,
    /// Wiring of nested system columns. Their data lives in `container`.
    children: Vec<Option<System<C>>>,
    /// Set when a propagation ran an edge; read by the parent system
    touched: bool,
    options: SystemOptions,
    context: C,
}

impl<C: Default + 'static> System<C> {
    /// Create an empty system with default options and context
    pub fn new() -> Self {
        Self::with_options(SystemOptions::default(), C::default())
    }
}

impl<C: Default + 'static> Default for System<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> System<C> {
    /// Create an empty system around a host context
    pub fn with_context(context: C) -> Self {
        Self::with_options(SystemOptions::default(), context)
    }

    /// Create an empty system with explicit options
    pub fn with_options(options: SystemOptions, context: C) -> Self {
        Self {
            container: Container::new(),
            edges: Vec::new(),
            circle_counts: Vec::new(),
            children: Vec::new(),
            touched: false,
            options,
            context,
        }
    }

    /// Get the host context
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Get the host context mutably
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Get the current options
    pub fn options(&self) -> SystemOptions {
        self.options
    }

    /// Get the underlying container
    pub fn container(&self) -> &Container {
        &self.container
    }

    // === Engine switches ===

    /// Check if the dependency engine is on
    pub fn is_dependency_on(&self) -> bool {
        self.options.dependencies_enabled
    }

    /// Turn the dependency engine on.
    ///
    /// Columns written while the engine was off are not replayed; the next
    /// change propagates from that change onward only.
    pub fn turn_dependency_on(&mut self) {
        tracing::debug!("dependency engine on");
        self.options.dependencies_enabled = true;
    }

    /// Turn the dependency engine off
    pub fn turn_dependency_off(&mut self) {
        tracing::debug!("dependency engine off");
        self.options.dependencies_enabled = false;
    }

    /// Set how many passes a propagation may make around a cycle
    pub fn set_max_circle_count(&mut self, max_circle_count: u32) {
        tracing::debug!(max_circle_count, "circle bound changed");
        self.options.max_circle_count = max_circle_count;
    }

    // === Column construction ===

    fn wire_new_column(&mut self) -> usize {
        self.edges.push(Vec::new());
        self.circle_counts.push(0);
        self.children.push(None);
        self.container.number_of_columns() - 1
    }

    /// Add a scalar column of the given kind. Returns the column index.
    pub fn add_column<V: Into<Value>>(
        &mut self,
        name: &str,
        value: V,
        kind: ValueKind,
    ) -> Result<usize> {
        self.container.add_column(name, value, kind)?;
        Ok(self.wire_new_column())
    }

    /// Add an integer column
    pub fn add_integer_column(&mut self, name: &str, value: Option<i64>) -> Result<usize> {
        self.add_column(name, value, ValueKind::Integer)
    }

    /// Add a real column
    pub fn add_real_column(&mut self, name: &str, value: Option<f64>) -> Result<usize> {
        self.add_column(name, value, ValueKind::Real)
    }

    /// Add a text column
    pub fn add_text_column(&mut self, name: &str, value: Option<&str>) -> Result<usize> {
        self.add_column(name, value, ValueKind::Text)
    }

    /// Add a boolean column
    pub fn add_bool_column(&mut self, name: &str, value: Option<bool>) -> Result<usize> {
        self.add_column(name, value, ValueKind::Boolean)
    }

    /// Add a timestamp column
    pub fn add_timestamp_column(
        &mut self,
        name: &str,
        value: Option<NaiveDateTime>,
    ) -> Result<usize> {
        self.add_column(name, value, ValueKind::Timestamp)
    }

    /// Add a column whose kind is set by the first value written to it
    pub fn add_null_column(&mut self, name: &str) -> Result<usize> {
        self.container.add_null_column(name)?;
        Ok(self.wire_new_column())
    }

    /// Add a column holding a nested container
    pub fn add_container_column(&mut self, name: &str, child: Container) -> Result<usize> {
        self.container.add_container_column(name, child)?;
        Ok(self.wire_new_column())
    }

    /// Add a column holding a nested system.
    ///
    /// Edit the nested system through [`System::update_system`]; its data is
    /// readable through [`System::nested`].
    pub fn add_system_column(&mut self, name: &str, mut child: System<C>) -> Result<usize> {
        let data = std::mem::take(&mut child.container);
        self.container.add_container_column(name, data)?;
        let idx = self.wire_new_column();
        self.children[idx] = Some(child);
        Ok(idx)
    }

    /// Systems hold exactly one row per column
    pub fn add_row<'a, R, V>(&mut self, _column: R, _value: V) -> Result<&mut Cell>
    where
        R: Into<ColumnRef<'a>>,
        V: Into<Value>,
    {
        Err(Error::unsupported("rows cannot be added to a system"))
    }

    /// Systems hold exactly one row per column
    pub fn remove_row<'a, R>(&mut self, _column: R, _row: usize) -> Result<()>
    where
        R: Into<ColumnRef<'a>>,
    {
        Err(Error::unsupported("rows cannot be removed from a system"))
    }

    /// Removing a column would invalidate the edges that point at it
    pub fn remove_column<'a, R: Into<ColumnRef<'a>>>(&mut self, _column: R) -> Result<()> {
        Err(Error::unsupported("columns cannot be removed from a system"))
    }

    // === Wiring ===

    /// Register a dependency: when `independent` changes, `callback`
    /// recomputes `dependent`.
    ///
    /// The edge is rendered under the callback's function name. Registering the
    /// same pair twice adds two edges.
    pub fn add_dependency<'a, 'b, I, D, F>(
        &mut self,
        independent: I,
        dependent: D,
        callback: F,
    ) -> Result<()>
    where
        I: Into<ColumnRef<'a>>,
        D: Into<ColumnRef<'b>>,
        F: Fn(&mut System<C>, usize, usize) -> Result<DependencyResult> + 'static,
    {
        self.add_named_dependency(independent, dependent, callback_name::<F>(), callback)
    }

    /// Register a dependency under an explicit name
    pub fn add_named_dependency<'a, 'b, I, D, S, F>(
        &mut self,
        independent: I,
        dependent: D,
        name: S,
        callback: F,
    ) -> Result<()>
    where
        I: Into<ColumnRef<'a>>,
        D: Into<ColumnRef<'b>>,
        S: Into<String>,
        F: Fn(&mut System<C>, usize, usize) -> Result<DependencyResult> + 'static,
    {
        let source = self.container.resolve(independent.into())?;
        let target = self.container.resolve(dependent.into())?;
        let name = name.into();
        tracing::debug!(source, target, callback = %name, "dependency added");

        self.edges[source].push(Edge {
            source,
            name,
            callback: Callback::Dependency {
                target,
                run: Rc::new(callback),
            },
        });
        Ok(())
    }

    /// Register an action: when `independent` changes, `callback` runs
    pub fn add_action<'a, I, F>(&mut self, independent: I, callback: F) -> Result<()>
    where
        I: Into<ColumnRef<'a>>,
        F: Fn(&mut System<C>, usize) -> Result<DependencyResult> + 'static,
    {
        self.add_named_action(independent, callback_name::<F>(), callback)
    }

    /// Register an action under an explicit name
    pub fn add_named_action<'a, I, S, F>(
        &mut self,
        independent: I,
        name: S,
        callback: F,
    ) -> Result<()>
    where
        I: Into<ColumnRef<'a>>,
        S: Into<String>,
        F: Fn(&mut System<C>, usize) -> Result<DependencyResult> + 'static,
    {
        let source = self.container.resolve(independent.into())?;
        let name = name.into();
        tracing::debug!(source, callback = %name, "action added");

        self.edges[source].push(Edge {
            source,
            name,
            callback: Callback::Action(Rc::new(callback)),
        });
        Ok(())
    }

    /// Get the edges registered on a column, in firing order
    pub fn dependencies<'a, R: Into<ColumnRef<'a>>>(&self, column: R) -> Result<&[Edge<C>]> {
        let idx = self.container.resolve(column.into())?;
        Ok(&self.edges[idx])
    }

    // === Access ===

    /// Get the number of columns
    pub fn number_of_columns(&self) -> usize {
        self.container.number_of_columns()
    }

    /// Get the number of rows in a column (always 1)
    pub fn number_of_rows<'a, R: Into<ColumnRef<'a>>>(&self, column: R) -> Result<usize> {
        self.container.number_of_rows(column)
    }

    /// Check if a column with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.container.contains(name)
    }

    /// Get a column index by name
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.container.column_index(name)
    }

    /// Get a column name by index
    pub fn column_name(&self, index: usize) -> Result<&str> {
        self.container.column_name(index)
    }

    /// Get a row entry
    pub fn get<'a, R: Into<ColumnRef<'a>>>(&self, row: usize, column: R) -> Result<&Entry> {
        self.container.get(row, column)
    }

    /// Get the cell of a scalar column
    pub fn cell<'a, R: Into<ColumnRef<'a>>>(&self, column: R) -> Result<&Cell> {
        self.container.cell(0, column)
    }

    /// Get the value of a scalar column
    pub fn value<'a, R: Into<ColumnRef<'a>>>(&self, column: R) -> Result<&Value> {
        Ok(self.cell(column)?.get())
    }

    /// Check if a column holds a nested system
    pub fn is_system_column<'a, R: Into<ColumnRef<'a>>>(&self, column: R) -> Result<bool> {
        let idx = self.container.resolve(column.into())?;
        Ok(self.children[idx].is_some())
    }

    /// Get the data of a container or nested system column
    pub fn nested<'a, R: Into<ColumnRef<'a>>>(&self, column: R) -> Result<&Container> {
        self.container.container(0, column)
    }

    // === Mutation ===

    /// Write a column value and propagate if it changed.
    ///
    /// Returns whether the column changed. An error from a callback stops
    /// the propagation and is returned here.
    pub fn set_value<'a, R, V>(&mut self, column: R, value: V) -> Result<bool>
    where
        R: Into<ColumnRef<'a>>,
        V: Into<Value>,
    {
        let idx = self.container.resolve(column.into())?;
        let changed = self.container.set_value(0, idx, value)?;
        if changed {
            self.propagate(idx)?;
        }
        Ok(changed)
    }

    /// Set a column to null and propagate if it changed
    pub fn set_to_null<'a, R: Into<ColumnRef<'a>>>(&mut self, column: R) -> Result<bool> {
        let idx = self.container.resolve(column.into())?;
        let changed = self.container.cell_mut(0, idx)?.set_to_null();
        if changed {
            self.propagate(idx)?;
        }
        Ok(changed)
    }

    /// Deep-copy `source` into a container column and propagate if it changed
    pub fn assign_container<'a, R: Into<ColumnRef<'a>>>(
        &mut self,
        column: R,
        source: &Container,
    ) -> Result<bool> {
        self.update_container(column, |nested| Ok(nested.assign_from(source)))
    }

    /// Edit a container column in place.
    ///
    /// `edit` reports whether it changed the nested container; a change
    /// propagates from this column.
    pub fn update_container<'a, R, F>(&mut self, column: R, edit: F) -> Result<bool>
    where
        R: Into<ColumnRef<'a>>,
        F: FnOnce(&mut Container) -> Result<bool>,
    {
        let idx = self.container.resolve(column.into())?;
        if self.children[idx].is_some() {
            return Err(Error::mismatch(ValueKind::Nested.name(), "system"));
        }
        let changed = edit(self.container.container_mut(0, idx)?)?;
        if changed {
            self.propagate(idx)?;
        }
        Ok(changed)
    }

    /// Work on a nested system column.
    ///
    /// `edit` gets the nested system with its data and wiring. If the edit
    /// ran any edge inside the nested system, the parent propagates from this
    /// column afterwards, also when `edit` itself returns an error.
    pub fn update_system<'a, R, F, T>(&mut self, column: R, edit: F) -> Result<T>
    where
        R: Into<ColumnRef<'a>>,
        F: FnOnce(&mut System<C>) -> Result<T>,
    {
        let idx = self.container.resolve(column.into())?;
        let data = self.container.container_mut(0, idx)?;
        let child = self.children[idx]
            .as_mut()
            .ok_or_else(|| Error::mismatch("system", ValueKind::Nested.name()))?;

        std::mem::swap(&mut child.container, data);
        child.touched = false;
        let result = edit(&mut *child);
        std::mem::swap(&mut child.container, data);

        let touched = std::mem::replace(&mut child.touched, false);
        if touched {
            tracing::trace!(column = idx, "nested system changed");
            self.propagate(idx)?;
        }
        result
    }

    // === Propagation ===

    /// Run the edges of a changed column.
    ///
    /// Marks the system as touched once an edge runs, so an enclosing system
    /// sees the change.
    fn propagate(&mut self, column: usize) -> Result<()> {
        if !self.options.dependencies_enabled {
            return Ok(());
        }

        let mut position = 0;
        while let Some(edge) = self.edges[column].get(position).cloned() {
            position += 1;

            let result = match edge.callback {
                Callback::Action(run) => {
                    self.touched = true;
                    tracing::trace!(column, callback = %edge.name, "running action");
                    run(self, column)?
                }
                Callback::Dependency { target, run } => {
                    if self.circle_counts[target] >= self.options.max_circle_count {
                        tracing::debug!(
                            column,
                            target,
                            callback = %edge.name,
                            "circle bound reached, skipping dependency"
                        );
                        continue;
                    }

                    self.touched = true;
                    tracing::trace!(column, target, callback = %edge.name, "running dependency");
                    self.circle_counts[column] += 1;
                    let result = run(self, column, target);
                    self.circle_counts[column] -= 1;
                    result?
                }
            };

            if result == DependencyResult::Failure {
                tracing::warn!(column, callback = %edge.name, "callback reported failure");
            }
        }
        Ok(())
    }
}

impl<C: Clone + 'static> System<C> {
    /// Replace columns, values, edges and nested systems with a deep copy of
    /// `source`.
    ///
    /// The context and options of `self` are kept. Returns `false` without
    /// copying when both are already equal.
    pub fn assign_from(&mut self, source: &System<C>) -> bool {
        if self == source {
            return false;
        }
        self.container = source.container.clone();
        self.edges = source.edges.clone();
        self.children = source.children.clone();
        self.circle_counts = vec![0; self.edges.len()];
        true
    }
}

impl<C> PartialEq for System<C> {
    fn eq(&self, other: &Self) -> bool {
        self.container == other.container
            && self.edges == other.edges
            && self.children == other.children
    }
}

impl<C: Clone> Clone for System<C> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
            edges: self.edges.clone(),
            circle_counts: vec![0; self.edges.len()],
            children: self.children.clone(),
            touched: false,
            options: self.options,
            context: self.context.clone(),
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for System<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("System")
            .field("container", &self.container)
            .field("edges", &self.edges)
            .field("children", &self.children)
            .field("options", &self.options)
            .field("context", &self.context)
            .finish()
    }
}

impl<C> fmt::Display for System<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, column) in self.container.columns().enumerate() {
            write!(f, "{}: ", column.name)?;
            for entry in self.container.rows(idx).map_err(|_| fmt::Error)? {
                entry.write_rendered(f, "")?;
            }
            if !self.edges[idx].is_empty() {
                f.write_str(" -> ")?;
                for edge in &self.edges[idx] {
                    write!(f, "{},", edge.name)?;
                }
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn real(system: &System<u32>, column: usize) -> Result<f64> {
        system
            .value(column)?
            .as_real()
            .ok_or_else(|| Error::callback("expected a real value"))
    }

    fn double(system: &mut System<u32>, from: usize, to: usize) -> Result<DependencyResult> {
        let value = real(system, from)? * 2.0;
        system.set_value(to, value)?;
        Ok(DependencyResult::Success)
    }

    fn halve(system: &mut System<u32>, from: usize, to: usize) -> Result<DependencyResult> {
        let value = real(system, from)? / 2.0;
        system.set_value(to, value)?;
        Ok(DependencyResult::Success)
    }

    fn count(system: &mut System<u32>, _: usize) -> Result<DependencyResult> {
        *system.context_mut() += 1;
        Ok(DependencyResult::Success)
    }

    fn chain() -> System<u32> {
        let mut system = System::new();
        system.add_real_column("a", Some(1.0)).unwrap();
        system.add_real_column("b", Some(2.0)).unwrap();
        system.add_real_column("c", Some(4.0)).unwrap();
        system.add_dependency("a", "b", double).unwrap();
        system.add_dependency("b", "c", double).unwrap();
        system.add_action("c", count).unwrap();
        system
    }

    #[test]
    fn test_chain_propagates() {
        let mut system = chain();
        assert_eq!(system.set_value("a", 3.0), Ok(true));
        assert_eq!(system.value("b").unwrap(), &Value::Real(6.0));
        assert_eq!(system.value("c").unwrap(), &Value::Real(12.0));
        assert_eq!(*system.context(), 1);

        // Writing the same value is not a change
        assert_eq!(system.set_value("a", 3.0), Ok(false));
        assert_eq!(*system.context(), 1);
    }

    #[test]
    fn test_disabled_engine_does_not_propagate() {
        let mut system = chain();
        system.turn_dependency_off();
        assert!(!system.is_dependency_on());
        system.set_value("a", 10.0).unwrap();
        system.set_value("c", 100.0).unwrap();
        assert_eq!(system.value("b").unwrap(), &Value::Real(2.0));
        assert_eq!(*system.context(), 0);

        system.turn_dependency_on();
        system.set_value("b", 5.0).unwrap();
        assert_eq!(system.value("a").unwrap(), &Value::Real(10.0));
        assert_eq!(system.value("c").unwrap(), &Value::Real(10.0));
        assert_eq!(*system.context(), 1);
    }

    #[test]
    fn test_cycle_is_bounded() {
        let mut system: System<u32> = System::new();
        system.add_real_column("x", Some(1.0)).unwrap();
        system.add_real_column("y", Some(2.0)).unwrap();
        system.add_dependency("x", "y", double).unwrap();
        system.add_dependency("y", "x", halve).unwrap();
        system.add_action("y", count).unwrap();

        system.set_value("x", 8.0).unwrap();
        assert_eq!(system.value("y").unwrap(), &Value::Real(16.0));
        assert_eq!(system.value("x").unwrap(), &Value::Real(8.0));
        assert_eq!(*system.context(), 1);
    }

    #[test]
    fn test_zero_circle_count_runs_actions_only() {
        let mut system = chain();
        system.set_max_circle_count(0);
        system.set_value("c", 9.0).unwrap();
        system.set_value("a", 9.0).unwrap();
        assert_eq!(system.value("b").unwrap(), &Value::Real(2.0));
        assert_eq!(*system.context(), 1);
    }

    #[test]
    fn test_duplicate_edges_both_fire() {
        let mut system = chain();
        system.add_action("c", count).unwrap();
        assert_eq!(system.dependencies("c").unwrap().len(), 2);
        system.set_value("c", 0.5).unwrap();
        assert_eq!(*system.context(), 2);
    }

    #[test]
    fn test_callback_error_restores_counts() {
        let mut system: System<u32> = System::new();
        system.add_real_column("a", Some(1.0)).unwrap();
        system.add_text_column("label", Some("x")).unwrap();
        system.add_dependency("label", "a", double).unwrap();

        assert!(matches!(system.set_value("label", "y"), Err(Error::Callback(_))));
        assert_eq!(system.value("label").unwrap(), &Value::text("y"));
        assert!(system.circle_counts.iter().all(|count| *count == 0));
    }

    #[test]
    fn test_row_and_column_removal_unsupported() {
        let mut system = chain();
        assert!(matches!(system.add_row("a", 1.0), Err(Error::Unsupported(_))));
        assert!(matches!(system.remove_row("a", 0), Err(Error::Unsupported(_))));
        assert!(matches!(system.remove_column("a"), Err(Error::Unsupported(_))));
        assert_eq!(system.number_of_columns(), 3);
        assert_eq!(system.number_of_rows("a").unwrap(), 1);
    }

    #[test]
    fn test_unknown_columns_in_wiring() {
        let mut system = chain();
        assert!(matches!(
            system.add_dependency("a", "missing", double),
            Err(Error::UnknownColumn(_))
        ));
        assert!(matches!(system.add_action(7usize, count), Err(Error::UnknownColumn(_))));
        assert_eq!(system.dependencies("a").unwrap().len(), 1);
    }

    #[test]
    fn test_rendering_lists_callbacks() {
        let mut system = chain();
        let audit = |_: &mut System<u32>, _: usize| -> Result<DependencyResult> {
            Ok(DependencyResult::NoChange)
        };
        system.add_named_action("a", "audit", audit).unwrap();
        assert_eq!(
            system.to_string(),
            "a: 1.0, -> double,audit,\nb: 2.0, -> double,\nc: 4.0, -> count,\n"
        );
    }

    #[test]
    fn test_nested_container_column_propagates() {
        let mut child = Container::new();
        child.add_integer_column("n", Some(1)).unwrap();

        let mut system: System<u32> = System::new();
        system.add_container_column("child", child.clone()).unwrap();
        system.add_action("child", count).unwrap();

        assert_eq!(system.assign_container("child", &child), Ok(false));
        assert_eq!(*system.context(), 0);

        let changed = system
            .update_container("child", |nested| nested.set_value(0, "n", 2))
            .unwrap();
        assert!(changed);
        assert_eq!(*system.context(), 1);
        assert_eq!(
            system.nested("child").unwrap().cell(0, "n").unwrap().get(),
            &Value::Integer(2)
        );
        assert_eq!(system.assign_container("child", &child), Ok(true));
        assert_eq!(*system.context(), 2);
    }

    fn leg() -> System<u32> {
        let mut leg = System::new();
        leg.add_real_column("a", Some(1.0)).unwrap();
        leg.add_real_column("b", Some(2.0)).unwrap();
        leg.add_real_column("note", Some(0.0)).unwrap();
        leg.add_dependency("a", "b", double).unwrap();
        leg
    }

    #[test]
    fn test_nested_system_change_notifies_parent() {
        let mut parent: System<u32> = System::new();
        parent.add_system_column("leg", leg()).unwrap();
        parent.add_action("leg", count).unwrap();
        assert!(parent.is_system_column("leg").unwrap());

        let changed = parent.update_system("leg", |leg| leg.set_value("a", 5.0)).unwrap();
        assert!(changed);
        assert_eq!(*parent.context(), 1);
        assert_eq!(
            parent.nested("leg").unwrap().cell(0, "b").unwrap().get(),
            &Value::Real(10.0)
        );

        // A column without edges changes the nested data but runs nothing
        parent.update_system("leg", |leg| leg.set_value("note", 3.0)).unwrap();
        assert_eq!(*parent.context(), 1);
        assert_eq!(
            parent.nested("leg").unwrap().cell(0, "note").unwrap().get(),
            &Value::Real(3.0)
        );

        // A disabled nested engine does not notify
        parent
            .update_system("leg", |leg| {
                leg.turn_dependency_off();
                leg.set_value("a", 6.0)
            })
            .unwrap();
        assert_eq!(*parent.context(), 1);
        assert_eq!(
            parent.to_string(),
            "leg:  {\n    a: 6.0,\n    b: 10.0,\n    note: 3.0,\n}\n -> count,\n"
        );
    }

    #[test]
    fn test_nested_system_chain_reaches_grandparent() {
        let mut middle: System<u32> = System::new();
        middle.add_system_column("leg", leg()).unwrap();
        middle.add_real_column("seen", Some(0.0)).unwrap();
        middle
            .add_named_dependency(
                "leg",
                "seen",
                "leg_to_seen",
                |s: &mut System<u32>, _: usize, to: usize| -> Result<DependencyResult> {
                    let next = real(s, to)? + 1.0;
                    s.set_value(to, next)?;
                    Ok(DependencyResult::Success)
                },
            )
            .unwrap();

        let mut top: System<u32> = System::new();
        top.add_system_column("middle", middle).unwrap();
        top.add_action("middle", count).unwrap();

        top.update_system("middle", |middle| {
            middle.update_system("leg", |leg| leg.set_value("a", 2.0))
        })
        .unwrap();
        assert_eq!(*top.context(), 1);
        let middle = top.nested("middle").unwrap();
        assert_eq!(middle.cell(0, "seen").unwrap().get(), &Value::Real(1.0));
    }

    #[test]
    fn test_nested_system_column_access_rules() {
        let mut parent: System<u32> = System::new();
        parent.add_system_column("leg", leg()).unwrap();
        parent.add_container_column("plain", Container::new()).unwrap();

        assert!(matches!(
            parent.update_container("leg", |_| Ok(true)),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            parent.update_system("plain", |_| Ok(())),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(parent.set_value("leg", 1.0).is_err());
        assert!(!parent.is_system_column("plain").unwrap());

        let copy = parent.clone();
        assert!(copy == parent);
        let mut rewired = parent.clone();
        rewired
            .update_system("leg", |leg| leg.add_action("b", count))
            .unwrap();
        assert!(rewired != parent);
    }

    #[test]
    fn test_assign_from_copies_edges_not_context() {
        let source = chain();
        let mut copy: System<u32> = System::with_context(41);
        assert!(copy.assign_from(&source));
        assert!(copy == source);
        assert_eq!(*copy.context(), 41);

        copy.set_value("a", 2.0).unwrap();
        assert_eq!(copy.value("c").unwrap(), &Value::Real(8.0));
        assert_eq!(*copy.context(), 42);
        assert_eq!(source.value("a").unwrap(), &Value::Real(1.0));
        assert!(copy != source);
    }
}
