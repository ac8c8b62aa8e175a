//! Dependency and action edges

use std::fmt;
use std::rc::Rc;

use tabula_core::Result;

use crate::system::System;

/// Outcome reported by a dependency or action callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyResult {
    /// The callback did its work
    Success,
    /// The callback could not compute its result
    Failure,
    /// The callback decided nothing needed to change
    NoChange,
}

/// Callback that recomputes a dependent column: `(system, independent, dependent)`
pub type DependencyFn<C> = Rc<dyn Fn(&mut System<C>, usize, usize) -> Result<DependencyResult>>;

/// Callback that reacts to a changed column: `(system, independent)`
pub type ActionFn<C> = Rc<dyn Fn(&mut System<C>, usize) -> Result<DependencyResult>>;

pub(crate) enum Callback<C> {
    Dependency { target: usize, run: DependencyFn<C> },
    Action(ActionFn<C>),
}

impl<C> Clone for Callback<C> {
    fn clone(&self) -> Self {
        match self {
            Callback::Dependency { target, run } => Callback::Dependency {
                target: *target,
                run: Rc::clone(run),
            },
            Callback::Action(run) => Callback::Action(Rc::clone(run)),
        }
    }
}

/// An edge of the dependency graph, owned by its independent column
pub struct Edge<C> {
    pub(crate) source: usize,
    pub(crate) name: String,
    pub(crate) callback: Callback<C>,
}

impl<C> Edge<C> {
    /// Column whose change triggers this edge
    pub fn source(&self) -> usize {
        self.source
    }

    /// Column recomputed by this edge; `None` for actions
    pub fn target(&self) -> Option<usize> {
        match &self.callback {
            Callback::Dependency { target, .. } => Some(*target),
            Callback::Action(_) => None,
        }
    }

    /// Callback name, used when rendering a system
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if this edge is an action
    pub fn is_action(&self) -> bool {
        matches!(self.callback, Callback::Action(_))
    }
}

impl<C> Clone for Edge<C> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            name: self.name.clone(),
            callback: self.callback.clone(),
        }
    }
}

// Callbacks have no identity to compare, so edges compare by wiring and name
impl<C> PartialEq for Edge<C> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.target() == other.target() && self.name == other.name
    }
}

impl<C> fmt::Debug for Edge<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edge")
            .field("source", &self.source)
            .field("target", &self.target())
            .field("name", &self.name)
            .finish()
    }
}

/// Short name of a callback type: the function name for `fn` items,
/// `{{closure}}` for closures
pub(crate) fn callback_name<F>() -> String {
    let full = std::any::type_name::<F>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path).to_string()
}
