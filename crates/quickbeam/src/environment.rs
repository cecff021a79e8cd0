//! Runtime environment: lexical scopes, native functions and host objects

mod natives;
mod objects;
mod prelude;

pub use objects::{HostObject, ObjectHandle};
pub use prelude::PRELUDE;

use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

use crate::context::Config;
use crate::invoke::NativeEntry;
use crate::value::{Slot, Value};
use objects::ObjectTable;

/// One lexical scope.
///
/// Scopes form a parent-linked chain. Each owns its variable slots; the
/// native function registry and object table are per scope too, but shared
/// services are expected to live at the root, reached with
/// [`Environment::global`].
///
/// Environments are always handled as `Rc<Environment>`. A child keeps its
/// parent alive, so a closure holding its defining scope stays valid.
///
/// # Example
///
/// ```
/// use quickbeam::{Environment, Value};
///
/// let root = Environment::new();
/// root.assign("x", Value::Number(1.0));
///
/// let child = root.child();
/// child.assign("x", Value::Number(10.0)); // Shadows outer x
///
/// assert_eq!(child.lookup("x", true).unwrap().get().as_number(), 10.0);
/// assert_eq!(root.lookup("x", false).unwrap().get().as_number(), 1.0);
/// assert!(child.lookup("y", true).is_none());
/// ```
pub struct Environment {
    /// Enclosing scope, `None` at the root
    parent: Option<Rc<Environment>>,

    /// Configuration inherited from the root
    config: Config,

    /// Variable slots owned by this scope
    vars: RefCell<IndexMap<String, Slot>>,

    /// Bumped whenever the set of names changes
    generation: Cell<u64>,

    /// Position of the `first`/`next` name traversal
    cursor: Cell<Option<Cursor>>,

    /// Native functions registered at this scope
    funcs: RefCell<IndexMap<String, NativeEntry>>,

    /// Host objects registered at this scope
    objects: RefCell<ObjectTable>,
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    position: usize,
    generation: u64,
}

impl Environment {
    /// Create a root environment with default configuration.
    pub fn new() -> Rc<Self> {
        Self::with_config(Config::default())
    }

    /// Create a root environment with the given configuration.
    pub fn with_config(config: Config) -> Rc<Self> {
        Rc::new(Self::scope(None, config))
    }

    /// Create a child scope of `self`.
    pub fn child(self: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self::scope(Some(Rc::clone(self)), self.config))
    }

    fn scope(parent: Option<Rc<Environment>>, config: Config) -> Self {
        Self {
            parent,
            config,
            vars: RefCell::new(IndexMap::new()),
            generation: Cell::new(0),
            cursor: Cell::new(None),
            funcs: RefCell::new(IndexMap::new()),
            objects: RefCell::new(ObjectTable::default()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Chain Navigation
    // ═══════════════════════════════════════════════════════════════════

    /// The immediate parent scope.
    pub fn parent(&self) -> Option<&Rc<Environment>> {
        self.parent.as_ref()
    }

    /// The root of the chain (`self` if this is the root).
    pub fn global(self: &Rc<Self>) -> Rc<Self> {
        let mut env = Rc::clone(self);
        while let Some(parent) = env.parent.clone() {
            env = parent;
        }
        env
    }

    /// Check if this is the root scope.
    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of scopes from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        self.scopes().count()
    }

    /// The configuration of this chain.
    pub fn config(&self) -> Config {
        self.config
    }

    /// This scope followed by each ancestor up to the root.
    fn scopes(&self) -> impl Iterator<Item = &Environment> {
        std::iter::successors(Some(self), |env| env.parent.as_deref())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Variables
    // ═══════════════════════════════════════════════════════════════════

    /// Bind `name` to `value` in this scope, never a parent.
    ///
    /// An existing local binding is replaced by a fresh slot; references
    /// taken to the old slot go stale once nothing else holds it.
    pub fn assign(&self, name: impl Into<String>, value: Value) -> Slot {
        let slot = Slot::new(value);
        let previous = self.vars.borrow_mut().insert(name.into(), slot.clone());
        if previous.is_none() {
            self.bump_generation();
        }
        slot
    }

    /// Remove a local binding. Parent scopes are never touched.
    ///
    /// Returns whether a binding was removed.
    pub fn unassign(&self, name: &str) -> bool {
        let removed = self.vars.borrow_mut().shift_remove(name).is_some();
        if removed {
            self.bump_generation();
        }
        removed
    }

    /// Find the slot bound to `name`.
    ///
    /// Only this scope is searched unless `search_hierarchy` is set, in which
    /// case the first match walking toward the root wins.
    pub fn lookup(&self, name: &str, search_hierarchy: bool) -> Option<Slot> {
        if !search_hierarchy {
            return self.vars.borrow().get(name).cloned();
        }
        self.scopes()
            .find_map(|env| env.vars.borrow().get(name).cloned())
    }

    /// Number of local bindings.
    pub fn size(&self) -> usize {
        self.vars.borrow().len()
    }

    /// Names of the local bindings.
    pub fn names(&self) -> Vec<String> {
        self.vars.borrow().keys().cloned().collect()
    }

    /// Start a traversal of the local names.
    pub fn first(&self) -> Option<String> {
        let name = self.vars.borrow().get_index(0).map(|(name, _)| name.clone());
        self.cursor.set(name.as_ref().map(|_| Cursor {
            position: 1,
            generation: self.generation.get(),
        }));
        name
    }

    /// Continue a traversal started by [`Environment::first`].
    ///
    /// Returns `None` at the end, without a prior `first`, or once the set
    /// of names changed since the traversal began.
    // ALLOW: this is a cursor over a RefCell-guarded map, not an Iterator
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<String> {
        let cursor = self.cursor.get()?;
        if cursor.generation != self.generation.get() {
            trace!("name traversal invalidated by mutation");
            self.cursor.set(None);
            return None;
        }
        let name = self
            .vars
            .borrow()
            .get_index(cursor.position)
            .map(|(name, _)| name.clone());
        self.cursor.set(name.as_ref().map(|_| Cursor {
            position: cursor.position + 1,
            ..cursor
        }));
        name
    }

    /// Drop every local binding.
    pub fn clear_vars(&self) {
        self.vars.borrow_mut().clear();
        self.bump_generation();
    }

    fn bump_generation(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("vars", &self.names())
            .field("funcs", &self.list_funcs())
            .field("objects", &self.object_count())
            .field("depth", &self.depth())
            .finish()
    }
}
