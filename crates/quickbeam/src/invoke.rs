//! The calling convention between the evaluator and native functions

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::doc::DocRecord;
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::value::{FunctionBody, Value};

/// A native (host-implemented) function.
///
/// Returns `Err` only for structural failures such as reading a missing
/// argument. Ordinary failures are reported with [`Invocation::error`].
pub type NativeFn = fn(&mut Invocation<'_>) -> Result<()>;

/// Opaque data attached at registration and handed back on every call.
pub type UserData = Rc<dyn Any>;

/// Runs script-defined function bodies on behalf of [`Environment::call`].
///
/// Implemented by the tree-walking evaluator, which owns the bodies that
/// [`FunctionBody`] handles point at.
pub trait Evaluator {
    /// Execute `body` with `args`, writing its return value into `result`.
    fn call_body(
        &mut self,
        name: &str,
        body: &FunctionBody,
        env: &Rc<Environment>,
        args: Vec<Value>,
        result: &mut Value,
    ) -> Result<()>;
}

/// An evaluator for hosts that only call native functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeOnly;

impl Evaluator for NativeOnly {
    fn call_body(
        &mut self,
        name: &str,
        _body: &FunctionBody,
        _env: &Rc<Environment>,
        _args: Vec<Value>,
        _result: &mut Value,
    ) -> Result<()> {
        Err(Error::general(format!(
            "no evaluator available to run script function '{}'",
            name
        )))
    }
}

/// A registered native function with its user data.
#[derive(Clone)]
pub struct NativeEntry {
    /// The function
    pub func: NativeFn,
    /// Data forwarded unchanged to every call
    pub user_data: Option<UserData>,
}

impl NativeEntry {
    /// Invoke the function as `name` from `env`.
    ///
    /// An error reported through the context becomes [`Error::Native`].
    pub fn invoke(
        &self,
        name: &str,
        env: &Rc<Environment>,
        args: Vec<Value>,
        result: &mut Value,
    ) -> Result<()> {
        let mut cx = Invocation::new(name, Rc::clone(env), result, args, self.user_data.clone());
        (self.func)(&mut cx)?;
        match cx.take_error() {
            Some(message) => Err(Error::Native {
                name: name.to_string(),
                message,
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for NativeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeEntry")
            .field("func", &(self.func as *const ()))
            .field("user_data", &self.user_data.is_some())
            .finish()
    }
}

/// Per-call state handed to a native function.
///
/// In introspection mode (`doc_mode()`), the function must describe itself
/// with [`Invocation::document`] and return without touching arguments, the
/// environment or the result. The [`crate::document!`] macro does exactly
/// that.
pub struct Invocation<'a> {
    name: String,
    env: Rc<Environment>,
    result: &'a mut Value,
    args: Vec<Value>,
    error: Option<String>,
    user_data: Option<UserData>,
    doc_mode: bool,
    doc: Option<DocRecord>,
}

impl<'a> Invocation<'a> {
    /// Build a context for a normal call.
    pub fn new(
        name: impl Into<String>,
        env: Rc<Environment>,
        result: &'a mut Value,
        args: Vec<Value>,
        user_data: Option<UserData>,
    ) -> Self {
        Self {
            name: name.into(),
            env,
            result,
            args,
            error: None,
            user_data,
            doc_mode: false,
            doc: None,
        }
    }

    /// Run `f` in introspection mode against a detached environment.
    pub(crate) fn introspect(f: NativeFn) -> Option<DocRecord> {
        let mut scratch = Value::Null;
        let mut cx = Invocation::new("", Environment::new(), &mut scratch, Vec::new(), None);
        cx.doc_mode = true;
        let outcome = f(&mut cx);
        let doc = cx.doc.take();
        outcome.ok().and(doc)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Introspection
    // ═══════════════════════════════════════════════════════════════════

    /// Whether this is an introspection query rather than a call.
    pub fn doc_mode(&self) -> bool {
        self.doc_mode
    }

    /// Supply the documentation record. Ignored outside introspection mode.
    pub fn document(&mut self, mut record: DocRecord) {
        if self.doc_mode {
            record.mark_ok();
            self.doc = Some(record);
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call State
    // ═══════════════════════════════════════════════════════════════════

    /// The name the function was called as.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The calling environment.
    pub fn env(&self) -> &Rc<Environment> {
        &self.env
    }

    /// The caller-owned result slot.
    pub fn result(&mut self) -> &mut Value {
        &mut *self.result
    }

    /// User data attached at registration.
    pub fn user_data(&self) -> Option<&UserData> {
        self.user_data.as_ref()
    }

    /// User data downcast to `T`.
    pub fn user_data_as<T: Any>(&self) -> Option<&T> {
        self.user_data.as_deref()?.downcast_ref::<T>()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Arguments
    // ═══════════════════════════════════════════════════════════════════

    /// Number of arguments supplied.
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// The raw argument list (references not followed).
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Mutable access to the raw argument list.
    pub fn arg_list(&mut self) -> &mut Vec<Value> {
        &mut self.args
    }

    /// Dereferenced copy of argument `index`.
    pub fn arg(&self, index: usize) -> Result<Value> {
        self.args
            .get(index)
            .ok_or(Error::ArgumentIndex {
                index,
                given: self.args.len(),
            })?
            .dereference()
    }

    /// Run `f` against the dereferenced argument `index`.
    ///
    /// When the argument is a reference, writes land in the caller's slot.
    pub fn with_arg_mut<R>(&mut self, index: usize, f: impl FnOnce(&mut Value) -> R) -> Result<R> {
        let given = self.args.len();
        self.args
            .get_mut(index)
            .ok_or(Error::ArgumentIndex { index, given })?
            .with_deref_mut(f)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Error Channel
    // ═══════════════════════════════════════════════════════════════════

    /// Report a failure. The result slot is left as the function wrote it.
    pub fn error(&mut self, text: impl Into<String>) {
        self.error = Some(text.into());
    }

    /// Whether a failure was reported.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The reported failure message.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }
}
