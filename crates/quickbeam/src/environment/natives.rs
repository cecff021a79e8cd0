//! Native function registry and call dispatch

use std::rc::Rc;
use tracing::{debug, trace, warn};

use super::Environment;
use crate::context::NativeLookup;
use crate::doc::DocRecord;
use crate::error::{DerefFailure, Error, Result};
use crate::invoke::{Evaluator, NativeEntry, NativeFn, UserData};
use crate::value::{FunctionBody, Value};

impl Environment {
    // ═══════════════════════════════════════════════════════════════════
    // Registration
    // ═══════════════════════════════════════════════════════════════════

    /// Register a native function at this scope under the name it documents.
    ///
    /// Registering a name again replaces the earlier entry. Returns `false`
    /// if `f` does not answer introspection queries, since it then has no
    /// name to register under.
    pub fn register_func(&self, f: NativeFn, user_data: Option<UserData>) -> bool {
        let doc = DocRecord::info(f);
        if !doc.ok() {
            warn!("native function does not support introspection, not registered");
            return false;
        }
        debug!(name = %doc.func_name, "registering native function");
        self.funcs
            .borrow_mut()
            .insert(doc.func_name, NativeEntry { func: f, user_data });
        true
    }

    /// Register several native functions without user data.
    ///
    /// Every function is attempted; returns `true` only if all succeeded.
    pub fn register_funcs(&self, funcs: impl IntoIterator<Item = NativeFn>) -> bool {
        let mut all = true;
        for f in funcs {
            all &= self.register_func(f, None);
        }
        all
    }

    /// The native function registered under `name` at this scope only.
    pub fn lookup_func(&self, name: &str) -> Option<NativeEntry> {
        self.funcs.borrow().get(name).cloned()
    }

    /// Resolve a native function according to [`crate::Config::native_lookup`].
    pub fn find_func(&self, name: &str) -> Option<NativeEntry> {
        match self.config.native_lookup {
            NativeLookup::Scope => self.lookup_func(name),
            NativeLookup::Hierarchy => self.scopes().find_map(|env| env.lookup_func(name)),
            NativeLookup::Global => self.scopes().last().and_then(|root| root.lookup_func(name)),
        }
    }

    /// Names of the native functions registered at this scope, sorted.
    pub fn list_funcs(&self) -> Vec<String> {
        let mut names: Vec<String> = self.funcs.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call Dispatch
    // ═══════════════════════════════════════════════════════════════════

    /// Call `name` with already-evaluated arguments.
    ///
    /// A variable (searched through the hierarchy) holding a function body
    /// is handed to `evaluator`. Otherwise a native function is resolved with
    /// [`Environment::find_func`] and invoked; a failure it reports through
    /// its context comes back as [`Error::Native`].
    ///
    /// # Errors
    ///
    /// - `Unresolved` if `name` is neither a script nor a native function
    ///   (a variable holding a dangling or cyclic reference counts as neither)
    /// - `Dereference` if the function body was released by its owner
    /// - whatever the evaluator or native function returned
    pub fn call(
        self: &Rc<Self>,
        name: &str,
        args: Vec<Value>,
        result: &mut Value,
        evaluator: &mut dyn Evaluator,
    ) -> Result<()> {
        if let Some(body) = self.script_function(name)? {
            if self.config.trace_calls {
                trace!(name, args = args.len(), "calling script function");
            }
            if !body.is_live() {
                return Err(DerefFailure::StaleFunction.into());
            }
            return evaluator.call_body(name, &body, self, args, result);
        }

        let entry = self.find_func(name).ok_or_else(|| Error::Unresolved {
            name: name.to_string(),
        })?;
        if self.config.trace_calls {
            trace!(name, args = args.len(), "calling native function");
        }
        entry.invoke(name, self, args, result)
    }

    /// The function body bound to variable `name`, if it holds one.
    ///
    /// A variable whose reference no longer resolves holds no function, so
    /// the name falls through to native resolution.
    fn script_function(&self, name: &str) -> Result<Option<FunctionBody>> {
        let Some(slot) = self.lookup(name, true) else {
            return Ok(None);
        };
        let value = slot.try_borrow()?;
        let body = value.with_deref(|v| match v {
            Value::Function(body) => Some(body.clone()),
            _ => None,
        });
        match body {
            Err(Error::Dereference(DerefFailure::Dangling | DerefFailure::Cycle)) => {
                debug!(name, "variable does not resolve, trying native functions");
                Ok(None)
            }
            other => other,
        }
    }
}
