//! Runtime configuration

/// How [`crate::Environment::find_func`] resolves native function names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NativeLookup {
    /// Only the scope the call is made from
    Scope,

    /// The calling scope, then each parent up to the root
    #[default]
    Hierarchy,

    /// Only the root environment
    Global,
}

/// Configuration shared by an environment chain.
///
/// A root environment is created with a `Config`; every child scope
/// inherits a copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Native function resolution policy used by `call`
    pub native_lookup: NativeLookup,

    /// Emit a trace event for every call dispatch
    pub trace_calls: bool,
}

impl Config {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the native function resolution policy.
    pub fn with_native_lookup(mut self, lookup: NativeLookup) -> Self {
        self.native_lookup = lookup;
        self
    }

    /// Enable or disable per-call tracing.
    pub fn with_trace_calls(mut self, trace: bool) -> Self {
        self.trace_calls = trace;
        self
    }
}
