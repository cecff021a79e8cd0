//! Error types for Quickbeam runtime operations

use thiserror::Error;

use crate::value::ValueKind;

/// Main error type for runtime operations.
///
/// Structural misuse (wrong accessor, bad index, unresolvable call) surfaces
/// here. Failures a native function reports through its invocation context
/// arrive as [`Error::Native`] once [`crate::Environment::call`] returns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Accessor used on the wrong value kind
    #[error("type error: expected {expected}, got {got}")]
    Type {
        /// Kind the accessor requires
        expected: ValueKind,
        /// Kind actually present
        got: ValueKind,
    },

    /// A reference or function handle has no valid target
    #[error("dereference error: {0}")]
    Dereference(DerefFailure),

    /// List index out of range
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Length of the list
        len: usize,
    },

    /// Map key not present
    #[error("key not found: '{0}'")]
    KeyNotFound(String),

    /// Native function read an argument that was not supplied
    #[error("invalid access to function argument {index}, only {given} given")]
    ArgumentIndex {
        /// Requested argument index
        index: usize,
        /// Number of arguments supplied
        given: usize,
    },

    /// Name is neither a script function nor a registered native function
    #[error("unable to resolve function '{name}'")]
    Unresolved {
        /// The name that failed to resolve
        name: String,
    },

    /// A native function reported failure through its invocation context
    #[error("{name}: {message}")]
    Native {
        /// Function name
        name: String,
        /// Message passed to `Invocation::error`
        message: String,
    },

    /// Ad hoc failure with a formatted message
    #[error("{0}")]
    General(String),
}

/// Why a dereference failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerefFailure {
    /// The referenced slot no longer exists
    #[error("reference target no longer exists")]
    Dangling,

    /// Following the reference chain returned to a slot already visited
    #[error("reference cycle detected")]
    Cycle,

    /// The target slot is mutably borrowed elsewhere
    #[error("reference target is already borrowed")]
    Borrowed,

    /// The function body behind a handle was released by its owner
    #[error("function body is no longer available")]
    StaleFunction,
}

impl Error {
    /// Build a general error from anything displayable.
    pub fn general(message: impl Into<String>) -> Self {
        Error::General(message.into())
    }

    /// Build a type error.
    pub fn type_mismatch(expected: ValueKind, got: ValueKind) -> Self {
        Error::Type { expected, got }
    }
}

impl From<DerefFailure> for Error {
    fn from(failure: DerefFailure) -> Self {
        Error::Dereference(failure)
    }
}

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, Error>;
