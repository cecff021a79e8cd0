//! # Quickbeam
//!
//! The runtime core of a small embeddable scripting language: dynamic
//! values, lexical environments, and the calling convention that lets host
//! code expose native functions and opaque objects to scripts.
//!
//! ## Architecture
//!
//! - **Values**: a seven-kind dynamic [`Value`] with permissive coercions,
//!   strict accessors and non-owning reference and function handles
//! - **Environments**: parent-linked [`Environment`] scopes holding
//!   variables, native functions and a host object table
//! - **Invocation**: the [`Invocation`] context every [`NativeFn`] receives,
//!   including the introspection mode driven by [`document!`]
//!
//! The tree-walking evaluator lives outside this crate and plugs in through
//! the [`Evaluator`] trait.
//!
//! ## Example
//!
//! ```
//! use quickbeam::{document, Environment, Invocation, NativeOnly, Result, Value};
//!
//! fn double(cx: &mut Invocation<'_>) -> Result<()> {
//!     document!(cx, "double", "", "Doubles a number." => "(number):number");
//!     let n = cx.arg(0)?.as_number();
//!     cx.result().assign(n * 2.0);
//!     Ok(())
//! }
//!
//! let env = Environment::with_prelude();
//! assert!(env.register_func(double, None));
//!
//! let mut result = Value::Null;
//! env.call("double", vec![Value::Number(21.0)], &mut result, &mut NativeOnly)?;
//! assert_eq!(result.as_number(), 42.0);
//! # Ok::<(), quickbeam::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod doc;
pub mod environment;
pub mod error;
pub mod invoke;
pub mod value;

// Re-export main types
pub use context::{Config, NativeLookup};
pub use doc::{DocRecord, Signature, MAX_SIGNATURES};
pub use environment::{Environment, HostObject, ObjectHandle, PRELUDE};
pub use error::{DerefFailure, Error, Result};
pub use invoke::{Evaluator, Invocation, NativeEntry, NativeFn, NativeOnly, UserData};
pub use value::{FunctionBody, Slot, Value, ValueKind, ValueRef};

/// Quickbeam version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
