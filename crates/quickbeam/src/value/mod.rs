//! Value representation for runtime values

mod callable;
mod coerce;
mod compare;
mod display;
mod impls;
mod refs;
mod serialize;

pub use callable::FunctionBody;
pub use refs::{Slot, ValueRef};

use indexmap::IndexMap;
use std::fmt;

/// Runtime value representation.
///
/// Owned kinds (`Text`, `List`, `Map`) are deep-copied by `Clone`. The two
/// handle kinds (`Reference`, `Function`) never own what they point at, so a
/// clone aliases the same target.
#[derive(Clone, Default)]
pub enum Value {
    /// No payload
    #[default]
    Null,

    /// Non-owning alias to a shared slot
    Reference(ValueRef),

    /// Double-precision number
    Number(f64),

    /// Owned string
    Text(String),

    /// Ordered sequence of values
    List(Vec<Value>),

    /// String-keyed table of values
    Map(IndexMap<String, Value>),

    /// Non-owning handle to a compiled function body
    Function(FunctionBody),
}

/// The kind tag of a [`Value`], used in type errors and `typeof`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    /// `Value::Null`
    Null,
    /// `Value::Reference`
    Reference,
    /// `Value::Number`
    Number,
    /// `Value::Text`
    Text,
    /// `Value::List`
    List,
    /// `Value::Map`
    Map,
    /// `Value::Function`
    Function,
}

impl ValueKind {
    /// Script-facing name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Reference => "reference",
            ValueKind::Number => "number",
            ValueKind::Text => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Function => "function",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Payload used by [`Value::numeric_value`] for "no numeric value".
    pub const NAN_VALUE: f64 = f64::NAN;

    /// The active kind.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Reference(_) => ValueKind::Reference,
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Function(_) => ValueKind::Function,
        }
    }

    /// Script-facing name of the active kind.
    pub fn type_name(&self) -> &'static str {
        self.kind().as_str()
    }
}
