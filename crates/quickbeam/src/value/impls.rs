//! Value trait implementations: constructors, accessors, mutators, From traits

use indexmap::IndexMap;

use super::*;
use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Create a list value
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items)
    }

    /// Create a map value from key/value pairs
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is a reference
    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Reference(_))
    }

    /// Check if value is a number
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Check if value is text
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Check if value is a list
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Check if value is a map
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Check if value is a function body handle
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Assignment
    // ═══════════════════════════════════════════════════════════════════

    /// Replace the kind and payload.
    ///
    /// Assigning a `FunctionBody` or `ValueRef` stores a handle and never
    /// takes ownership of what it points at.
    pub fn assign(&mut self, value: impl Into<Value>) {
        *self = value.into();
    }

    /// Overwrite with a copy of `other`.
    pub fn copy_from(&mut self, other: &Value) {
        self.clone_from(other);
    }

    /// Make this value a reference to `slot`.
    pub fn reference_to(&mut self, slot: &Slot) {
        *self = Value::Reference(slot.downgrade());
    }

    /// Reset to `Null`, dropping any payload.
    pub fn nullify(&mut self) {
        *self = Value::Null;
    }

    /// Reset to an empty list.
    pub fn empty_list(&mut self) {
        *self = Value::List(Vec::new());
    }

    /// Reset to an empty map.
    pub fn empty_map(&mut self) {
        *self = Value::Map(IndexMap::new());
    }

    /// Insert or replace a map entry. The previous entry, if any, is dropped.
    pub fn map_assign(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        self.map_mut()?.insert(key.into(), value);
        Ok(())
    }

    /// Remove a map entry. Does nothing if the key is absent or this is not a map.
    pub fn map_unassign(&mut self, key: &str) {
        if let Value::Map(map) = self {
            map.shift_remove(key);
        }
    }

    /// Append to a list.
    pub fn list_push(&mut self, value: impl Into<Value>) -> Result<()> {
        self.list_mut()?.push(value.into());
        Ok(())
    }

    /// Insert or replace a map entry from anything convertible to a value.
    pub fn map_item(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        self.map_assign(key, value.into())
    }

    /// Resize to `len` elements, padding with `Null`.
    ///
    /// A value that is not a list becomes an empty list first.
    pub fn resize(&mut self, len: usize) {
        if !self.is_list() {
            self.empty_list();
        }
        if let Value::List(items) = self {
            items.resize(len, Value::Null);
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Strict Accessors (type error on the wrong kind)
    // ═══════════════════════════════════════════════════════════════════

    fn mismatch(&self, expected: ValueKind) -> Error {
        Error::type_mismatch(expected, self.kind())
    }

    /// The number payload
    pub fn num(&self) -> Result<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(other.mismatch(ValueKind::Number)),
        }
    }

    /// Mutable access to the number payload
    pub fn num_mut(&mut self) -> Result<&mut f64> {
        match self {
            Value::Number(n) => Ok(n),
            other => Err(other.mismatch(ValueKind::Number)),
        }
    }

    /// The text payload
    pub fn str(&self) -> Result<&str> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(other.mismatch(ValueKind::Text)),
        }
    }

    /// Mutable access to the text payload
    pub fn text_mut(&mut self) -> Result<&mut String> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(other.mismatch(ValueKind::Text)),
        }
    }

    /// The list payload
    pub fn as_list(&self) -> Result<&Vec<Value>> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(other.mismatch(ValueKind::List)),
        }
    }

    /// Mutable access to the list payload
    pub fn list_mut(&mut self) -> Result<&mut Vec<Value>> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(other.mismatch(ValueKind::List)),
        }
    }

    /// The map payload
    pub fn as_map(&self) -> Result<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Ok(map),
            other => Err(other.mismatch(ValueKind::Map)),
        }
    }

    /// Mutable access to the map payload
    pub fn map_mut(&mut self) -> Result<&mut IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Ok(map),
            other => Err(other.mismatch(ValueKind::Map)),
        }
    }

    /// The function body handle
    pub fn func(&self) -> Result<&FunctionBody> {
        match self {
            Value::Function(body) => Ok(body),
            other => Err(other.mismatch(ValueKind::Function)),
        }
    }

    /// The reference handle
    pub fn reference(&self) -> Result<&ValueRef> {
        match self {
            Value::Reference(r) => Ok(r),
            other => Err(other.mismatch(ValueKind::Reference)),
        }
    }

    /// List element at `index`
    pub fn index(&self, index: usize) -> Result<&Value> {
        let items = self.as_list()?;
        items.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: items.len(),
        })
    }

    /// Mutable list element at `index`
    pub fn index_mut(&mut self, index: usize) -> Result<&mut Value> {
        let items = self.list_mut()?;
        let len = items.len();
        items
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Map entry for `key`
    pub fn lookup(&self, key: &str) -> Result<&Value> {
        self.as_map()?
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// Mutable map entry for `key`
    pub fn lookup_mut(&mut self, key: &str) -> Result<&mut Value> {
        self.map_mut()?
            .get_mut(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Trait Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Number(if b { 1.0 } else { 0.0 })
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<FunctionBody> for Value {
    fn from(body: FunctionBody) -> Self {
        Value::Function(body)
    }
}

impl From<ValueRef> for Value {
    fn from(r: ValueRef) -> Self {
        Value::Reference(r)
    }
}
