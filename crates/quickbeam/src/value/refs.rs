//! Shared value slots and the weak references that alias them

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use super::Value;
use crate::error::{DerefFailure, Error, Result};

/// A shared, interior-mutable value cell.
///
/// Environments store every variable in a `Slot`. A `Value::Reference`
/// holds the weak side of one, so it observes writes through the slot and
/// fails to dereference once the last `Slot` handle is dropped.
#[derive(Clone, Default)]
pub struct Slot(Rc<RefCell<Value>>);

/// A non-owning handle to a [`Slot`].
#[derive(Clone)]
pub struct ValueRef(Weak<RefCell<Value>>);

impl Slot {
    /// Wrap a value in a new slot.
    pub fn new(value: Value) -> Self {
        Slot(Rc::new(RefCell::new(value)))
    }

    /// Borrow the stored value.
    ///
    /// Panics if the slot is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Value> {
        self.0.borrow()
    }

    /// Mutably borrow the stored value.
    ///
    /// Panics if the slot is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Value> {
        self.0.borrow_mut()
    }

    /// Borrow the stored value, failing instead of panicking.
    pub fn try_borrow(&self) -> Result<Ref<'_, Value>> {
        self.0
            .try_borrow()
            .map_err(|_| Error::Dereference(DerefFailure::Borrowed))
    }

    /// Mutably borrow the stored value, failing instead of panicking.
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, Value>> {
        self.0
            .try_borrow_mut()
            .map_err(|_| Error::Dereference(DerefFailure::Borrowed))
    }

    /// Clone of the stored value.
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    /// Replace the stored value.
    pub fn set(&self, value: Value) {
        *self.0.borrow_mut() = value;
    }

    /// Create a weak handle to this slot.
    pub fn downgrade(&self) -> ValueRef {
        ValueRef(Rc::downgrade(&self.0))
    }

    /// A `Value::Reference` aliasing this slot.
    pub fn reference(&self) -> Value {
        Value::Reference(self.downgrade())
    }

    /// Whether two handles point at the same slot.
    pub fn ptr_eq(&self, other: &Slot) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Value> for Slot {
    fn from(value: Value) -> Self {
        Slot::new(value)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(v) => f.debug_tuple("Slot").field(&*v).finish(),
            Err(_) => f.write_str("Slot(<borrowed>)"),
        }
    }
}

impl ValueRef {
    /// Recover the slot, if it still exists.
    pub fn upgrade(&self) -> Option<Slot> {
        self.0.upgrade().map(Slot)
    }

    /// Whether the target slot still exists.
    pub fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Whether two references alias the same slot.
    pub fn ptr_eq(&self, other: &ValueRef) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }

    fn refers_to(&self, slot: &Slot) -> bool {
        std::ptr::eq(self.0.as_ptr(), Rc::as_ptr(&slot.0))
    }
}

impl fmt::Debug for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_live() {
            f.write_str("ValueRef(<live>)")
        } else {
            f.write_str("ValueRef(<dangling>)")
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Dereferencing
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Resolve a reference chain to the slot holding the first non-reference.
    ///
    /// Returns `Ok(None)` when `self` is not a reference.
    pub fn target(&self) -> Result<Option<Slot>> {
        let Value::Reference(first) = self else {
            return Ok(None);
        };

        let mut visited: Vec<Slot> = Vec::new();
        let mut current = first.clone();
        loop {
            if visited.iter().any(|s| current.refers_to(s)) {
                return Err(DerefFailure::Cycle.into());
            }
            let slot = current.upgrade().ok_or(DerefFailure::Dangling)?;
            let next = match &*slot.try_borrow()? {
                Value::Reference(next) => Some(next.clone()),
                _ => None,
            };
            match next {
                Some(next) => {
                    visited.push(slot);
                    current = next;
                }
                None => return Ok(Some(slot)),
            }
        }
    }

    /// Run `f` against the dereferenced value.
    pub fn with_deref<R>(&self, f: impl FnOnce(&Value) -> R) -> Result<R> {
        match self.target()? {
            Some(slot) => {
                let value = slot.try_borrow()?;
                Ok(f(&value))
            }
            None => Ok(f(self)),
        }
    }

    /// Run `f` against the dereferenced value, mutably.
    ///
    /// Writes made through a reference land in the target slot.
    pub fn with_deref_mut<R>(&mut self, f: impl FnOnce(&mut Value) -> R) -> Result<R> {
        match self.target()? {
            Some(slot) => {
                let mut value = slot.try_borrow_mut()?;
                Ok(f(&mut value))
            }
            None => Ok(f(self)),
        }
    }

    /// Copy of the dereferenced value; a non-reference yields a copy of itself.
    pub fn dereference(&self) -> Result<Value> {
        self.with_deref(Value::clone)
    }

    /// Whether `self` is a reference that can no longer be dereferenced.
    pub fn is_dangling(&self) -> bool {
        matches!(self, Value::Reference(_)) && self.target().is_err()
    }
}

/// Slots entered while walking a value that may hold references.
///
/// A container can hold a reference back to the slot that owns it, so any
/// walk that follows references into containers goes through
/// [`Visited::visit`]. Re-entering a slot already on the walk, like a
/// reference that cannot be dereferenced, is seen as `Null`.
#[derive(Default)]
pub(crate) struct Visited {
    entered: RefCell<Vec<Slot>>,
}

impl Visited {
    /// Run `f` against `value` with references resolved.
    pub(crate) fn visit<R>(&self, value: &Value, f: impl FnOnce(&Value) -> R) -> R {
        let slot = match value.target() {
            Ok(Some(slot)) => slot,
            Ok(None) => return f(value),
            Err(_) => return f(&Value::Null),
        };
        if self.entered.borrow().iter().any(|s| s.ptr_eq(&slot)) {
            return f(&Value::Null);
        }
        let Ok(current) = slot.try_borrow() else {
            return f(&Value::Null);
        };
        self.entered.borrow_mut().push(slot.clone());
        let out = f(&*current);
        self.entered.borrow_mut().pop();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_observes_slot_writes() {
        let slot = Slot::new(Value::Number(1.0));
        let r = slot.reference();
        slot.set(Value::Number(2.0));
        assert_eq!(r.dereference().unwrap().as_number(), 2.0);
    }

    #[test]
    fn test_dangling_reference() {
        let r = {
            let slot = Slot::new(Value::Number(1.0));
            slot.reference()
        };
        assert_eq!(
            r.dereference().unwrap_err(),
            Error::Dereference(DerefFailure::Dangling)
        );
        assert!(r.is_dangling());
    }

    #[test]
    fn test_reference_chain_resolves_to_fixed_point() {
        let base = Slot::new(Value::Text("end".into()));
        let middle = Slot::new(base.reference());
        let top = middle.reference();
        let target = top.target().unwrap().unwrap();
        assert!(target.ptr_eq(&base));
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let slot = Slot::new(Value::Null);
        slot.set(slot.reference());
        let r = slot.reference();
        assert_eq!(
            r.target().unwrap_err(),
            Error::Dereference(DerefFailure::Cycle)
        );
    }

    #[test]
    fn test_with_deref_mut_writes_through() {
        let slot = Slot::new(Value::Number(1.0));
        let mut r = slot.reference();
        r.with_deref_mut(|v| *v = Value::Number(7.0)).unwrap();
        assert_eq!(slot.get().as_number(), 7.0);
    }

    #[test]
    fn test_borrowed_target_fails() {
        let slot = Slot::new(Value::Number(1.0));
        let r = slot.reference();
        let _guard = slot.borrow_mut();
        assert_eq!(
            r.dereference().unwrap_err(),
            Error::Dereference(DerefFailure::Borrowed)
        );
    }
}
