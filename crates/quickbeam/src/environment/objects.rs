//! Host object handle table

use std::any::Any;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::rc::{Rc, Weak};
use tracing::debug;

use super::Environment;
use crate::value::Value;

/// A host-side resource exposed to scripts through an [`ObjectHandle`].
///
/// The runtime never looks inside; it only asks for a type name.
pub trait HostObject {
    /// Name of the resource type, e.g. `"file"`.
    fn type_name(&self) -> &str;

    /// Self as `Any`, for downcasting in native functions.
    fn as_any(&self) -> &dyn Any;
}

/// Integer capability token naming a registered host object.
///
/// Handles are non-zero and never reused within one table, so a stale
/// handle fails to resolve instead of aliasing a newer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(NonZeroUsize);

impl ObjectHandle {
    /// The raw integer value.
    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Rebuild a handle from its integer form.
    pub fn from_raw(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(ObjectHandle)
    }

    /// Read a handle a script passed back as a number.
    ///
    /// Returns `None` unless the value is a positive integral number.
    pub fn from_value(value: &Value) -> Option<Self> {
        let n = value.numeric_value();
        if n.fract() != 0.0 || n < 1.0 || n > usize::MAX as f64 {
            return None;
        }
        Self::from_raw(n as usize)
    }
}

impl From<ObjectHandle> for Value {
    fn from(handle: ObjectHandle) -> Self {
        Value::Number(handle.get() as f64)
    }
}

/// Weak entries keyed by handle; the table never keeps an object alive.
pub(super) struct ObjectTable {
    entries: BTreeMap<ObjectHandle, Weak<dyn HostObject>>,
    next: NonZeroUsize,
}

impl Default for ObjectTable {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            next: NonZeroUsize::MIN,
        }
    }
}

impl Environment {
    /// Register a host object and return its new handle.
    ///
    /// The table holds only a weak pointer: the caller remains the owner and
    /// the handle stops resolving once the object is dropped.
    pub fn insert_object(&self, obj: Rc<dyn HostObject>) -> ObjectHandle {
        let mut table = self.objects.borrow_mut();
        let handle = ObjectHandle(table.next);
        table.next = table.next.saturating_add(1);
        table.entries.insert(handle, Rc::downgrade(&obj));
        debug!(handle = handle.get(), type_name = obj.type_name(), "inserted host object");
        handle
    }

    /// Remove the entry for `obj`. The object itself is not dropped.
    ///
    /// Returns whether an entry was found.
    pub fn destroy_object(&self, obj: &dyn HostObject) -> bool {
        let target = std::ptr::from_ref(obj);
        let mut table = self.objects.borrow_mut();
        let found = table
            .entries
            .iter()
            .find(|(_, weak)| std::ptr::addr_eq(weak.as_ptr(), target))
            .map(|(handle, _)| *handle);
        match found {
            Some(handle) => {
                table.entries.remove(&handle);
                debug!(handle = handle.get(), "removed host object");
                true
            }
            None => false,
        }
    }

    /// The object registered under `handle`.
    ///
    /// `None` for unknown or removed handles and for objects already dropped.
    pub fn query_object(&self, handle: ObjectHandle) -> Option<Rc<dyn HostObject>> {
        self.objects.borrow().entries.get(&handle)?.upgrade()
    }

    /// Run `f` against the object under `handle` if it is a `T`.
    pub fn with_object<T: 'static, R>(
        &self,
        handle: ObjectHandle,
        f: impl FnOnce(&T) -> R,
    ) -> Option<R> {
        let obj = self.query_object(handle)?;
        let typed = obj.as_any().downcast_ref::<T>()?;
        Some(f(typed))
    }

    /// Forget every entry. Objects are not dropped and handles are not reused.
    pub fn clear_objs(&self) {
        self.objects.borrow_mut().entries.clear();
    }

    /// Number of entries in this scope's table.
    pub fn object_count(&self) -> usize {
        self.objects.borrow().entries.len()
    }
}
