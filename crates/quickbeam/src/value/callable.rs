//! Function body handles

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

/// A non-owning handle to a compiled function body.
///
/// The evaluator owns function bodies (typically as `Rc<Ast>`); values only
/// carry this weak handle. Once the owner drops the body the handle is stale
/// and [`FunctionBody::get`] returns `None`.
#[derive(Clone)]
pub struct FunctionBody {
    body: Weak<dyn Any>,
}

impl FunctionBody {
    /// Create a handle to a body owned elsewhere.
    pub fn new<T: Any>(body: &Rc<T>) -> Self {
        let erased: Rc<dyn Any> = body.clone();
        Self {
            body: Rc::downgrade(&erased),
        }
    }

    /// Recover the body as its concrete type.
    ///
    /// Returns `None` if the body was released or is not a `T`.
    pub fn get<T: Any>(&self) -> Option<Rc<T>> {
        self.body.upgrade()?.downcast::<T>().ok()
    }

    /// Whether the owner still holds the body.
    pub fn is_live(&self) -> bool {
        self.body.strong_count() > 0
    }

    /// Whether two handles name the same body.
    pub fn ptr_eq(&self, other: &FunctionBody) -> bool {
        std::ptr::addr_eq(self.body.as_ptr(), other.body.as_ptr())
    }
}

impl fmt::Debug for FunctionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_live() {
            write!(f, "<function>")
        } else {
            write!(f, "<function (released)>")
        }
    }
}
