//! Equality and ordering across every pair of value kinds
//!
//! Both sides are dereferenced first; a reference that cannot be
//! dereferenced compares as `Null`. Numbers take precedence: two numbers
//! compare numerically, and a number orders before any non-number. All
//! remaining pairs fall back to the lexicographic order of `as_string`.

use std::cmp::Ordering;

use super::refs::Visited;
use super::Value;

impl Value {
    /// Total order over values.
    ///
    /// Safe to use as a `sort_by` comparator on mixed-kind lists.
    pub fn compare(&self, other: &Value) -> Ordering {
        Sides::default().compare(self, other)
    }

    /// Whether `self` orders strictly before `other`.
    pub fn lessthan(&self, other: &Value) -> bool {
        self.compare(other) == Ordering::Less
    }

    /// Value equality.
    ///
    /// Same-kind values compare structurally (function handles by identity,
    /// numbers by IEEE equality). A number never equals a non-number. Other
    /// cross-kind pairs are equal when their string forms are.
    pub fn equals(&self, other: &Value) -> bool {
        Sides::default().equals(self, other)
    }
}

/// Delegates to [`Value::equals`], so cross-kind pairs such as `Null` and
/// `""` compare equal.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.equals(other)
    }
}

/// One walk per operand, so both sides may reach the same slot.
#[derive(Default)]
struct Sides {
    left: Visited,
    right: Visited,
}

impl Sides {
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        self.left.visit(a, |a| {
            self.right.visit(b, |b| match (a, b) {
                (Value::Number(x), Value::Number(y)) => compare_numbers(*x, *y),
                (Value::Number(_), _) => Ordering::Less,
                (_, Value::Number(_)) => Ordering::Greater,
                (Value::Text(x), Value::Text(y)) => x.cmp(y),
                _ => self
                    .left
                    .string_form(a)
                    .cmp(&self.right.string_form(b)),
            })
        })
    }

    fn equals(&self, a: &Value, b: &Value) -> bool {
        self.left.visit(a, |a| {
            self.right.visit(b, |b| match (a, b) {
                (Value::Number(x), Value::Number(y)) => x == y,
                (Value::Number(_), _) | (_, Value::Number(_)) => false,
                (Value::Null, Value::Null) => true,
                (Value::Text(x), Value::Text(y)) => x == y,
                (Value::List(x), Value::List(y)) => {
                    x.len() == y.len() && x.iter().zip(y).all(|(l, r)| self.equals(l, r))
                }
                (Value::Map(x), Value::Map(y)) => {
                    x.len() == y.len()
                        && x
                            .iter()
                            .all(|(k, l)| y.get(k).is_some_and(|r| self.equals(l, r)))
                }
                (Value::Function(x), Value::Function(y)) => x.ptr_eq(y),
                _ => self.left.string_form(a) == self.right.string_form(b),
            })
        })
    }
}

/// Numeric order with every NaN after every other number.
fn compare_numbers(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}
