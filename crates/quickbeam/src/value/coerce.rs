//! Permissive coercions between value kinds
//!
//! None of these fail. Anything without a sensible conversion degrades to
//! the zero-equivalent of the target type, and a reference that cannot be
//! dereferenced coerces like `Null`.

use super::refs::Visited;
use super::Value;

impl Value {
    /// Truthiness of the value.
    pub fn as_boolean(&self) -> bool {
        self.coerce(|v| match v {
            Value::Null => false,
            Value::Number(n) => truthy(*n),
            Value::Text(s) => {
                let s = s.trim();
                s.eq_ignore_ascii_case("true") || parse_number(s).is_some_and(truthy)
            }
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Function(_) => true,
            Value::Reference(_) => false,
        })
    }

    /// Numeric interpretation of the value.
    pub fn as_number(&self) -> f64 {
        self.coerce(|v| match v {
            Value::Null | Value::Function(_) | Value::Reference(_) => 0.0,
            Value::Number(n) => *n,
            Value::Text(s) => parse_number(s.trim()).unwrap_or(0.0),
            Value::List(items) => items.len() as f64,
            Value::Map(map) => map.len() as f64,
        })
    }

    /// Numeric interpretation truncated to `i32` (saturating, NaN is 0).
    pub fn as_integer(&self) -> i32 {
        self.as_number() as i32
    }

    /// Numeric interpretation truncated to `u32` (saturating, negatives are 0).
    pub fn as_unsigned(&self) -> u32 {
        self.as_number() as u32
    }

    /// Textual interpretation of the value.
    ///
    /// A reference met again inside its own target renders as empty.
    pub fn as_string(&self) -> String {
        Visited::default().string_form(self)
    }

    /// The number payload, or [`Value::NAN_VALUE`] if this is not a number.
    ///
    /// Unlike [`Value::as_number`] this does not parse text or count
    /// elements; it answers "is there a number here" without failing.
    pub fn numeric_value(&self) -> f64 {
        self.coerce(|v| match v {
            Value::Number(n) => *n,
            _ => Value::NAN_VALUE,
        })
    }

    /// Element count for lists and maps, character count for text.
    ///
    /// `Null` has length 0 and every other scalar has length 1.
    pub fn length(&self) -> usize {
        self.coerce(|v| match v {
            Value::Null | Value::Reference(_) => 0,
            Value::Number(_) | Value::Function(_) => 1,
            Value::Text(s) => s.chars().count(),
            Value::List(items) => items.len(),
            Value::Map(map) => map.len(),
        })
    }

    /// Apply `f` to the dereferenced value, or to `Null` if dereferencing fails.
    fn coerce<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        Visited::default().visit(self, f)
    }
}

impl Visited {
    pub(crate) fn string_form(&self, value: &Value) -> String {
        self.visit(value, |v| match v {
            Value::Null | Value::Reference(_) => String::new(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(|item| self.string_form(item))
                .collect::<Vec<_>>()
                .join(","),
            Value::Map(map) => {
                let body = map
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, self.string_form(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{{{}}}", body)
            }
            Value::Function(_) => "<function>".to_string(),
        })
    }
}

fn truthy(n: f64) -> bool {
    n != 0.0 && !n.is_nan()
}

fn parse_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

fn format_number(n: f64) -> String {
    // f64's Display already prints integral values without a fraction
    n.to_string()
}
