//! Display and Debug implementations for Value

use std::fmt;

use super::*;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{:?}", s),

            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, "]")
            }

            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {:?}", k, v)?;
                }
                write!(f, "}}")
            }

            Value::Function(body) => write!(f, "{:?}", body),

            // Never recurse through the target: references may form cycles
            Value::Reference(r) if r.is_live() => write!(f, "&<ref>"),
            Value::Reference(_) => write!(f, "&<dangling>"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_format() {
        let v = Value::list(vec![
            Value::Null,
            Value::Number(1.5),
            Value::text("a"),
            Value::map([("k", Value::Number(2.0))]),
        ]);
        assert_eq!(format!("{:?}", v), r#"[null, 1.5, "a", {"k": 2}]"#);
    }

    #[test]
    fn test_display_uses_string_form() {
        assert_eq!(Value::text("plain").to_string(), "plain");
        assert_eq!(Value::Number(2.0).to_string(), "2");
    }

    #[test]
    fn test_debug_reference_does_not_follow() {
        let slot = Slot::new(Value::Null);
        slot.set(slot.reference());
        assert_eq!(format!("{:?}", slot.reference()), "&<ref>");
    }
}
