//! Serde serialization for values
//!
//! Lets a host dump script data (an environment snapshot, a function
//! result) to any serde format. References serialize as their target.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::refs::Visited;
use super::Value;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Walk {
            value: self,
            visited: &Visited::default(),
        }
        .serialize(serializer)
    }
}

/// A value plus the slots already entered above it.
///
/// A reference back into one of those slots serializes as unit.
struct Walk<'a> {
    value: &'a Value,
    visited: &'a Visited,
}

impl Serialize for Walk<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let visited = self.visited;
        visited.visit(self.value, |value| match value {
            Value::Null | Value::Reference(_) => serializer.serialize_unit(),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for value in items {
                    seq.serialize_element(&Walk { value, visited })?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, value) in map {
                    out.serialize_entry(k, &Walk { value, visited })?;
                }
                out.end()
            }
            Value::Function(_) => serializer.serialize_str("<function>"),
        })
    }
}
