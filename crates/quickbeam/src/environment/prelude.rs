//! Standard prelude with built-in native functions

use std::rc::Rc;

use super::{Environment, ObjectHandle};
use crate::document;
use crate::error::Result;
use crate::invoke::{Invocation, NativeFn};
use crate::value::Value;

/// Every prelude function, in registration order.
pub const PRELUDE: &[NativeFn] = &[
    builtin_typeof,
    builtin_to_string,
    builtin_to_number,
    builtin_length,
    builtin_sort,
    builtin_object_type,
];

impl Environment {
    /// Create a root environment with the prelude registered.
    pub fn with_prelude() -> Rc<Self> {
        let env = Self::new();
        env.load_prelude();
        env
    }

    /// Register the prelude functions at this scope.
    pub fn load_prelude(&self) -> bool {
        self.register_funcs(PRELUDE.iter().copied())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Function Implementations
// ═══════════════════════════════════════════════════════════════════════

fn builtin_typeof(cx: &mut Invocation<'_>) -> Result<()> {
    document!(cx, "typeof", "", "Returns the kind of a value." => "(any):string");
    let kind = cx.arg(0)?.type_name();
    cx.result().assign(kind);
    Ok(())
}

fn builtin_to_string(cx: &mut Invocation<'_>) -> Result<()> {
    document!(
        cx,
        "to_string",
        "Arguments are concatenated when more than one is given.",
        "Converts a value to a string." => "(any):string",
        "Concatenates several values." => "(any, ...):string",
    );
    let mut out = String::new();
    for index in 0..cx.arg_count() {
        out.push_str(&cx.arg(index)?.as_string());
    }
    cx.result().assign(out);
    Ok(())
}

fn builtin_to_number(cx: &mut Invocation<'_>) -> Result<()> {
    document!(cx, "to_number", "", "Converts a value to a number." => "(any):number");
    let n = cx.arg(0)?.as_number();
    cx.result().assign(n);
    Ok(())
}

fn builtin_length(cx: &mut Invocation<'_>) -> Result<()> {
    document!(
        cx,
        "length",
        "Scalars other than null have length 1.",
        "Returns the element count of a list or map." => "(list|map):number",
        "Returns the character count of a string." => "(string):number",
    );
    let len = cx.arg(0)?.length();
    cx.result().assign(len);
    Ok(())
}

fn builtin_sort(cx: &mut Invocation<'_>) -> Result<()> {
    document!(
        cx,
        "sort",
        "Numbers sort before other values.",
        "Returns a sorted copy of a list." => "(list):list",
    );
    let list = cx.arg(0)?;
    let Value::List(mut items) = list else {
        cx.error(format!("sort expects a list, got {}", list.type_name()));
        return Ok(());
    };
    items.sort_by(Value::compare);
    cx.result().assign(items);
    Ok(())
}

fn builtin_object_type(cx: &mut Invocation<'_>) -> Result<()> {
    document!(
        cx,
        "object_type",
        "Objects are resolved in the global environment.",
        "Returns the type name of a host object." => "(number):string",
    );
    let arg = cx.arg(0)?;
    let object = ObjectHandle::from_value(&arg).and_then(|h| cx.env().global().query_object(h));
    match object {
        Some(object) => {
            let name = object.type_name().to_string();
            cx.result().assign(name);
        }
        None => cx.error(format!("invalid object handle: {}", arg)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::DocRecord;
    use crate::error::Error;
    use crate::invoke::NativeOnly;

    fn call(env: &Rc<Environment>, name: &str, args: Vec<Value>) -> Result<Value> {
        let mut result = Value::Null;
        env.call(name, args, &mut result, &mut NativeOnly)?;
        Ok(result)
    }

    #[test]
    fn test_prelude_registers_everything() {
        let env = Environment::with_prelude();
        assert_eq!(env.list_funcs().len(), PRELUDE.len());
        for f in PRELUDE {
            assert!(DocRecord::info(*f).ok());
        }
    }

    #[test]
    fn test_typeof() {
        let env = Environment::with_prelude();
        let out = call(&env, "typeof", vec![Value::list(vec![])]).unwrap();
        assert_eq!(out.str().unwrap(), "list");
    }

    #[test]
    fn test_typeof_without_argument() {
        let env = Environment::with_prelude();
        let err = call(&env, "typeof", vec![]).unwrap_err();
        assert_eq!(err, Error::ArgumentIndex { index: 0, given: 0 });
    }

    #[test]
    fn test_to_string_concatenates() {
        let env = Environment::with_prelude();
        let out = call(&env, "to_string", vec![Value::text("n="), Value::Number(4.0)]).unwrap();
        assert_eq!(out.str().unwrap(), "n=4");
    }

    #[test]
    fn test_to_number_and_length() {
        let env = Environment::with_prelude();
        assert_eq!(call(&env, "to_number", vec![Value::text("2.5")]).unwrap().as_number(), 2.5);
        assert_eq!(call(&env, "length", vec![Value::text("abc")]).unwrap().as_number(), 3.0);
    }

    #[test]
    fn test_sort_rejects_non_list() {
        let env = Environment::with_prelude();
        let err = call(&env, "sort", vec![Value::Number(1.0)]).unwrap_err();
        assert!(matches!(err, Error::Native { ref name, .. } if name == "sort"));
    }

    #[test]
    fn test_object_type_invalid_handle() {
        let env = Environment::with_prelude();
        let err = call(&env, "object_type", vec![Value::Number(99.0)]).unwrap_err();
        assert_eq!(
            err,
            Error::Native {
                name: "object_type".into(),
                message: "invalid object handle: 99".into()
            }
        );
    }
}
