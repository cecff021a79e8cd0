//! Environment tests

use pretty_assertions::assert_eq;
use quickbeam::*;
use std::any::Any;
use std::rc::Rc;

fn answer(cx: &mut Invocation<'_>) -> Result<()> {
    document!(cx, "answer", "", "Returns 42." => "(none):number");
    cx.result().assign(42.0);
    Ok(())
}

fn other_answer(cx: &mut Invocation<'_>) -> Result<()> {
    document!(cx, "answer", "", "Returns 7." => "(none):number");
    cx.result().assign(7.0);
    Ok(())
}

struct File {
    path: String,
}

impl HostObject for File {
    fn type_name(&self) -> &str {
        "file"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Variables and Scoping
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_assign_then_lookup() {
    let env = Environment::new();
    env.assign("x", Value::text("hello"));
    assert_eq!(env.lookup("x", false).unwrap().get(), Value::text("hello"));
}

#[test]
fn test_child_lookup_respects_search_flag() {
    let root = Environment::new();
    root.assign("x", Value::Number(1.0));
    let child = root.child();

    assert!(child.lookup("x", false).is_none());
    assert_eq!(child.lookup("x", true).unwrap().get(), Value::Number(1.0));
}

#[test]
fn test_lookup_missing_is_none() {
    let env = Environment::new().child();
    assert!(env.lookup("nothing", true).is_none());
}

#[test]
fn test_nearest_binding_wins() {
    let root = Environment::new();
    root.assign("x", Value::Number(1.0));
    let middle = root.child();
    middle.assign("x", Value::Number(2.0));
    let leaf = middle.child();

    assert_eq!(leaf.lookup("x", true).unwrap().get(), Value::Number(2.0));
}

#[test]
fn test_slot_writes_are_visible_to_later_lookups() {
    let env = Environment::new();
    let slot = env.assign("counter", Value::Number(0.0));
    slot.borrow_mut().num_mut().map(|n| *n += 1.0).unwrap();
    assert_eq!(env.lookup("counter", false).unwrap().get(), Value::Number(1.0));
}

#[test]
fn test_reference_to_variable_goes_stale_after_unassign() {
    let env = Environment::new();
    let r = env.assign("x", Value::Number(1.0)).reference();
    assert_eq!(r.as_number(), 1.0);
    env.unassign("x");
    assert!(r.is_dangling());
}

#[test]
fn test_closure_keeps_defining_scope_alive() {
    let captured = {
        let root = Environment::new();
        root.assign("outer", Value::text("kept"));
        root.child()
    };
    assert_eq!(captured.lookup("outer", true).unwrap().get(), Value::text("kept"));
}

#[test]
fn test_names_and_cursor_agree() {
    let env = Environment::new();
    for name in ["one", "two", "three"] {
        env.assign(name, Value::Null);
    }
    let mut walked = Vec::new();
    let mut name = env.first();
    while let Some(n) = name {
        walked.push(n);
        name = env.next();
    }
    assert_eq!(walked, env.names());
}

// ═══════════════════════════════════════════════════════════════════════
// Native Functions
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_register_then_lookup_returns_same_entry() {
    let env = Environment::new();
    let data: UserData = Rc::new(String::from("payload"));
    assert!(env.register_func(answer, Some(Rc::clone(&data))));

    let entry = env.lookup_func("answer").unwrap();
    assert_eq!(entry.func as usize, answer as NativeFn as usize);
    assert!(Rc::ptr_eq(entry.user_data.as_ref().unwrap(), &data));
}

#[test]
fn test_reregister_replaces() {
    let env = Environment::new();
    env.register_func(answer, None);
    env.register_func(other_answer, None);
    assert_eq!(env.list_funcs(), vec!["answer"]);

    let mut result = Value::Null;
    env.call("answer", vec![], &mut result, &mut NativeOnly).unwrap();
    assert_eq!(result, Value::Number(7.0));
}

#[test]
fn test_lookup_func_is_local_but_global_is_reachable() {
    let root = Environment::new();
    root.register_func(answer, None);
    let child = root.child();

    assert!(child.lookup_func("answer").is_none());
    assert!(child.global().lookup_func("answer").is_some());
}

#[test]
fn test_call_walks_hierarchy_by_default() {
    let root = Environment::new();
    root.register_func(answer, None);
    let child = root.child().child();

    let mut result = Value::Null;
    child.call("answer", vec![], &mut result, &mut NativeOnly).unwrap();
    assert_eq!(result.as_number(), 42.0);
}

#[test]
fn test_call_scope_policy_does_not_walk() {
    let root = Environment::with_config(Config::new().with_native_lookup(NativeLookup::Scope));
    root.register_func(answer, None);
    let child = root.child();

    let mut result = Value::Null;
    let err = child
        .call("answer", vec![], &mut result, &mut NativeOnly)
        .unwrap_err();
    assert_eq!(
        err,
        Error::Unresolved {
            name: "answer".into()
        }
    );
}

#[test]
fn test_script_variable_shadows_native() {
    let env = Environment::new();
    env.register_func(answer, None);
    let body = Rc::new(());
    env.assign("answer", Value::Function(FunctionBody::new(&body)));

    let mut result = Value::Null;
    let err = env
        .call("answer", vec![], &mut result, &mut NativeOnly)
        .unwrap_err();
    assert!(matches!(err, Error::General(_)));
}

#[test]
fn test_non_function_variable_falls_through_to_native() {
    let env = Environment::new();
    env.register_func(answer, None);
    env.assign("answer", Value::Number(1.0));

    let mut result = Value::Null;
    env.call("answer", vec![], &mut result, &mut NativeOnly).unwrap();
    assert_eq!(result.as_number(), 42.0);
}

// ═══════════════════════════════════════════════════════════════════════
// Host Objects
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_insert_query_destroy() {
    let env = Environment::new();
    let file = Rc::new(File {
        path: "/tmp/a".into(),
    });
    let h = env.insert_object(file.clone());
    assert!(h.get() > 0);

    let found = env.query_object(h).unwrap();
    assert!(std::ptr::addr_eq(Rc::as_ptr(&found), Rc::as_ptr(&file)));

    assert!(env.destroy_object(&*file));
    assert!(env.query_object(h).is_none());
    assert_eq!(file.path, "/tmp/a");
}

#[test]
fn test_query_with_downcast() {
    let env = Environment::new();
    let file = Rc::new(File {
        path: "/tmp/b".into(),
    });
    let h = env.insert_object(file.clone());
    assert_eq!(env.with_object(h, |f: &File| f.path.clone()).as_deref(), Some("/tmp/b"));
    assert_eq!(env.with_object(h, |_: &String| ()), None);
}

#[test]
fn test_object_handle_through_script_number() {
    let env = Environment::with_prelude();
    let file = Rc::new(File {
        path: "/tmp/c".into(),
    });
    let handle = Value::from(env.insert_object(file.clone()));

    let child = env.child();
    let mut result = Value::Null;
    child
        .call("object_type", vec![handle], &mut result, &mut NativeOnly)
        .unwrap();
    assert_eq!(result, Value::text("file"));
}

#[test]
fn test_clear_objs_forgets_without_dropping() {
    let env = Environment::new();
    let file = Rc::new(File {
        path: "/tmp/d".into(),
    });
    let h = env.insert_object(file.clone());
    env.clear_objs();
    assert!(env.query_object(h).is_none());
    assert_eq!(Rc::strong_count(&file), 1);
}
