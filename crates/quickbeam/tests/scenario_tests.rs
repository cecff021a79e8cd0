//! End-to-end scenarios mixing scopes, natives and values

use pretty_assertions::assert_eq;
use quickbeam::*;

#[test]
fn test_root_child_shadowing_scenario() {
    let root = Environment::new();
    root.assign("g", Value::Number(5.0));
    let child = root.child();

    let mut result = Value::Null;
    let err = child
        .call("does_not_exist", vec![], &mut result, &mut NativeOnly)
        .unwrap_err();
    assert_eq!(
        err,
        Error::Unresolved {
            name: "does_not_exist".into()
        }
    );
    assert_eq!(err.to_string(), "unable to resolve function 'does_not_exist'");

    assert_eq!(child.lookup("g", true).unwrap().get(), Value::Number(5.0));

    child.assign("g", Value::Number(9.0));
    assert_eq!(root.lookup("g", false).unwrap().get(), Value::Number(5.0));
    assert_eq!(child.lookup("g", true).unwrap().get(), Value::Number(9.0));
}

#[test]
fn test_prelude_sort_of_mixed_list() {
    let env = Environment::with_prelude();
    let list = Value::list(vec![Value::Number(1.0), Value::text("2"), Value::Number(3.5)]);
    let slot = env.assign("items", list);

    let mut sorted = Value::Null;
    env.child()
        .call("sort", vec![slot.reference()], &mut sorted, &mut NativeOnly)
        .unwrap();

    assert_eq!(
        sorted,
        Value::list(vec![Value::Number(1.0), Value::Number(3.5), Value::text("2")])
    );
    // the input is left untouched
    assert_eq!(slot.get().index(1).unwrap(), &Value::text("2"));
}

#[test]
fn test_map_built_by_host_and_read_by_native() {
    let env = Environment::with_prelude();
    let mut config = Value::Null;
    config.empty_map();
    config.map_item("name", "beam").unwrap();
    config.map_item("size", 3.0).unwrap();
    config.map_unassign("size");
    env.assign("config", config);

    let slot = env.lookup("config", true).unwrap();
    let mut len = Value::Null;
    env.call("length", vec![slot.reference()], &mut len, &mut NativeOnly)
        .unwrap();
    assert_eq!(len, Value::Number(1.0));

    let mut text = Value::Null;
    env.call("to_string", vec![slot.reference()], &mut text, &mut NativeOnly)
        .unwrap();
    assert_eq!(text, Value::text("{name=beam}"));
}

#[test]
fn test_clear_vars_invalidates_outstanding_references() {
    let env = Environment::with_prelude();
    let r = env.assign("tmp", Value::text("x")).reference();
    env.clear_vars();

    let mut result = Value::Null;
    let err = env
        .call("typeof", vec![r], &mut result, &mut NativeOnly)
        .unwrap_err();
    assert_eq!(err, Error::Dereference(DerefFailure::Dangling));
}
