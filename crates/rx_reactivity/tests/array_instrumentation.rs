mod common;

use common::*;
use rx_reactivity::Value;

#[test]
fn search_methods_find_proxied_elements() {
    let mut rt = runtime();
    let x = rt.empty_object();
    let arr = rt.array(vec![x]);
    let p = rt.reactive(arr);

    let first = rt.get(p, 0u32).unwrap();
    assert!(rt.is_proxy(first));
    assert_ne!(first, x);

    assert_eq!(rt.call_method(p, "includes", &[first]).unwrap(), Value::TRUE);
    assert_eq!(num(rt.call_method(p, "indexOf", &[first]).unwrap()), 0.0);
    assert_eq!(num(rt.call_method(p, "lastIndexOf", &[first]).unwrap()), 0.0);
    assert_eq!(rt.call_method(p, "includes", &[x]).unwrap(), Value::TRUE);

    let other = rt.empty_object();
    assert_eq!(rt.call_method(p, "includes", &[other]).unwrap(), Value::FALSE);
    assert_eq!(num(rt.call_method(p, "indexOf", &[other]).unwrap()), -1.0);
}

#[test]
fn includes_and_index_of_disagree_on_nan() {
    let mut rt = runtime();
    let arr = rt.array(vec![Value::from(1), Value::NAN]);
    let p = rt.reactive(arr);
    assert_eq!(rt.call_method(p, "includes", &[Value::NAN]).unwrap(), Value::TRUE);
    assert_eq!(num(rt.call_method(p, "indexOf", &[Value::NAN]).unwrap()), -1.0);
    assert_eq!(num(rt.call_method(p, "indexOf", &[Value::from_f64(1.0)]).unwrap()), 0.0);
}

#[test]
fn search_from_index_arguments() {
    let mut rt = runtime();
    let arr = rt.array(ints(&[1, 2, 1, 2]));
    let p = rt.reactive(arr);
    let one = Value::from(1);
    assert_eq!(num(rt.call_method(p, "indexOf", &[one, Value::from(1)]).unwrap()), 2.0);
    assert_eq!(num(rt.call_method(p, "indexOf", &[one, Value::from(-1)]).unwrap()), -1.0);
    assert_eq!(num(rt.call_method(p, "lastIndexOf", &[one]).unwrap()), 2.0);
    assert_eq!(num(rt.call_method(p, "lastIndexOf", &[one, Value::from(1)]).unwrap()), 0.0);
    assert_eq!(rt.call_method(p, "includes", &[one, Value::from(3)]).unwrap(), Value::FALSE);
}

#[test]
fn search_depends_on_every_element_and_the_length() {
    let mut rt = runtime();
    let arr = rt.array(ints(&[1, 2]));
    let p = rt.reactive(arr);
    let (runs, _) = watch(&mut rt, move |rt| {
        rt.call_method(p, "includes", &[Value::from(3)])?;
        Ok(())
    });

    rt.call_method(p, "push", &[Value::from(3)]).unwrap();
    assert_eq!(runs.get(), 2);
    rt.set(p, 0u32, Value::from(9)).unwrap();
    assert_eq!(runs.get(), 3);
}

#[test]
fn effects_pushing_to_the_same_array_run_once_each() {
    let mut rt = runtime();
    let arr = rt.array(vec![]);
    let p = rt.reactive(arr);
    let (a, _) = watch(&mut rt, move |rt| {
        rt.call_method(p, "push", &[Value::from(1)])?;
        Ok(())
    });
    let (b, _) = watch(&mut rt, move |rt| {
        rt.call_method(p, "push", &[Value::from(2)])?;
        Ok(())
    });

    assert_eq!(a.get(), 1);
    assert_eq!(b.get(), 1);
    assert_eq!(rt.display(arr), "[1,2]");
    assert!(rt.dependents_of(p, "length").is_empty());
}

#[test]
fn push_notifies_length_watchers() {
    let mut rt = runtime();
    let arr = rt.array(ints(&[1]));
    let p = rt.reactive(arr);
    let (runs, _) = watch(&mut rt, move |rt| {
        rt.get(p, "length")?;
        Ok(())
    });
    let len = rt.call_method(p, "push", &[Value::from(2), Value::from(3)]).unwrap();
    assert_eq!(num(len), 3.0);
    assert!(runs.get() >= 2);
    assert_eq!(rt.display(arr), "[1,2,3]");
}

#[test]
fn mutators_restore_the_tracking_mode() {
    let mut rt = runtime();
    let arr = rt.array(vec![]);
    let p = rt.reactive(arr);

    rt.call_method(p, "push", &[Value::from(1)]).unwrap();
    assert!(rt.tracking().is_enabled());
    assert_eq!(rt.tracking().depth(), 0);

    rt.pause_tracking();
    rt.call_method(p, "pop", &[]).unwrap();
    assert!(!rt.tracking().is_enabled());
    rt.reset_tracking();
    assert!(rt.tracking().is_enabled());
}

#[test]
fn mutators_through_a_proxy_match_plain_arrays() {
    let mut rt = runtime();
    let arr = rt.array(ints(&[1, 2, 3, 4, 5]));
    let p = rt.reactive(arr);

    assert_eq!(num(rt.call_method(p, "pop", &[]).unwrap()), 5.0);
    assert_eq!(rt.display(arr), "[1,2,3,4]");

    assert_eq!(num(rt.call_method(p, "shift", &[]).unwrap()), 1.0);
    assert_eq!(rt.display(arr), "[2,3,4]");

    let len = rt
        .call_method(p, "unshift", &[Value::from(0), Value::from(1)])
        .unwrap();
    assert_eq!(num(len), 5.0);
    assert_eq!(rt.display(arr), "[0,1,2,3,4]");

    let removed = rt
        .call_method(p, "splice", &[Value::from(1), Value::from(2), Value::from(9)])
        .unwrap();
    assert_eq!(rt.display(removed), "[1,2]");
    assert_eq!(rt.display(arr), "[0,9,3,4]");

    let removed = rt.call_method(p, "splice", &[Value::from(-1)]).unwrap();
    assert_eq!(rt.display(removed), "[4]");
    assert_eq!(rt.display(arr), "[0,9,3]");

    let removed = rt
        .call_method(p, "splice", &[Value::from(1), Value::from(0), Value::from(7), Value::from(8)])
        .unwrap();
    assert_eq!(rt.display(removed), "[]");
    assert_eq!(rt.display(arr), "[0,7,8,9,3]");

    let empty = rt.array(vec![]);
    let pe = rt.reactive(empty);
    assert_eq!(rt.call_method(pe, "pop", &[]).unwrap(), Value::UNDEFINED);
    assert_eq!(rt.call_method(pe, "shift", &[]).unwrap(), Value::UNDEFINED);
}

#[test]
fn pop_notifies_removed_index_and_length() {
    let mut rt = runtime();
    let arr = rt.array(ints(&[1, 2]));
    let p = rt.reactive(arr);
    let (last_runs, _) = watch(&mut rt, move |rt| {
        rt.get(p, 1u32)?;
        Ok(())
    });
    let (first_runs, _) = watch(&mut rt, move |rt| {
        rt.get(p, 0u32)?;
        Ok(())
    });
    rt.call_method(p, "pop", &[]).unwrap();
    assert!(last_runs.get() >= 2);
    assert_eq!(first_runs.get(), 1);
}

#[test]
fn truncating_length_notifies_removed_indices() {
    let mut rt = runtime();
    let arr = rt.array(ints(&[1, 2, 3]));
    let p = rt.reactive(arr);
    let (tail, _) = watch(&mut rt, move |rt| {
        rt.get(p, 2u32)?;
        Ok(())
    });
    let (head, _) = watch(&mut rt, move |rt| {
        rt.get(p, 0u32)?;
        Ok(())
    });

    rt.set(p, "length", Value::from(1)).unwrap();
    assert_eq!(tail.get(), 2);
    assert_eq!(head.get(), 1);
    assert_eq!(rt.get(p, 2u32).unwrap(), Value::UNDEFINED);
}

#[test]
fn readonly_arrays_ignore_mutators() {
    let mut rt = runtime();
    let arr = rt.array(ints(&[1]));
    let r = rt.readonly(arr);
    rt.call_method(r, "push", &[Value::from(2)]).unwrap();
    assert_eq!(rt.display(arr), "[1]");
    assert_eq!(
        rt.take_warnings(),
        vec![
            "Set operation on key \"1\" failed: target is readonly.",
            "Set operation on key \"length\" failed: target is readonly.",
        ]
    );
}

#[test]
fn array_methods_reject_non_array_receivers() {
    let mut rt = runtime();
    let obj = rt.empty_object();
    let arr = rt.array(vec![]);
    let push = rt.get(arr, "push").unwrap();
    assert!(matches!(
        rt.call(push, obj, &[]),
        Err(rx_reactivity::Error::IncompatibleReceiver { method: "push", .. })
    ));
    assert!(matches!(
        rt.call(Value::from(1), obj, &[]),
        Err(rx_reactivity::Error::NotCallable(_))
    ));
}

#[test]
fn huge_indices_fail_without_notifying() {
    let mut rt = runtime();
    let arr = rt.array(ints(&[1]));
    let p = rt.reactive(arr);
    let (runs, _) = watch(&mut rt, move |rt| {
        rt.get(p, "length")?;
        Ok(())
    });

    assert_eq!(
        rt.set(p, 4_000_000_000u32, Value::from(1)),
        Err(rx_reactivity::Error::ArrayTooLong(4_000_000_001))
    );
    assert_eq!(
        rt.set(p, "length", Value::from_f64(4e9)),
        Err(rx_reactivity::Error::ArrayTooLong(4_000_000_000))
    );
    assert_eq!(runs.get(), 1);
    assert_eq!(rt.display(arr), "[1]");
}

#[test]
fn refused_writes_make_mutators_fail() {
    let mut rt = runtime();
    let arr = rt.array(ints(&[1]));
    rt.freeze(arr).unwrap();
    let p = rt.reactive(arr);
    assert_eq!(p, arr);

    assert_eq!(
        rt.call_method(p, "push", &[Value::from(2)]),
        Err(rx_reactivity::Error::WriteRefused {
            op: "set",
            key: "1".into(),
        })
    );
    assert!(matches!(
        rt.call_method(p, "pop", &[]),
        Err(rx_reactivity::Error::WriteRefused { op: "delete", .. })
    ));
    assert_eq!(rt.display(arr), "[1]");
}
