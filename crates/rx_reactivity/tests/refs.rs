mod common;

use common::*;
use rx_reactivity::Value;

#[test]
fn ref_reads_track_and_changed_writes_notify() {
    let mut rt = runtime();
    let r = rt.new_ref(Value::from(1));
    let (runs, log) = watch(&mut rt, move |rt| {
        rt.get(r, "value")?;
        Ok(())
    });

    rt.set(r, "value", Value::from(2)).unwrap();
    assert_eq!(runs.get(), 2);
    rt.set(r, "value", Value::from(2)).unwrap();
    assert_eq!(runs.get(), 2);

    let events = log.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].new_value, Some(Value::from(2)));
    assert_eq!(events[0].old_value, Some(Value::from(1)));
}

#[test]
fn nan_is_not_a_change_for_refs() {
    let mut rt = runtime();
    let r = rt.new_ref(Value::NAN);
    let (runs, _) = watch(&mut rt, move |rt| {
        rt.get(r, "value")?;
        Ok(())
    });
    rt.set(r, "value", Value::from_f64(f64::NAN)).unwrap();
    assert_eq!(runs.get(), 1);
}

#[test]
fn deep_refs_hand_out_reactive_contents() {
    let mut rt = runtime();
    let o = rt.object([("x", Value::from(1))]);
    let r = rt.new_ref(o);
    let v = rt.get(r, "value").unwrap();
    assert!(rt.is_reactive(v));
    assert_eq!(rt.to_raw(v), o);

    let (runs, _) = watch(&mut rt, move |rt| {
        let v = rt.get(r, "value")?;
        rt.get(v, "x")?;
        Ok(())
    });
    rt.set(v, "x", Value::from(2)).unwrap();
    assert_eq!(runs.get(), 2);

    // Assigning the proxy of the current contents is not a change.
    rt.set(r, "value", v).unwrap();
    assert_eq!(runs.get(), 2);
    assert_eq!(rt.heap().ref_of(r).map(|inst| inst.raw), Some(o));
}

#[test]
fn shallow_refs_store_values_as_given() {
    let mut rt = runtime();
    let o = rt.object([("x", Value::from(1))]);
    let r = rt.new_shallow_ref(o);
    assert!(rt.is_shallow(r));
    assert_eq!(rt.get(r, "value").unwrap(), o);

    let (runs, _) = watch(&mut rt, move |rt| {
        let v = rt.get(r, "value")?;
        rt.get(v, "x")?;
        Ok(())
    });
    rt.set(o, "x", Value::from(2)).unwrap();
    assert_eq!(runs.get(), 1);
    rt.trigger_ref(r).unwrap();
    assert_eq!(runs.get(), 2);
}

#[test]
fn unref_and_ref_detection() {
    let mut rt = runtime();
    let r = rt.new_ref(Value::from(1));
    assert!(rt.is_ref(r));
    assert_eq!(rt.new_ref(r), r);
    assert_eq!(num(rt.unref(r).unwrap()), 1.0);
    assert_eq!(num(rt.unref(Value::from(5)).unwrap()), 5.0);

    let wrapped = rt.reactive(r);
    assert!(rt.is_ref(wrapped));
    assert_eq!(num(rt.unref(wrapped).unwrap()), 1.0);

    let plain = rt.empty_object();
    assert!(!rt.is_ref(plain));
    assert!(!rt.is_ref(Value::from(1)));
}

#[test]
fn ref_exposes_marker_keys() {
    let mut rt = runtime();
    let r = rt.new_ref(Value::from(1));
    assert_eq!(rt.get(r, "__v_isRef").unwrap(), Value::TRUE);
    assert_eq!(rt.get(r, "__v_isShallow").unwrap(), Value::FALSE);
    assert!(rt.has(r, "value").unwrap());
    assert_eq!(rt.own_keys(r).unwrap().len(), 3);
}
