//! Ordinary property semantics for non-proxy objects.
//!
//! Lookups walk the prototype chain. A proxy met on the chain dispatches
//! into its own handlers with the original receiver, and a write that
//! reaches the end of the chain defines the property on the receiver.

use crate::runtime::Runtime;
use rx_core::{NativeFn, PropKey, Result, Value};

const PROTO: &str = "__proto__";

pub(crate) fn get(rt: &mut Runtime, obj: Value, key: &PropKey, receiver: Value) -> Result<Value> {
    if obj.is_ref_box() && key.is_name("value") {
        return rt.ref_get(obj);
    }
    if key.is_name(PROTO) {
        return Ok(rt.heap.prototype_of(obj)?.unwrap_or(Value::NULL));
    }
    if let Some(v) = rt.heap.get_own(obj, key)? {
        return Ok(v);
    }
    if let Some(proto) = rt.heap.prototype_of(obj)? {
        return rt.get_with(proto, key, receiver);
    }
    Ok(NativeFn::builtin_method(obj.is_list(), key).map_or(Value::UNDEFINED, Value::native))
}

pub(crate) fn set(
    rt: &mut Runtime,
    obj: Value,
    key: &PropKey,
    value: Value,
    receiver: Value,
) -> Result<bool> {
    if obj.is_ref_box() && key.is_name("value") {
        return rt.ref_set(obj, value);
    }
    if key.is_name(PROTO) {
        if value.is_null() {
            return rt.heap.set_prototype(obj, None);
        }
        if !value.is_object() {
            return Ok(false);
        }
        return rt.heap.set_prototype(obj, Some(value));
    }
    if !rt.heap.has_own(obj, key)? {
        if let Some(proto) = rt.heap.prototype_of(obj)? {
            return rt.set_with(proto, key, value, receiver);
        }
    }
    if !receiver.is_object() {
        return Ok(false);
    }
    rt.heap.define_own(receiver, key, value)
}

pub(crate) fn has(rt: &mut Runtime, obj: Value, key: &PropKey) -> Result<bool> {
    if rt.heap.has_own(obj, key)? {
        return Ok(true);
    }
    if let Some(proto) = rt.heap.prototype_of(obj)? {
        return rt.has_key(proto, key);
    }
    Ok(NativeFn::builtin_method(obj.is_list(), key).is_some())
}

pub(crate) fn delete(rt: &mut Runtime, obj: Value, key: &PropKey) -> Result<bool> {
    rt.heap.delete_own(obj, key)
}

pub(crate) fn own_keys(rt: &mut Runtime, obj: Value) -> Result<Vec<PropKey>> {
    rt.heap.own_keys(obj)
}
