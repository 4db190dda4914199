//! Proxy traps for plain objects and arrays.
//!
//! Four handler tables cover the (readonly, shallow) combinations. Getters
//! and setters are monomorphized over those two flags; the structural traps
//! are shared between the mutable tables.

use crate::flags::{self, ReactiveFlag};
use crate::operations::{TrackOp, TriggerOp};
use crate::runtime::Runtime;
use rx_core::{ArrayMethod, ITERATE_KEY, NativeFn, PropKey, ProxyVariant, Result, Value};

pub type GetTrap = fn(&mut Runtime, Value, &PropKey, Value) -> Result<Value>;
pub type SetTrap = fn(&mut Runtime, Value, &PropKey, Value, Value) -> Result<bool>;
pub type DeleteTrap = fn(&mut Runtime, Value, &PropKey) -> Result<bool>;
pub type HasTrap = fn(&mut Runtime, Value, &PropKey) -> Result<bool>;
pub type OwnKeysTrap = fn(&mut Runtime, Value) -> Result<Vec<PropKey>>;

/// Trap table for one proxy variant. Each trap receives the proxy's
/// target; `get` and `set` also receive the original receiver.
#[derive(Clone, Copy)]
pub struct ProxyHandlers {
    pub get: GetTrap,
    pub set: SetTrap,
    pub delete_property: DeleteTrap,
    pub has: HasTrap,
    pub own_keys: OwnKeysTrap,
}

pub static MUTABLE_HANDLERS: ProxyHandlers = ProxyHandlers {
    get: getter::<false, false>,
    set: setter::<false>,
    delete_property,
    has,
    own_keys,
};

pub static READONLY_HANDLERS: ProxyHandlers = ProxyHandlers {
    get: getter::<true, false>,
    set: readonly_set,
    delete_property: readonly_delete,
    has: readonly_has,
    own_keys: readonly_own_keys,
};

pub static SHALLOW_REACTIVE_HANDLERS: ProxyHandlers = ProxyHandlers {
    get: getter::<false, true>,
    set: setter::<true>,
    delete_property,
    has,
    own_keys,
};

pub static SHALLOW_READONLY_HANDLERS: ProxyHandlers = ProxyHandlers {
    get: getter::<true, true>,
    set: readonly_set,
    delete_property: readonly_delete,
    has: readonly_has,
    own_keys: readonly_own_keys,
};

pub fn handlers_for(readonly: bool, shallow: bool) -> &'static ProxyHandlers {
    variant_handlers(ProxyVariant::new(readonly, shallow))
}

pub fn variant_handlers(variant: ProxyVariant) -> &'static ProxyHandlers {
    match variant {
        ProxyVariant::Reactive => &MUTABLE_HANDLERS,
        ProxyVariant::ShallowReactive => &SHALLOW_REACTIVE_HANDLERS,
        ProxyVariant::Readonly => &READONLY_HANDLERS,
        ProxyVariant::ShallowReadonly => &SHALLOW_READONLY_HANDLERS,
    }
}

fn getter<const READONLY: bool, const SHALLOW: bool>(
    rt: &mut Runtime,
    target: Value,
    key: &PropKey,
    receiver: Value,
) -> Result<Value> {
    if let Some(flag) = ReactiveFlag::from_key(key) {
        match flag {
            ReactiveFlag::IsReactive => return Ok(Value::from_bool(!READONLY)),
            ReactiveFlag::IsReadonly => return Ok(Value::from_bool(READONLY)),
            ReactiveFlag::IsShallow => return Ok(Value::from_bool(SHALLOW)),
            ReactiveFlag::Raw => {
                let variant = ProxyVariant::new(READONLY, SHALLOW);
                if rt.canonical_proxy(target, variant) == Some(receiver) {
                    return Ok(target);
                }
                // Not our own proxy (e.g. reached through a prototype):
                // treat it as an ordinary key.
            }
        }
    }

    let target_is_array = rt.heap.is_array(target);

    if !READONLY {
        if target_is_array {
            if let Some(method) = ArrayMethod::from_key(key) {
                return Ok(Value::native(NativeFn::InstrumentedArray(method)));
            }
        }
        if key.is_name("hasOwnProperty") {
            return Ok(Value::native(NativeFn::TrackedHasOwnProperty));
        }
    }

    let res = rt.get_with(target, key, receiver)?;

    if key.is_builtin_symbol() || flags::is_non_trackable(key) {
        return Ok(res);
    }

    if !READONLY {
        if let Some(id) = rt.to_raw(target).object_id() {
            rt.track(id, TrackOp::Get, key);
        }
    }

    if SHALLOW {
        return Ok(res);
    }

    if rt.is_ref(res) {
        // Refs stored at array indices are handed out as refs.
        if target_is_array && key.is_index() {
            return Ok(res);
        }
        return rt.get(res, PropKey::value());
    }

    if res.is_object() {
        return Ok(if READONLY {
            rt.readonly(res)
        } else {
            rt.reactive(res)
        });
    }

    Ok(res)
}

fn setter<const SHALLOW: bool>(
    rt: &mut Runtime,
    target: Value,
    key: &PropKey,
    value: Value,
    receiver: Value,
) -> Result<bool> {
    let mut value = value;
    let mut old_value = rt.get_with(target, key, target)?;

    if rt.is_readonly(old_value) && rt.is_ref(old_value) && !rt.is_ref(value) {
        return Ok(false);
    }

    let target_is_array = rt.heap.is_array(target);

    if !SHALLOW {
        if !rt.is_shallow(value) && !rt.is_readonly(value) {
            old_value = rt.to_raw(old_value);
            value = rt.to_raw(value);
        }
        if !target_is_array && rt.is_ref(old_value) && !rt.is_ref(value) {
            rt.set(old_value, PropKey::value(), value)?;
            return Ok(true);
        }
    }

    let had_key = match key.as_index() {
        Some(index) if target_is_array => (index as usize) < raw_length(rt, target)?,
        _ => rt.heap.has_own(target, key)?,
    };

    let result = rt.set_with(target, key, value, receiver)?;

    // A write reaching us through a prototype chain belongs to the receiver.
    if result && target == rt.to_raw(receiver) {
        let id = target.as_obj_id();
        if !had_key {
            rt.trigger(id, TriggerOp::Add, Some(key), Some(value), None)?;
        } else if rt.heap.has_changed(value, old_value) {
            rt.trigger(id, TriggerOp::Set, Some(key), Some(value), Some(old_value))?;
        }
    }
    Ok(result)
}

fn delete_property(rt: &mut Runtime, target: Value, key: &PropKey) -> Result<bool> {
    let old_value = rt.heap.get_own(target, key)?;
    let had_key = old_value.is_some();
    let result = rt.delete_key(target, key)?;
    if result && had_key {
        rt.trigger(target.as_obj_id(), TriggerOp::Delete, Some(key), None, old_value)?;
    }
    Ok(result)
}

fn has(rt: &mut Runtime, target: Value, key: &PropKey) -> Result<bool> {
    let result = rt.has_key(target, key)?;
    if !key.is_builtin_symbol() {
        if let Some(id) = rt.to_raw(target).object_id() {
            rt.track(id, TrackOp::Has, key);
        }
    }
    Ok(result)
}

fn own_keys(rt: &mut Runtime, target: Value) -> Result<Vec<PropKey>> {
    let iterate_key = if rt.heap.is_array(target) {
        PropKey::length()
    } else {
        ITERATE_KEY
    };
    if let Some(id) = rt.to_raw(target).object_id() {
        rt.track(id, TrackOp::Iterate, &iterate_key);
    }
    rt.own_keys(target)
}

fn readonly_set(
    rt: &mut Runtime,
    _target: Value,
    key: &PropKey,
    _value: Value,
    _receiver: Value,
) -> Result<bool> {
    rt.warn(format!(
        "Set operation on key \"{key}\" failed: target is readonly."
    ));
    Ok(true)
}

fn readonly_delete(rt: &mut Runtime, _target: Value, key: &PropKey) -> Result<bool> {
    rt.warn(format!(
        "Delete operation on key \"{key}\" failed: target is readonly."
    ));
    Ok(true)
}

fn readonly_has(rt: &mut Runtime, target: Value, key: &PropKey) -> Result<bool> {
    rt.has_key(target, key)
}

fn readonly_own_keys(rt: &mut Runtime, target: Value) -> Result<Vec<PropKey>> {
    rt.own_keys(target)
}

fn raw_length(rt: &Runtime, target: Value) -> Result<usize> {
    let len = rt.heap.get_own(target, &PropKey::length())?;
    Ok(len.and_then(|v| v.as_number()).map_or(0, |n| n as usize))
}
