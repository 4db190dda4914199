//! Generic array methods and `hasOwnProperty`.
//!
//! The array methods only touch `this` through the runtime's property
//! operations, so called on a proxy every element and `length` access goes
//! through the proxy's traps.

use crate::runtime::Runtime;
use rx_core::{ArrayMethod, Error, PropKey, Result, Value};

pub(crate) fn call_array_method(
    rt: &mut Runtime,
    method: ArrayMethod,
    this: Value,
    args: &[Value],
) -> Result<Value> {
    if !rt.heap.is_array(this) {
        return Err(Error::IncompatibleReceiver {
            method: method.name(),
            found: this.type_name(),
        });
    }
    match method {
        ArrayMethod::Includes => {
            let search = arg(args, 0);
            let len = length_of(rt, this)?;
            let start = clamp_relative(to_integer(arg(args, 1)), len);
            for k in start..len {
                let element = rt.get(this, index(k))?;
                if rt.heap.same_value_zero(element, search) {
                    return Ok(Value::TRUE);
                }
            }
            Ok(Value::FALSE)
        }
        ArrayMethod::IndexOf => {
            let search = arg(args, 0);
            let len = length_of(rt, this)?;
            let start = clamp_relative(to_integer(arg(args, 1)), len);
            for k in start..len {
                let element = rt.get(this, index(k))?;
                if rt.heap.strict_equals(element, search) {
                    return Ok(Value::from_i64(k));
                }
            }
            Ok(Value::from_i64(-1))
        }
        ArrayMethod::LastIndexOf => {
            let search = arg(args, 0);
            let len = length_of(rt, this)?;
            if len == 0 {
                return Ok(Value::from_i64(-1));
            }
            let from = if args.len() > 1 {
                let n = to_integer(args[1]);
                if n < 0.0 {
                    (len as f64 + n) as i64
                } else {
                    n.min((len - 1) as f64) as i64
                }
            } else {
                len - 1
            };
            let mut k = from;
            while k >= 0 {
                let element = rt.get(this, index(k))?;
                if rt.heap.strict_equals(element, search) {
                    return Ok(Value::from_i64(k));
                }
                k -= 1;
            }
            Ok(Value::from_i64(-1))
        }
        ArrayMethod::Push => {
            let len = length_of(rt, this)?;
            for (i, item) in args.iter().enumerate() {
                put(rt, this, index(len + i as i64), *item)?;
            }
            let new_len = len + args.len() as i64;
            put(rt, this, PropKey::length(), Value::from_i64(new_len))?;
            Ok(Value::from_i64(new_len))
        }
        ArrayMethod::Pop => {
            let len = length_of(rt, this)?;
            if len == 0 {
                put(rt, this, PropKey::length(), Value::from_i64(0))?;
                return Ok(Value::UNDEFINED);
            }
            let last = index(len - 1);
            let element = rt.get(this, last.clone())?;
            remove(rt, this, &last)?;
            put(rt, this, PropKey::length(), Value::from_i64(len - 1))?;
            Ok(element)
        }
        ArrayMethod::Shift => {
            let len = length_of(rt, this)?;
            if len == 0 {
                put(rt, this, PropKey::length(), Value::from_i64(0))?;
                return Ok(Value::UNDEFINED);
            }
            let first = rt.get(this, index(0))?;
            for k in 1..len {
                move_element(rt, this, k, k - 1)?;
            }
            remove(rt, this, &index(len - 1))?;
            put(rt, this, PropKey::length(), Value::from_i64(len - 1))?;
            Ok(first)
        }
        ArrayMethod::Unshift => {
            let len = length_of(rt, this)?;
            let count = args.len() as i64;
            if count > 0 {
                for k in (0..len).rev() {
                    move_element(rt, this, k, k + count)?;
                }
                for (j, item) in args.iter().enumerate() {
                    put(rt, this, index(j as i64), *item)?;
                }
            }
            put(rt, this, PropKey::length(), Value::from_i64(len + count))?;
            Ok(Value::from_i64(len + count))
        }
        ArrayMethod::Splice => splice(rt, this, args),
    }
}

fn splice(rt: &mut Runtime, this: Value, args: &[Value]) -> Result<Value> {
    let len = length_of(rt, this)?;
    let start = clamp_relative(to_integer(arg(args, 0)), len);
    let delete_count = match args.len() {
        0 => 0,
        1 => len - start,
        _ => (to_integer(args[1]).max(0.0) as i64).min(len - start),
    };
    let items = args.get(2..).unwrap_or(&[]);
    let item_count = items.len() as i64;

    let mut removed = Vec::with_capacity(delete_count as usize);
    for k in 0..delete_count {
        let from = index(start + k);
        if rt.has_key(this, &from)? {
            removed.push(rt.get(this, from)?);
        }
    }
    let removed = rt.array(removed);

    if item_count < delete_count {
        for k in start..(len - delete_count) {
            move_element(rt, this, k + delete_count, k + item_count)?;
        }
        for k in ((len - delete_count + item_count)..len).rev() {
            remove(rt, this, &index(k))?;
        }
    } else if item_count > delete_count {
        for k in (start..(len - delete_count)).rev() {
            move_element(rt, this, k + delete_count, k + item_count)?;
        }
    }
    for (j, item) in items.iter().enumerate() {
        put(rt, this, index(start + j as i64), *item)?;
    }
    let new_len = len - delete_count + item_count;
    put(rt, this, PropKey::length(), Value::from_i64(new_len))?;
    Ok(removed)
}

/// Plain `hasOwnProperty`. Proxies are looked through without tracking.
pub(crate) fn has_own_property(rt: &mut Runtime, this: Value, args: &[Value]) -> Result<Value> {
    let key = key_arg(rt, args)?;
    Ok(Value::from_bool(rt.heap.has_own(this, &key)?))
}

/// The property key named by the first argument.
pub(crate) fn key_arg(rt: &Runtime, args: &[Value]) -> Result<PropKey> {
    rt.heap.to_prop_key(arg(args, 0))
}

/// Write that must succeed, like a strict-mode assignment.
fn put(rt: &mut Runtime, this: Value, key: impl Into<PropKey>, value: Value) -> Result<()> {
    let key = key.into();
    if rt.set_with(this, &key, value, this)? {
        return Ok(());
    }
    Err(Error::WriteRefused {
        op: "set",
        key: key.to_string(),
    })
}

fn remove(rt: &mut Runtime, this: Value, key: &PropKey) -> Result<()> {
    if rt.delete_key(this, key)? {
        return Ok(());
    }
    Err(Error::WriteRefused {
        op: "delete",
        key: key.to_string(),
    })
}

fn move_element(rt: &mut Runtime, this: Value, from: i64, to: i64) -> Result<()> {
    let from = index(from);
    let to = index(to);
    if rt.has_key(this, &from)? {
        let value = rt.get(this, from)?;
        put(rt, this, to, value)?;
    } else {
        remove(rt, this, &to)?;
    }
    Ok(())
}

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).copied().unwrap_or(Value::UNDEFINED)
}

fn index(i: i64) -> PropKey {
    PropKey::from(i.max(0) as usize)
}

fn length_of(rt: &mut Runtime, this: Value) -> Result<i64> {
    let len = rt.get(this, PropKey::length())?;
    Ok(match len.as_number() {
        Some(n) if n > 0.0 => n.min(u32::MAX as f64) as i64,
        _ => 0,
    })
}

/// `ToIntegerOrInfinity` for numbers; anything else counts as zero.
fn to_integer(v: Value) -> f64 {
    match v.as_number() {
        Some(n) if !n.is_nan() => n.trunc(),
        _ => 0.0,
    }
}

/// Resolve a possibly negative relative position into `0..=len`.
fn clamp_relative(n: f64, len: i64) -> i64 {
    let len_f = len as f64;
    if n < 0.0 {
        (len_f + n).max(0.0) as i64
    } else {
        n.min(len_f) as i64
    }
}
