//! Array method replacements handed out by mutable proxies.

use crate::natives;
use crate::operations::TrackOp;
use crate::runtime::Runtime;
use rx_core::{ArrayMethod, PropKey, Result, Value};
use smallvec::SmallVec;

pub(crate) fn call_instrumented(
    rt: &mut Runtime,
    method: ArrayMethod,
    this: Value,
    args: &[Value],
) -> Result<Value> {
    if method.is_search() {
        search(rt, method, this, args)
    } else {
        // The raw method reads `length` as it goes; those reads must not
        // subscribe the running effect to the array it is mutating.
        let _paused = rt.tracking().paused();
        natives::call_array_method(rt, method, this, args)
    }
}

/// Identity-sensitive search over the raw array. Arguments that may be
/// proxies are retried in raw form after a miss.
fn search(rt: &mut Runtime, method: ArrayMethod, this: Value, args: &[Value]) -> Result<Value> {
    let raw = rt.to_raw(this);
    let len = rt.get(this, PropKey::length())?;
    let len = len.as_number().map_or(0, |n| n.max(0.0) as u32);
    if let Some(id) = raw.object_id() {
        for i in 0..len {
            rt.track(id, TrackOp::Get, &PropKey::Index(i));
        }
    }

    let res = natives::call_array_method(rt, method, raw, args)?;
    if !is_miss(res) {
        return Ok(res);
    }
    let unwrapped: SmallVec<[Value; 4]> = args.iter().map(|arg| rt.to_raw(*arg)).collect();
    natives::call_array_method(rt, method, raw, &unwrapped)
}

fn is_miss(res: Value) -> bool {
    res == Value::FALSE || res.as_number() == Some(-1.0)
}

/// `hasOwnProperty` on the raw object, recorded as a membership read.
pub(crate) fn tracked_has_own_property(
    rt: &mut Runtime,
    this: Value,
    args: &[Value],
) -> Result<Value> {
    let key = natives::key_arg(rt, args)?;
    let raw = rt.to_raw(this);
    if let Some(id) = raw.object_id() {
        rt.track(id, TrackOp::Has, &key);
    }
    Ok(Value::from_bool(rt.heap.has_own(raw, &key)?))
}
