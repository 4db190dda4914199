//! Ref boxes.
//!
//! A ref holds one value behind its `value` property. Reads track
//! `(ref, "value")`; writes compare against the stored raw value and notify
//! on change. Deep refs hand out reactive proxies for composite contents.

use crate::operations::{TrackOp, TriggerOp};
use crate::runtime::Runtime;
use rx_core::{Error, PropKey, RefInstance, Result, Value};

impl Runtime {
    pub fn new_ref(&mut self, value: Value) -> Value {
        self.create_ref(value, false)
    }

    /// A ref that stores its contents as given, without reactive wrapping.
    pub fn new_shallow_ref(&mut self, value: Value) -> Value {
        self.create_ref(value, true)
    }

    fn create_ref(&mut self, value: Value, shallow: bool) -> Value {
        if self.is_ref(value) {
            return value;
        }
        let (raw, value) = if shallow {
            (value, value)
        } else {
            (self.to_raw(value), self.to_reactive(value))
        };
        self.heap.alloc_ref(RefInstance {
            raw,
            value,
            shallow,
        })
    }

    /// True for refs and for proxies wrapping one.
    pub fn is_ref(&self, value: Value) -> bool {
        let raw = self.to_raw(value);
        self.heap.ref_of(raw).is_some()
    }

    /// The ref's value, or `value` itself when it is not a ref.
    pub fn unref(&mut self, value: Value) -> Result<Value> {
        if self.is_ref(value) {
            self.get(value, PropKey::value())
        } else {
            Ok(value)
        }
    }

    /// Notify dependents of a ref without changing it, e.g. after mutating
    /// the contents of a shallow ref in place.
    pub fn trigger_ref(&mut self, r: Value) -> Result<()> {
        let raw = self.to_raw(r);
        let Some(current) = self.heap.ref_of(raw).map(|inst| inst.value) else {
            return Ok(());
        };
        self.trigger(
            raw.as_obj_id(),
            TriggerOp::Set,
            Some(&PropKey::value()),
            Some(current),
            None,
        )
    }

    pub(crate) fn ref_get(&mut self, r: Value) -> Result<Value> {
        let id = r.as_obj_id();
        self.track(id, TrackOp::Get, &PropKey::value());
        self.heap
            .ref_of(r)
            .map(|inst| inst.value)
            .ok_or(Error::Collected(id))
    }

    pub(crate) fn ref_set(&mut self, r: Value, new_value: Value) -> Result<bool> {
        let id = r.as_obj_id();
        let current = self.heap.ref_of(r).cloned().ok_or(Error::Collected(id))?;
        let use_direct = current.shallow || self.is_shallow(new_value) || self.is_readonly(new_value);
        let new_raw = if use_direct {
            new_value
        } else {
            self.to_raw(new_value)
        };
        if !self.heap.has_changed(new_raw, current.raw) {
            return Ok(true);
        }
        let stored = if use_direct {
            new_value
        } else {
            self.to_reactive(new_value)
        };
        if let Some(slot) = self.heap.ref_mut(r) {
            slot.raw = new_raw;
            slot.value = stored;
        }
        self.trigger(
            id,
            TriggerOp::Set,
            Some(&PropKey::value()),
            Some(stored),
            Some(current.value),
        )?;
        Ok(true)
    }
}
