//! The runtime: heap, dependency graph and proxy tables in one place.
//!
//! Every property operation goes through [`Runtime::get`], [`Runtime::set`],
//! [`Runtime::delete`], [`Runtime::has`] or [`Runtime::own_keys`]. Ordinary
//! objects are handled by the `reflect` module; proxies dispatch into the
//! handler table of their variant.

use crate::base_handlers::variant_handlers;
use crate::config::RuntimeConfig;
use crate::effect::{EffectSlots, EffectStack, TargetMap, TrackingState};
use crate::reactive::ProxyMaps;
use crate::{instrumentations, natives, reflect};
use rx_core::{
    Error, Heap, NativeFn, PropKey, Result, Value, fast_map_new, prop_map_new,
};

pub struct Runtime {
    pub(crate) heap: Heap,
    pub(crate) config: RuntimeConfig,
    pub(crate) deps: TargetMap,
    pub(crate) effects: EffectSlots,
    pub(crate) effect_stack: EffectStack,
    pub(crate) tracking: TrackingState,
    pub(crate) proxies: ProxyMaps,
    pub(crate) warnings: Vec<String>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            heap: Heap::with_threshold(config.gc_threshold),
            config,
            deps: fast_map_new(),
            effects: EffectSlots::default(),
            effect_stack: EffectStack::default(),
            tracking: TrackingState::default(),
            proxies: ProxyMaps::new(),
            warnings: Vec::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    // ------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------

    pub fn string(&mut self, s: &str) -> Value {
        self.heap.alloc_str(s)
    }

    pub fn array(&mut self, elements: Vec<Value>) -> Value {
        self.heap.alloc_list(elements)
    }

    pub fn object<K: Into<PropKey>>(
        &mut self,
        entries: impl IntoIterator<Item = (K, Value)>,
    ) -> Value {
        let mut props = prop_map_new();
        for (key, value) in entries {
            props.insert(key.into(), value);
        }
        self.heap.alloc_dict(props)
    }

    pub fn empty_object(&mut self) -> Value {
        self.heap.alloc_dict(prop_map_new())
    }

    /// A fresh user symbol.
    pub fn symbol(&mut self) -> Value {
        Value::symbol(self.heap.new_symbol())
    }

    pub fn set_prototype(&mut self, obj: Value, proto: Option<Value>) -> Result<bool> {
        self.heap.set_prototype(obj, proto)
    }

    pub fn freeze(&mut self, obj: Value) -> Result<()> {
        self.heap.freeze(obj)
    }

    pub fn display(&self, v: Value) -> String {
        self.heap.display(v)
    }

    // ------------------------------------------------------------------
    // Property operations
    // ------------------------------------------------------------------

    pub fn get(&mut self, obj: Value, key: impl Into<PropKey>) -> Result<Value> {
        let key = key.into();
        self.get_with(obj, &key, obj)
    }

    /// `[[Get]]` with an explicit receiver.
    pub fn get_with(&mut self, obj: Value, key: &PropKey, receiver: Value) -> Result<Value> {
        match self.heap.as_proxy(obj) {
            Some(proxy) => (variant_handlers(proxy.variant).get)(self, proxy.target, key, receiver),
            None => reflect::get(self, obj, key, receiver),
        }
    }

    pub fn set(&mut self, obj: Value, key: impl Into<PropKey>, value: Value) -> Result<bool> {
        let key = key.into();
        self.set_with(obj, &key, value, obj)
    }

    /// `[[Set]]` with an explicit receiver. Returns `false` when the write
    /// was refused.
    pub fn set_with(
        &mut self,
        obj: Value,
        key: &PropKey,
        value: Value,
        receiver: Value,
    ) -> Result<bool> {
        match self.heap.as_proxy(obj) {
            Some(proxy) => {
                (variant_handlers(proxy.variant).set)(self, proxy.target, key, value, receiver)
            }
            None => reflect::set(self, obj, key, value, receiver),
        }
    }

    pub fn delete(&mut self, obj: Value, key: impl Into<PropKey>) -> Result<bool> {
        let key = key.into();
        self.delete_key(obj, &key)
    }

    pub fn delete_key(&mut self, obj: Value, key: &PropKey) -> Result<bool> {
        match self.heap.as_proxy(obj) {
            Some(proxy) => (variant_handlers(proxy.variant).delete_property)(self, proxy.target, key),
            None => reflect::delete(self, obj, key),
        }
    }

    /// The `in` operator: own or inherited property.
    pub fn has(&mut self, obj: Value, key: impl Into<PropKey>) -> Result<bool> {
        let key = key.into();
        self.has_key(obj, &key)
    }

    pub fn has_key(&mut self, obj: Value, key: &PropKey) -> Result<bool> {
        match self.heap.as_proxy(obj) {
            Some(proxy) => (variant_handlers(proxy.variant).has)(self, proxy.target, key),
            None => reflect::has(self, obj, key),
        }
    }

    pub fn own_keys(&mut self, obj: Value) -> Result<Vec<PropKey>> {
        match self.heap.as_proxy(obj) {
            Some(proxy) => (variant_handlers(proxy.variant).own_keys)(self, proxy.target),
            None => reflect::own_keys(self, obj),
        }
    }

    // ------------------------------------------------------------------
    // Calls
    // ------------------------------------------------------------------

    pub fn call(&mut self, f: Value, this: Value, args: &[Value]) -> Result<Value> {
        let Some(native) = f.as_native() else {
            return Err(Error::NotCallable(self.heap.display(f)));
        };
        match native {
            NativeFn::Array(method) => natives::call_array_method(self, method, this, args),
            NativeFn::InstrumentedArray(method) => {
                instrumentations::call_instrumented(self, method, this, args)
            }
            NativeFn::HasOwnProperty => natives::has_own_property(self, this, args),
            NativeFn::TrackedHasOwnProperty => {
                instrumentations::tracked_has_own_property(self, this, args)
            }
        }
    }

    /// Look up `name` on `recv` and call it with `recv` as `this`.
    pub fn call_method(
        &mut self,
        recv: Value,
        name: impl Into<PropKey>,
        args: &[Value],
    ) -> Result<Value> {
        let f = self.get(recv, name)?;
        self.call(f, recv, args)
    }
}
