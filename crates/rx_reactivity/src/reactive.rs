//! Proxy factory and proxy introspection.
//!
//! Each (target, variant) pair has exactly one canonical proxy. Children are
//! wrapped lazily by the getters, so these maps double as the identity
//! cache that keeps `reactive(x) == reactive(x)` and makes cyclic graphs
//! safe.

use crate::flags;
use crate::runtime::Runtime;
use rx_core::{FastHashMap, ObjectId, PropKey, ProxyInstance, ProxyVariant, Value, fast_map_new};

pub(crate) struct ProxyMaps {
    reactive: FastHashMap<ObjectId, Value>,
    shallow_reactive: FastHashMap<ObjectId, Value>,
    readonly: FastHashMap<ObjectId, Value>,
    shallow_readonly: FastHashMap<ObjectId, Value>,
}

impl ProxyMaps {
    pub(crate) fn new() -> Self {
        Self {
            reactive: fast_map_new(),
            shallow_reactive: fast_map_new(),
            readonly: fast_map_new(),
            shallow_readonly: fast_map_new(),
        }
    }

    fn map(&self, variant: ProxyVariant) -> &FastHashMap<ObjectId, Value> {
        match variant {
            ProxyVariant::Reactive => &self.reactive,
            ProxyVariant::ShallowReactive => &self.shallow_reactive,
            ProxyVariant::Readonly => &self.readonly,
            ProxyVariant::ShallowReadonly => &self.shallow_readonly,
        }
    }

    fn map_mut(&mut self, variant: ProxyVariant) -> &mut FastHashMap<ObjectId, Value> {
        match variant {
            ProxyVariant::Reactive => &mut self.reactive,
            ProxyVariant::ShallowReactive => &mut self.shallow_reactive,
            ProxyVariant::Readonly => &mut self.readonly,
            ProxyVariant::ShallowReadonly => &mut self.shallow_readonly,
        }
    }

    /// Every (target, proxy) entry across all variants.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (ObjectId, Value)> + '_ {
        ProxyVariant::ALL
            .into_iter()
            .flat_map(move |variant| self.map(variant).iter().map(|(id, p)| (*id, *p)))
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(ObjectId, Value) -> bool) {
        for variant in ProxyVariant::ALL {
            self.map_mut(variant).retain(|id, proxy| keep(*id, *proxy));
        }
    }

    pub(crate) fn len(&self) -> usize {
        ProxyVariant::ALL.into_iter().map(|v| self.map(v).len()).sum()
    }
}

impl Runtime {
    /// Deep mutable proxy. Readonly proxies are returned as they are.
    pub fn reactive(&mut self, target: Value) -> Value {
        if self.is_readonly(target) {
            return target;
        }
        self.create_reactive_object(target, ProxyVariant::Reactive)
    }

    /// Mutable proxy that only observes top-level properties.
    pub fn shallow_reactive(&mut self, target: Value) -> Value {
        self.create_reactive_object(target, ProxyVariant::ShallowReactive)
    }

    pub fn readonly(&mut self, target: Value) -> Value {
        self.create_reactive_object(target, ProxyVariant::Readonly)
    }

    pub fn shallow_readonly(&mut self, target: Value) -> Value {
        self.create_reactive_object(target, ProxyVariant::ShallowReadonly)
    }

    fn create_reactive_object(&mut self, target: Value, variant: ProxyVariant) -> Value {
        if !target.is_object() || !self.heap.contains(target.as_obj_id()) {
            let shown = self.heap.display(target);
            self.warn(format!("value cannot be made reactive: {shown}"));
            return target;
        }
        if let Some(existing) = self.heap.as_proxy(target) {
            // Only a readonly view over a mutable proxy adds a layer.
            if !(variant.is_readonly() && !existing.variant.is_readonly()) {
                return target;
            }
        }
        if self.is_skipped(target) {
            return target;
        }
        let id = target.as_obj_id();
        if let Some(proxy) = self.proxies.map(variant).get(&id) {
            return *proxy;
        }
        let proxy = self.heap.alloc_proxy(ProxyInstance { target, variant });
        self.proxies.map_mut(variant).insert(id, proxy);
        tracing::trace!(target: "rx_reactivity", ?variant, target_id = id.0, "new proxy");
        proxy
    }

    fn is_skipped(&self, target: Value) -> bool {
        if self.heap.is_marked_raw(target) || self.heap.is_frozen(target) {
            return true;
        }
        let skip = PropKey::from_str(flags::SKIP);
        matches!(self.heap.get_own(target, &skip), Ok(Some(v)) if v == Value::TRUE)
    }

    /// The canonical proxy of `target` for `variant`, if one was created.
    pub fn canonical_proxy(&self, target: Value, variant: ProxyVariant) -> Option<Value> {
        let id = target.object_id()?;
        self.proxies.map(variant).get(&id).copied()
    }

    /// Number of canonical proxies currently cached.
    pub fn proxy_count(&self) -> usize {
        self.proxies.len()
    }

    /// Exclude a value from proxying for good.
    pub fn mark_raw(&mut self, value: Value) -> Value {
        self.heap.mark_raw(value);
        value
    }

    /// True for mutable proxies, and for readonly proxies over one.
    pub fn is_reactive(&self, value: Value) -> bool {
        match self.heap.as_proxy(value) {
            Some(p) if p.variant.is_readonly() => self.is_reactive(p.target),
            Some(_) => true,
            None => false,
        }
    }

    pub fn is_readonly(&self, value: Value) -> bool {
        self.heap.as_proxy(value).is_some_and(|p| p.variant.is_readonly())
    }

    /// Shallow proxies and shallow refs.
    pub fn is_shallow(&self, value: Value) -> bool {
        if let Some(p) = self.heap.as_proxy(value) {
            return p.variant.is_shallow();
        }
        self.heap.ref_of(value).is_some_and(|r| r.shallow)
    }

    pub fn is_proxy(&self, value: Value) -> bool {
        self.heap.as_proxy(value).is_some()
    }

    /// The object underneath every proxy layer.
    pub fn to_raw(&self, value: Value) -> Value {
        self.heap.peel(value)
    }

    /// `reactive(v)` for composite values, `v` otherwise.
    pub fn to_reactive(&mut self, value: Value) -> Value {
        if value.is_object() {
            self.reactive(value)
        } else {
            value
        }
    }

    pub fn to_readonly(&mut self, value: Value) -> Value {
        if value.is_object() {
            self.readonly(value)
        } else {
            value
        }
    }
}
