//! Object heap and garbage collection.

use crate::error::{Error, Result};
use crate::key::{PropKey, Symbol};
use crate::value::Value;
use ahash::RandomState;
use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;
use std::hash::Hash;
use std::rc::Rc;

/// Handle to a heap-allocated object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

/// Insertion-ordered property storage.
pub type PropMap = IndexMap<PropKey, Value, RandomState>;

pub fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

pub fn fast_map_new<K: Eq + Hash, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(fast_hasher())
}

pub fn prop_map_new() -> PropMap {
    IndexMap::with_hasher(fast_hasher())
}

pub fn prop_map_with_capacity(cap: usize) -> PropMap {
    IndexMap::with_capacity_and_hasher(cap, fast_hasher())
}

/// Which of the four proxy flavors a proxy object is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyVariant {
    Reactive,
    ShallowReactive,
    Readonly,
    ShallowReadonly,
}

impl ProxyVariant {
    pub const ALL: [ProxyVariant; 4] = [
        ProxyVariant::Reactive,
        ProxyVariant::ShallowReactive,
        ProxyVariant::Readonly,
        ProxyVariant::ShallowReadonly,
    ];

    pub const fn new(readonly: bool, shallow: bool) -> Self {
        match (readonly, shallow) {
            (false, false) => ProxyVariant::Reactive,
            (false, true) => ProxyVariant::ShallowReactive,
            (true, false) => ProxyVariant::Readonly,
            (true, true) => ProxyVariant::ShallowReadonly,
        }
    }

    pub const fn is_readonly(self) -> bool {
        matches!(self, ProxyVariant::Readonly | ProxyVariant::ShallowReadonly)
    }

    pub const fn is_shallow(self) -> bool {
        matches!(self, ProxyVariant::ShallowReactive | ProxyVariant::ShallowReadonly)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectFlags {
    /// Frozen objects reject every structural write.
    pub frozen: bool,
    /// Never wrapped in a proxy.
    pub skip: bool,
}

#[derive(Clone)]
pub struct ListInstance {
    /// Elements up to `length`; deleted or never-written slots are holes.
    pub elements: Vec<Value>,
    /// Named (non-index) properties.
    pub props: PropMap,
    pub flags: ObjectFlags,
}

#[derive(Clone)]
pub struct DictInstance {
    pub props: PropMap,
    pub proto: Option<Value>,
    pub flags: ObjectFlags,
}

/// Single-slot container. `raw` is the unwrapped value used for change
/// detection, `value` is what reads hand out.
#[derive(Clone, Debug)]
pub struct RefInstance {
    pub raw: Value,
    pub value: Value,
    pub shallow: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProxyInstance {
    pub target: Value,
    pub variant: ProxyVariant,
}

#[derive(Clone)]
pub enum ManagedObject {
    Str(Rc<str>),
    List(Box<ListInstance>),
    Dict(Box<DictInstance>),
    Ref(Box<RefInstance>),
    Proxy(ProxyInstance),
}

impl ManagedObject {
    pub fn size(&self) -> usize {
        let base = std::mem::size_of::<ManagedObject>();
        let entry = std::mem::size_of::<PropKey>() + std::mem::size_of::<Value>() + 16;
        let deep = match self {
            ManagedObject::Str(s) => s.len() + 16,
            ManagedObject::List(list) => {
                list.elements.capacity() * std::mem::size_of::<Value>()
                    + list.props.capacity() * entry
            }
            ManagedObject::Dict(dict) => dict.props.capacity() * entry + 32,
            ManagedObject::Ref(_) => std::mem::size_of::<RefInstance>(),
            ManagedObject::Proxy(_) => std::mem::size_of::<ProxyInstance>(),
        };
        base + deep
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ManagedObject::Str(_) => "string",
            ManagedObject::List(_) => "array",
            ManagedObject::Dict(_) => "object",
            ManagedObject::Ref(_) => "ref",
            ManagedObject::Proxy(_) => "proxy",
        }
    }

    fn flags(&self) -> Option<&ObjectFlags> {
        match self {
            ManagedObject::List(list) => Some(&list.flags),
            ManagedObject::Dict(dict) => Some(&dict.flags),
            _ => None,
        }
    }

    fn flags_mut(&mut self) -> Option<&mut ObjectFlags> {
        match self {
            ManagedObject::List(list) => Some(&mut list.flags),
            ManagedObject::Dict(dict) => Some(&mut dict.flags),
            _ => None,
        }
    }
}

const DEFAULT_GC_THRESHOLD: usize = 100_000;

/// Longest array the heap will store. Arrays are kept dense, so a write
/// past this length is an error instead of a huge allocation.
pub const MAX_DENSE_LENGTH: usize = 1 << 24;

pub struct Heap {
    objects: Vec<Option<ManagedObject>>,
    free_list: Vec<usize>,
    marks: Vec<u64>,
    alloc_count: usize,
    gc_threshold: usize,
    next_symbol: u32,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_GC_THRESHOLD)
    }

    pub fn with_threshold(gc_threshold: usize) -> Self {
        Self {
            objects: Vec::with_capacity(256),
            free_list: Vec::new(),
            marks: Vec::new(),
            alloc_count: 0,
            gc_threshold,
            next_symbol: Symbol::FIRST_USER,
        }
    }

    /// Allocate a managed object on the heap.
    pub fn alloc(&mut self, obj: ManagedObject) -> ObjectId {
        self.alloc_count += 1;
        if let Some(id) = self.free_list.pop() {
            self.objects[id] = Some(obj);
            ObjectId(id)
        } else {
            let id = self.objects.len();
            self.objects.push(Some(obj));
            ObjectId(id)
        }
    }

    pub fn alloc_str(&mut self, s: &str) -> Value {
        Value::string(self.alloc(ManagedObject::Str(Rc::from(s))))
    }

    pub fn alloc_list(&mut self, elements: Vec<Value>) -> Value {
        Value::list(self.alloc(ManagedObject::List(Box::new(ListInstance {
            elements,
            props: prop_map_new(),
            flags: ObjectFlags::default(),
        }))))
    }

    pub fn alloc_dict(&mut self, props: PropMap) -> Value {
        Value::dict(self.alloc(ManagedObject::Dict(Box::new(DictInstance {
            props,
            proto: None,
            flags: ObjectFlags::default(),
        }))))
    }

    pub fn alloc_ref(&mut self, instance: RefInstance) -> Value {
        Value::ref_box(self.alloc(ManagedObject::Ref(Box::new(instance))))
    }

    pub fn alloc_proxy(&mut self, instance: ProxyInstance) -> Value {
        Value::proxy(self.alloc(ManagedObject::Proxy(instance)))
    }

    pub fn new_symbol(&mut self) -> Symbol {
        let sym = Symbol::from_raw(self.next_symbol);
        self.next_symbol += 1;
        sym
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        matches!(self.objects.get(id.0), Some(Some(_)))
    }

    pub fn get(&self, id: ObjectId) -> Result<&ManagedObject> {
        self.objects
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(Error::Collected(id))
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Result<&mut ManagedObject> {
        self.objects
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(Error::Collected(id))
    }

    /// Rebuild the correctly tagged value for a live object.
    pub fn value_of(&self, id: ObjectId) -> Result<Value> {
        Ok(match self.get(id)? {
            ManagedObject::Str(_) => Value::string(id),
            ManagedObject::List(_) => Value::list(id),
            ManagedObject::Dict(_) => Value::dict(id),
            ManagedObject::Ref(_) => Value::ref_box(id),
            ManagedObject::Proxy(_) => Value::proxy(id),
        })
    }

    pub fn live_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_some()).count()
    }

    pub fn str_of(&self, v: Value) -> Option<&str> {
        if !v.is_str() {
            return None;
        }
        match self.objects.get(v.as_obj_id().0) {
            Some(Some(ManagedObject::Str(s))) => Some(s),
            _ => None,
        }
    }

    pub fn as_proxy(&self, v: Value) -> Option<ProxyInstance> {
        if !v.is_proxy() {
            return None;
        }
        match self.objects.get(v.as_obj_id().0) {
            Some(Some(ManagedObject::Proxy(p))) => Some(*p),
            _ => None,
        }
    }

    pub fn ref_of(&self, v: Value) -> Option<&RefInstance> {
        if !v.is_ref_box() {
            return None;
        }
        match self.objects.get(v.as_obj_id().0) {
            Some(Some(ManagedObject::Ref(r))) => Some(r),
            _ => None,
        }
    }

    pub fn ref_mut(&mut self, v: Value) -> Option<&mut RefInstance> {
        if !v.is_ref_box() {
            return None;
        }
        match self.objects.get_mut(v.as_obj_id().0) {
            Some(Some(ManagedObject::Ref(r))) => Some(r),
            _ => None,
        }
    }

    /// Strip every proxy layer, yielding the ordinary object underneath.
    pub fn peel(&self, mut v: Value) -> Value {
        while let Some(p) = self.as_proxy(v) {
            v = p.target;
        }
        v
    }

    /// Array check that sees through proxies.
    pub fn is_array(&self, v: Value) -> bool {
        let v = self.peel(v);
        v.is_list() && self.contains(v.as_obj_id())
    }

    fn resolve(&self, obj: Value, op: &'static str, key: &PropKey) -> Result<ObjectId> {
        let obj = self.peel(obj);
        if !obj.is_object() {
            return Err(Error::NotAnObject {
                op,
                key: key.to_string(),
                found: obj.type_name(),
            });
        }
        let id = obj.as_obj_id();
        if !self.contains(id) {
            return Err(Error::Collected(id));
        }
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Own-property operations. Proxies are looked through.
    // ------------------------------------------------------------------

    pub fn get_own(&self, obj: Value, key: &PropKey) -> Result<Option<Value>> {
        let id = self.resolve(obj, "read", key)?;
        Ok(match self.get(id)? {
            ManagedObject::List(list) => match key {
                PropKey::Index(i) => list
                    .elements
                    .get(*i as usize)
                    .copied()
                    .filter(|v| *v != Value::HOLE),
                _ if key.is_length() => Some(Value::from_i64(list.elements.len() as i64)),
                _ => list.props.get(key).copied(),
            },
            ManagedObject::Dict(dict) => dict.props.get(key).copied(),
            ManagedObject::Ref(r) => ref_own(r, key),
            ManagedObject::Str(_) | ManagedObject::Proxy(_) => None,
        })
    }

    pub fn has_own(&self, obj: Value, key: &PropKey) -> Result<bool> {
        Ok(self.get_own(obj, key)?.is_some())
    }

    /// Create or overwrite an own data property. Returns `false` when the
    /// object refuses the write.
    pub fn define_own(&mut self, obj: Value, key: &PropKey, value: Value) -> Result<bool> {
        let id = self.resolve(obj, "set", key)?;
        let new_len = match self.get(id)? {
            ManagedObject::List(_) if key.is_length() => Some(self.array_length(value)?),
            _ => None,
        };
        match self.get_mut(id)? {
            ManagedObject::List(list) => {
                if list.flags.frozen {
                    return Ok(false);
                }
                if let Some(len) = new_len {
                    list.elements.resize(len, Value::HOLE);
                    return Ok(true);
                }
                match key {
                    PropKey::Index(i) => {
                        let i = *i as usize;
                        if i >= MAX_DENSE_LENGTH {
                            return Err(Error::ArrayTooLong(i as u64 + 1));
                        }
                        if i >= list.elements.len() {
                            list.elements.resize(i + 1, Value::HOLE);
                        }
                        list.elements[i] = value;
                    }
                    _ => {
                        list.props.insert(key.clone(), value);
                    }
                }
                Ok(true)
            }
            ManagedObject::Dict(dict) => {
                if dict.flags.frozen {
                    return Ok(false);
                }
                dict.props.insert(key.clone(), value);
                Ok(true)
            }
            ManagedObject::Ref(r) if key.is_name("value") => {
                r.raw = value;
                r.value = value;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Remove an own property. Deleting an absent key succeeds; deleting an
    /// array element leaves a hole.
    pub fn delete_own(&mut self, obj: Value, key: &PropKey) -> Result<bool> {
        let id = self.resolve(obj, "delete", key)?;
        match self.get_mut(id)? {
            ManagedObject::List(list) => match key {
                PropKey::Index(i) => {
                    let i = *i as usize;
                    if list.elements.get(i).is_some_and(|v| *v != Value::HOLE) {
                        if list.flags.frozen {
                            return Ok(false);
                        }
                        list.elements[i] = Value::HOLE;
                    }
                    Ok(true)
                }
                _ if key.is_length() => Ok(false),
                _ => {
                    if list.props.contains_key(key) {
                        if list.flags.frozen {
                            return Ok(false);
                        }
                        list.props.shift_remove(key);
                    }
                    Ok(true)
                }
            },
            ManagedObject::Dict(dict) => {
                if dict.props.contains_key(key) {
                    if dict.flags.frozen {
                        return Ok(false);
                    }
                    dict.props.shift_remove(key);
                }
                Ok(true)
            }
            ManagedObject::Ref(r) => Ok(ref_own(r, key).is_none()),
            _ => Ok(true),
        }
    }

    /// Own keys in enumeration order: indices ascending, then names in
    /// insertion order, then symbols in insertion order.
    pub fn own_keys(&self, obj: Value) -> Result<Vec<PropKey>> {
        let id = self.resolve(obj, "enumerate", &PropKey::from_str("*"))?;
        Ok(match self.get(id)? {
            ManagedObject::List(list) => {
                let mut keys: Vec<PropKey> = list
                    .elements
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| **v != Value::HOLE)
                    .map(|(i, _)| PropKey::from(i))
                    .collect();
                keys.push(PropKey::length());
                keys.extend(ordered_keys(&list.props));
                keys
            }
            ManagedObject::Dict(dict) => ordered_keys(&dict.props),
            ManagedObject::Ref(_) => REF_KEYS.iter().map(|k| PropKey::from_str(k)).collect(),
            _ => Vec::new(),
        })
    }

    pub fn prototype_of(&self, obj: Value) -> Result<Option<Value>> {
        let id = self.resolve(obj, "read", &PropKey::from_str("__proto__"))?;
        Ok(match self.get(id)? {
            ManagedObject::Dict(dict) => dict.proto,
            _ => None,
        })
    }

    /// Replace the prototype of a dict. Cycles and frozen targets are refused.
    pub fn set_prototype(&mut self, obj: Value, proto: Option<Value>) -> Result<bool> {
        let id = self.resolve(obj, "set", &PropKey::from_str("__proto__"))?;
        let mut cursor = proto;
        while let Some(p) = cursor {
            if !p.is_dict() {
                break;
            }
            if p.as_obj_id() == id {
                return Ok(false);
            }
            cursor = match self.get(p.as_obj_id())? {
                ManagedObject::Dict(dict) => dict.proto,
                _ => None,
            };
        }
        match self.get_mut(id)? {
            ManagedObject::Dict(dict) if !dict.flags.frozen => {
                dict.proto = proto;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn freeze(&mut self, obj: Value) -> Result<()> {
        let id = self.resolve(obj, "freeze", &PropKey::from_str("*"))?;
        if let Some(flags) = self.get_mut(id)?.flags_mut() {
            flags.frozen = true;
        }
        Ok(())
    }

    pub fn is_frozen(&self, obj: Value) -> bool {
        self.flags_of(obj).is_some_and(|f| f.frozen)
    }

    pub fn mark_raw(&mut self, obj: Value) {
        let obj = self.peel(obj);
        if let Some(Some(o)) = obj.object_id().and_then(|id| self.objects.get_mut(id.0)) {
            if let Some(flags) = o.flags_mut() {
                flags.skip = true;
            }
        }
    }

    pub fn is_marked_raw(&self, obj: Value) -> bool {
        self.flags_of(obj).is_some_and(|f| f.skip)
    }

    fn flags_of(&self, obj: Value) -> Option<ObjectFlags> {
        let obj = self.peel(obj);
        let id = obj.object_id()?;
        self.objects.get(id.0)?.as_ref()?.flags().copied()
    }

    fn array_length(&self, value: Value) -> Result<usize> {
        match value.as_number() {
            Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => {
                if n > MAX_DENSE_LENGTH as f64 {
                    return Err(Error::ArrayTooLong(n as u64));
                }
                Ok(n as usize)
            }
            _ => Err(Error::InvalidArrayLength(self.display(value))),
        }
    }

    /// Convert a value to the property key it names.
    pub fn to_prop_key(&self, v: Value) -> Result<PropKey> {
        if let Some(sym) = v.as_symbol() {
            return Ok(PropKey::Symbol(sym));
        }
        if v.is_int() {
            let i = v.as_i64();
            return Ok(match u32::try_from(i) {
                Ok(i) => PropKey::from(i),
                Err(_) => PropKey::from_str(&i.to_string()),
            });
        }
        if let Some(s) = self.str_of(v) {
            return Ok(PropKey::from_str(s));
        }
        if v.is_f64() || v.is_bool() || v.is_nullish() {
            return Ok(PropKey::from_str(&self.display(v)));
        }
        Err(Error::InvalidKey(v.type_name()))
    }

    // ------------------------------------------------------------------
    // Garbage collection
    // ------------------------------------------------------------------

    #[inline]
    pub fn should_collect(&self) -> bool {
        self.alloc_count >= self.gc_threshold
    }

    pub fn alloc_count(&self) -> usize {
        self.alloc_count
    }

    pub fn set_threshold(&mut self, gc_threshold: usize) {
        self.gc_threshold = gc_threshold;
    }

    pub fn is_marked(&self, id: ObjectId) -> bool {
        let word = id.0 >> 6;
        let bit = id.0 & 63;
        self.marks.get(word).is_some_and(|w| (w & (1 << bit)) != 0)
    }

    fn set_mark(&mut self, id: ObjectId) -> bool {
        let word = id.0 >> 6;
        let bit = id.0 & 63;
        if word >= self.marks.len() {
            self.marks.resize(word + 1, 0);
        }
        let w = &mut self.marks[word];
        let mask = 1 << bit;
        if (*w & mask) != 0 {
            return false;
        }
        *w |= mask;
        true
    }

    /// Clear marks left over from a previous cycle.
    pub fn start_marking(&mut self) {
        self.marks.clear();
    }

    /// Mark everything reachable from `roots`. Can be called repeatedly
    /// within one cycle to add more roots.
    pub fn mark_from(&mut self, roots: &[Value]) {
        let mut pending: Vec<Value> = roots.to_vec();
        while let Some(val) = pending.pop() {
            let Some(id) = val.object_id() else {
                continue;
            };
            if !self.contains(id) || !self.set_mark(id) {
                continue;
            }
            match &self.objects[id.0] {
                Some(ManagedObject::List(list)) => {
                    pending.extend(list.elements.iter().copied());
                    pending.extend(list.props.values().copied());
                }
                Some(ManagedObject::Dict(dict)) => {
                    pending.extend(dict.props.values().copied());
                    pending.extend(dict.proto);
                }
                Some(ManagedObject::Ref(r)) => {
                    pending.push(r.raw);
                    pending.push(r.value);
                }
                Some(ManagedObject::Proxy(p)) => pending.push(p.target),
                Some(ManagedObject::Str(_)) | None => {}
            }
        }
    }

    /// Free every unmarked object and return how many were freed.
    pub fn sweep(&mut self) -> usize {
        let mut freed = 0;
        let mut live = 0;
        self.free_list.clear();
        for i in 0..self.objects.len() {
            if self.objects[i].is_some() {
                if self.is_marked(ObjectId(i)) {
                    live += 1;
                } else {
                    self.objects[i] = None;
                    self.free_list.push(i);
                    freed += 1;
                }
            } else {
                self.free_list.push(i);
            }
        }

        // Truncate trailing empty slots
        while self.objects.last().is_some_and(|o| o.is_none()) {
            self.objects.pop();
        }
        let new_len = self.objects.len();
        self.free_list.retain(|&i| i < new_len);

        self.marks.clear();
        self.alloc_count = 0;
        self.gc_threshold = (live * 2).max(DEFAULT_GC_THRESHOLD / 4);
        freed
    }

    // ------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------

    pub fn display(&self, v: Value) -> String {
        let mut visited = HashSet::new();
        self.display_impl(v, &mut visited)
    }

    fn display_impl(&self, v: Value, visited: &mut HashSet<usize>) -> String {
        if v.is_undefined() {
            return "undefined".to_string();
        }
        if v.is_null() {
            return "null".to_string();
        }
        if v.is_bool() {
            return v.as_bool().to_string();
        }
        if v.is_int() {
            return v.as_i64().to_string();
        }
        if v.is_f64() {
            return format_number(v.as_f64());
        }
        if let Some(sym) = v.as_symbol() {
            return sym.to_string();
        }
        if let Some(native) = v.as_native() {
            return format!("function {}", native.name());
        }
        let id = v.as_obj_id();
        let Ok(obj) = self.get(id) else {
            return "<collected>".to_string();
        };
        if let ManagedObject::Str(s) = obj {
            return s.to_string();
        }
        if !visited.insert(id.0) {
            return match obj {
                ManagedObject::List(_) => "[...]".to_string(),
                _ => "{...}".to_string(),
            };
        }
        let out = match obj {
            ManagedObject::List(list) => {
                let items: Vec<String> = list
                    .elements
                    .iter()
                    .map(|item| {
                        if *item == Value::HOLE {
                            String::new()
                        } else {
                            self.display_nested(*item, visited)
                        }
                    })
                    .collect();
                format!("[{}]", items.join(","))
            }
            ManagedObject::Dict(dict) => {
                let items: Vec<String> = dict
                    .props
                    .iter()
                    .map(|(k, item)| format!("{}: {}", k, self.display_nested(*item, visited)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            }
            ManagedObject::Ref(r) => format!("Ref<{}>", self.display_nested(r.value, visited)),
            ManagedObject::Proxy(p) => {
                format!("{:?}<{}>", p.variant, self.display_nested(p.target, visited))
            }
            ManagedObject::Str(s) => s.to_string(),
        };
        visited.remove(&id.0);
        out
    }

    fn display_nested(&self, v: Value, visited: &mut HashSet<usize>) -> String {
        match self.str_of(v) {
            Some(s) => format!("{s:?}"),
            None => self.display_impl(v, visited),
        }
    }
}

const REF_KEYS: [&str; 3] = ["__v_isRef", "__v_isShallow", "value"];

fn ref_own(r: &RefInstance, key: &PropKey) -> Option<Value> {
    match key.as_str()? {
        "value" => Some(r.value),
        "__v_isRef" => Some(Value::TRUE),
        "__v_isShallow" => Some(Value::from_bool(r.shallow)),
        _ => None,
    }
}

fn ordered_keys(props: &PropMap) -> Vec<PropKey> {
    let mut indices: Vec<u32> = props.keys().filter_map(PropKey::as_index).collect();
    indices.sort_unstable();
    let mut keys: Vec<PropKey> = indices.into_iter().map(PropKey::Index).collect();
    keys.extend(props.keys().filter(|k| k.as_str().is_some()).cloned());
    keys.extend(props.keys().filter(|k| k.as_symbol().is_some()).cloned());
    keys
}

pub fn format_number(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let s = if f > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
