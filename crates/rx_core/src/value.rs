//! Runtime value representation.
//!
//! Values are NaN-boxed into a single `u64`: every float that is not a NaN
//! is stored as-is, everything else lives in the quiet-NaN space with a
//! 4-bit tag and a 48-bit payload (an integer, a flag, or a heap handle).

use crate::heap::ObjectId;
use crate::key::Symbol;
use crate::native::NativeFn;
use std::fmt;

// NaN-Boxing constants
pub const QNAN: u64 = 0x7ff8000000000000;
pub const TAG_BASE: u64 = 0xfff0000000000000;
pub const TAG_MASK: u64 = 0x000f000000000000;
pub const PAYLOAD_MASK: u64 = 0x0000ffffffffffff;

pub const TAG_INT: u64 = 0x0001;
pub const TAG_BOOL: u64 = 0x0002;
pub const TAG_UNDEFINED: u64 = 0x0003;
pub const TAG_NULL: u64 = 0x0004;
pub const TAG_SYMBOL: u64 = 0x0005;
pub const TAG_NATIVE: u64 = 0x0006;

// Everything from here on is a heap handle.
pub const TAG_STR: u64 = 0x0007;
pub const TAG_LIST: u64 = 0x0008;
pub const TAG_DICT: u64 = 0x0009;
pub const TAG_REF: u64 = 0x000a;
pub const TAG_PROXY: u64 = 0x000b;

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Value(u64);

impl Default for Value {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

impl Value {
    pub const UNDEFINED: Value = Value(TAG_BASE | (TAG_UNDEFINED << 48));
    pub const NULL: Value = Value(TAG_BASE | (TAG_NULL << 48));
    pub const TRUE: Value = Value(TAG_BASE | (TAG_BOOL << 48) | 1);
    pub const FALSE: Value = Value(TAG_BASE | (TAG_BOOL << 48));
    pub const NAN: Value = Value(QNAN);
    /// Absent array element. Stored by the heap only, never handed out.
    pub(crate) const HOLE: Value = Value(TAG_BASE | (TAG_UNDEFINED << 48) | 1);

    #[inline(always)]
    pub fn from_f64(f: f64) -> Self {
        // Normalize every NaN (including negative ones) so they can't collide with tags.
        if f.is_nan() {
            return Self(QNAN);
        }
        Self(f.to_bits())
    }

    #[inline(always)]
    pub fn from_i64(i: i64) -> Self {
        // Integers are truncated to 48 bits.
        Self(TAG_BASE | (TAG_INT << 48) | (i as u64 & PAYLOAD_MASK))
    }

    #[inline(always)]
    pub fn from_bool(b: bool) -> Self {
        if b { Self::TRUE } else { Self::FALSE }
    }

    #[inline(always)]
    fn from_payload(tag: u64, payload: u64) -> Self {
        Self(TAG_BASE | (tag << 48) | (payload & PAYLOAD_MASK))
    }

    pub fn symbol(sym: Symbol) -> Self {
        Self::from_payload(TAG_SYMBOL, sym.id() as u64)
    }
    pub fn native(f: NativeFn) -> Self {
        Self::from_payload(TAG_NATIVE, f.code() as u64)
    }
    pub fn string(id: ObjectId) -> Self {
        Self::from_payload(TAG_STR, id.0 as u64)
    }
    pub fn list(id: ObjectId) -> Self {
        Self::from_payload(TAG_LIST, id.0 as u64)
    }
    pub fn dict(id: ObjectId) -> Self {
        Self::from_payload(TAG_DICT, id.0 as u64)
    }
    pub fn ref_box(id: ObjectId) -> Self {
        Self::from_payload(TAG_REF, id.0 as u64)
    }
    pub fn proxy(id: ObjectId) -> Self {
        Self::from_payload(TAG_PROXY, id.0 as u64)
    }

    /// The raw boxed bits.
    #[inline(always)]
    pub fn bits(self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub fn is_f64(&self) -> bool {
        // Tag 0 inside the boxed space can only be negative infinity.
        (self.0 & TAG_BASE) != TAG_BASE || (self.0 & TAG_MASK) == 0
    }
    #[inline(always)]
    pub fn is_int(&self) -> bool {
        (self.0 & 0xffff000000000000) == 0xfff1000000000000
    }
    #[inline(always)]
    pub fn is_number(&self) -> bool {
        self.is_f64() || self.is_int()
    }
    #[inline(always)]
    pub fn is_bool(&self) -> bool {
        !self.is_f64() && self.get_tag() == TAG_BOOL
    }
    #[inline(always)]
    pub fn is_undefined(&self) -> bool {
        *self == Self::UNDEFINED
    }
    #[inline(always)]
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
    pub fn is_nullish(&self) -> bool {
        self.is_undefined() || self.is_null()
    }
    pub fn is_symbol(&self) -> bool {
        !self.is_f64() && self.get_tag() == TAG_SYMBOL
    }
    pub fn is_native(&self) -> bool {
        !self.is_f64() && self.get_tag() == TAG_NATIVE
    }
    pub fn is_str(&self) -> bool {
        !self.is_f64() && self.get_tag() == TAG_STR
    }
    pub fn is_list(&self) -> bool {
        !self.is_f64() && self.get_tag() == TAG_LIST
    }
    pub fn is_dict(&self) -> bool {
        !self.is_f64() && self.get_tag() == TAG_DICT
    }
    pub fn is_ref_box(&self) -> bool {
        !self.is_f64() && self.get_tag() == TAG_REF
    }
    pub fn is_proxy(&self) -> bool {
        !self.is_f64() && self.get_tag() == TAG_PROXY
    }

    /// True for every value that is a handle into the heap, strings included.
    #[inline(always)]
    pub fn is_heap(&self) -> bool {
        !self.is_f64() && self.get_tag() >= TAG_STR
    }

    /// True for composite values: lists, dicts, ref boxes and proxies.
    /// Strings are heap-allocated but behave as primitives.
    #[inline(always)]
    pub fn is_object(&self) -> bool {
        !self.is_f64() && self.get_tag() >= TAG_LIST
    }

    #[inline(always)]
    pub fn as_f64(self) -> f64 {
        f64::from_bits(self.0)
    }

    #[inline(always)]
    pub fn as_i64(&self) -> i64 {
        let val = (self.0 & PAYLOAD_MASK) as i64;
        // Sign extend from 48 bits
        if (val & 0x0000800000000000) != 0 {
            val | -0x0001000000000000
        } else {
            val
        }
    }

    /// Numeric view shared by ints and floats.
    pub fn as_number(&self) -> Option<f64> {
        if self.is_int() {
            Some(self.as_i64() as f64)
        } else if self.is_f64() {
            Some(self.as_f64())
        } else {
            None
        }
    }

    #[inline(always)]
    pub fn as_bool(&self) -> bool {
        (self.0 & 1) != 0
    }

    #[inline(always)]
    pub fn as_obj_id(&self) -> ObjectId {
        ObjectId((self.0 & PAYLOAD_MASK) as usize)
    }

    /// The heap handle, if this value has one.
    pub fn object_id(&self) -> Option<ObjectId> {
        self.is_heap().then(|| self.as_obj_id())
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        self.is_symbol()
            .then(|| Symbol::from_raw((self.0 & PAYLOAD_MASK) as u32))
    }

    pub fn as_native(&self) -> Option<NativeFn> {
        if !self.is_native() {
            return None;
        }
        NativeFn::from_code((self.0 & PAYLOAD_MASK) as u32)
    }

    pub fn get_tag(&self) -> u64 {
        if self.is_f64() {
            0
        } else {
            (self.0 & TAG_MASK) >> 48
        }
    }

    pub fn type_name(&self) -> &'static str {
        if self.is_f64() || self.is_int() {
            "number"
        } else {
            match self.get_tag() {
                TAG_BOOL => "boolean",
                TAG_UNDEFINED => "undefined",
                TAG_NULL => "null",
                TAG_SYMBOL => "symbol",
                TAG_NATIVE => "function",
                TAG_STR => "string",
                TAG_LIST => "array",
                TAG_DICT => "object",
                TAG_REF => "ref",
                TAG_PROXY => "proxy",
                _ => "unknown",
            }
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::from_i64(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::from_i64(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::from_f64(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::from_bool(b)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::symbol(sym)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_f64() {
            write!(f, "Float({})", self.as_f64())
        } else if self.is_int() {
            write!(f, "Int({})", self.as_i64())
        } else if self.is_bool() {
            write!(f, "Bool({})", self.as_bool())
        } else if self.is_undefined() {
            write!(f, "Undefined")
        } else if self.is_null() {
            write!(f, "Null")
        } else if let Some(sym) = self.as_symbol() {
            write!(f, "{sym}")
        } else if self.is_native() {
            match self.as_native() {
                Some(native) => write!(f, "Native({})", native.name()),
                None => write!(f, "Native(?)"),
            }
        } else {
            let tag = self.get_tag();
            let id = self.as_obj_id();
            match tag {
                TAG_STR => write!(f, "Str(id={:?})", id),
                TAG_LIST => write!(f, "List(id={:?})", id),
                TAG_DICT => write!(f, "Dict(id={:?})", id),
                TAG_REF => write!(f, "Ref(id={:?})", id),
                TAG_PROXY => write!(f, "Proxy(id={:?})", id),
                _ => write!(f, "Unknown(tag={}, id={:?})", tag, id),
            }
        }
    }
}
