//! Native function identities.
//!
//! Natives carry no state; a function value is just an encoded [`NativeFn`].
//! Their behavior lives in the runtime crate.

use crate::key::PropKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ArrayMethod {
    Includes,
    IndexOf,
    LastIndexOf,
    Push,
    Pop,
    Shift,
    Unshift,
    Splice,
}

impl ArrayMethod {
    pub const ALL: [ArrayMethod; 8] = [
        ArrayMethod::Includes,
        ArrayMethod::IndexOf,
        ArrayMethod::LastIndexOf,
        ArrayMethod::Push,
        ArrayMethod::Pop,
        ArrayMethod::Shift,
        ArrayMethod::Unshift,
        ArrayMethod::Splice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArrayMethod::Includes => "includes",
            ArrayMethod::IndexOf => "indexOf",
            ArrayMethod::LastIndexOf => "lastIndexOf",
            ArrayMethod::Push => "push",
            ArrayMethod::Pop => "pop",
            ArrayMethod::Shift => "shift",
            ArrayMethod::Unshift => "unshift",
            ArrayMethod::Splice => "splice",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    pub fn from_key(key: &PropKey) -> Option<Self> {
        key.as_str().and_then(Self::from_name)
    }

    /// Identity-sensitive search methods.
    pub fn is_search(self) -> bool {
        matches!(
            self,
            ArrayMethod::Includes | ArrayMethod::IndexOf | ArrayMethod::LastIndexOf
        )
    }

    pub fn is_length_mutating(self) -> bool {
        !self.is_search()
    }

    fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeFn {
    /// Plain array method operating on whatever `this` it is called with.
    Array(ArrayMethod),
    /// Array method replacement handed out by mutable proxies.
    InstrumentedArray(ArrayMethod),
    HasOwnProperty,
    /// `hasOwnProperty` that records a membership dependency.
    TrackedHasOwnProperty,
}

const INSTRUMENTED_BIT: u32 = 0x100;
const HAS_OWN: u32 = 0x200;
const TRACKED_HAS_OWN: u32 = 0x201;

impl NativeFn {
    pub fn code(self) -> u32 {
        match self {
            NativeFn::Array(m) => m as u32,
            NativeFn::InstrumentedArray(m) => INSTRUMENTED_BIT | m as u32,
            NativeFn::HasOwnProperty => HAS_OWN,
            NativeFn::TrackedHasOwnProperty => TRACKED_HAS_OWN,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            HAS_OWN => Some(NativeFn::HasOwnProperty),
            TRACKED_HAS_OWN => Some(NativeFn::TrackedHasOwnProperty),
            c if c & INSTRUMENTED_BIT != 0 => {
                ArrayMethod::from_code((c & 0xff) as u8).map(NativeFn::InstrumentedArray)
            }
            c if c <= 0xff => ArrayMethod::from_code(c as u8).map(NativeFn::Array),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NativeFn::Array(m) | NativeFn::InstrumentedArray(m) => m.name(),
            NativeFn::HasOwnProperty | NativeFn::TrackedHasOwnProperty => "hasOwnProperty",
        }
    }

    /// Built-in method found on a list or dict when the own/prototype lookup misses.
    pub fn builtin_method(is_list: bool, key: &PropKey) -> Option<Self> {
        if key.is_name("hasOwnProperty") {
            return Some(NativeFn::HasOwnProperty);
        }
        if is_list {
            return ArrayMethod::from_key(key).map(NativeFn::Array);
        }
        None
    }
}
