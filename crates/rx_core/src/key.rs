//! Property keys and symbols.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A symbol identity.
///
/// Id 0 is reserved for the internal iteration pseudo-key, ids `1..=13` are the
/// well-known symbols and user symbols are handed out by the heap from
/// [`Symbol::FIRST_USER`] on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

const WELL_KNOWN: [&str; 13] = [
    "asyncIterator",
    "hasInstance",
    "isConcatSpreadable",
    "iterator",
    "match",
    "matchAll",
    "replace",
    "search",
    "species",
    "split",
    "toPrimitive",
    "toStringTag",
    "unscopables",
];

impl Symbol {
    pub const ITERATE: Symbol = Symbol(0);
    pub const ASYNC_ITERATOR: Symbol = Symbol(1);
    pub const HAS_INSTANCE: Symbol = Symbol(2);
    pub const IS_CONCAT_SPREADABLE: Symbol = Symbol(3);
    pub const ITERATOR: Symbol = Symbol(4);
    pub const MATCH: Symbol = Symbol(5);
    pub const MATCH_ALL: Symbol = Symbol(6);
    pub const REPLACE: Symbol = Symbol(7);
    pub const SEARCH: Symbol = Symbol(8);
    pub const SPECIES: Symbol = Symbol(9);
    pub const SPLIT: Symbol = Symbol(10);
    pub const TO_PRIMITIVE: Symbol = Symbol(11);
    pub const TO_STRING_TAG: Symbol = Symbol(12);
    pub const UNSCOPABLES: Symbol = Symbol(13);

    pub const FIRST_USER: u32 = 64;

    pub const fn from_raw(id: u32) -> Self {
        Symbol(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }

    /// Built-in symbols are language meta keys, never user data.
    pub fn is_well_known(self) -> bool {
        (1..=WELL_KNOWN.len() as u32).contains(&self.0)
    }

    pub fn well_known_name(self) -> Option<&'static str> {
        if self.is_well_known() {
            Some(WELL_KNOWN[self.0 as usize - 1])
        } else {
            None
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Symbol::ITERATE {
            write!(f, "Symbol(iterate)")
        } else if let Some(name) = self.well_known_name() {
            write!(f, "Symbol(Symbol.{name})")
        } else {
            write!(f, "Symbol(#{})", self.0)
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Property key.
///
/// Canonical array-index strings (`"0"`, `"42"`) are always stored as
/// `Index`, so `"1"` and `1` name the same property. `Str` keeps a
/// pre-computed hash for cheap inequality checks.
#[derive(Clone)]
pub enum PropKey {
    Index(u32),
    Str { hash: u64, data: Rc<str> },
    Symbol(Symbol),
}

/// Pseudo-key standing for "the whole key set" of a plain object.
pub const ITERATE_KEY: PropKey = PropKey::Symbol(Symbol::ITERATE);

/// Largest valid array index (`2^32 - 2`).
pub const MAX_INDEX: u32 = u32::MAX - 1;

impl PropKey {
    /// Create a key from a property name, normalizing canonical indices.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        if let Some(index) = parse_index(s) {
            return PropKey::Index(index);
        }
        PropKey::Str {
            hash: Self::hash_str(s),
            data: Rc::from(s),
        }
    }

    pub fn length() -> Self {
        Self::from_str("length")
    }

    pub fn value() -> Self {
        Self::from_str("value")
    }

    /// Compute hash for a string (used for fast equality comparison)
    #[inline]
    pub fn hash_str(s: &str) -> u64 {
        let mut hasher = ahash::AHasher::default();
        hasher.write(s.as_bytes());
        hasher.finish()
    }

    pub fn is_index(&self) -> bool {
        matches!(self, PropKey::Index(_))
    }

    pub fn as_index(&self) -> Option<u32> {
        match self {
            PropKey::Index(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropKey::Str { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            PropKey::Symbol(sym) => Some(*sym),
            _ => None,
        }
    }

    pub fn is_name(&self, name: &str) -> bool {
        self.as_str() == Some(name)
    }

    pub fn is_length(&self) -> bool {
        self.is_name("length")
    }

    pub fn is_builtin_symbol(&self) -> bool {
        self.as_symbol().is_some_and(Symbol::is_well_known)
    }
}

fn parse_index(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    if bytes.is_empty() || bytes.len() > 10 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    let n: u64 = s.parse().ok()?;
    if n > MAX_INDEX as u64 {
        return None;
    }
    Some(n as u32)
}

impl PartialEq for PropKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropKey::Str { hash: h1, data: d1 }, PropKey::Str { hash: h2, data: d2 }) => {
                if h1 != h2 {
                    return false;
                }
                if Rc::ptr_eq(d1, d2) {
                    return true;
                }
                d1 == d2
            }
            (PropKey::Index(a), PropKey::Index(b)) => a == b,
            (PropKey::Symbol(a), PropKey::Symbol(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PropKey {}

impl Hash for PropKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            PropKey::Index(i) => {
                state.write_u8(0);
                i.hash(state);
            }
            PropKey::Str { data, .. } => {
                state.write_u8(1);
                data.as_bytes().hash(state);
            }
            PropKey::Symbol(sym) => {
                state.write_u8(2);
                sym.hash(state);
            }
        }
    }
}

impl fmt::Display for PropKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropKey::Index(i) => write!(f, "{i}"),
            PropKey::Str { data, .. } => write!(f, "{data}"),
            PropKey::Symbol(sym) => write!(f, "{sym}"),
        }
    }
}

impl fmt::Debug for PropKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropKey::Index(i) => f.debug_tuple("Index").field(i).finish(),
            PropKey::Str { data, .. } => f.debug_tuple("Str").field(&&**data).finish(),
            PropKey::Symbol(sym) => f.debug_tuple("Symbol").field(sym).finish(),
        }
    }
}

impl From<&str> for PropKey {
    fn from(s: &str) -> Self {
        PropKey::from_str(s)
    }
}

impl From<String> for PropKey {
    fn from(s: String) -> Self {
        PropKey::from_str(&s)
    }
}

impl From<&String> for PropKey {
    fn from(s: &String) -> Self {
        PropKey::from_str(s)
    }
}

impl From<u32> for PropKey {
    fn from(i: u32) -> Self {
        if i <= MAX_INDEX {
            PropKey::Index(i)
        } else {
            PropKey::from_str(&i.to_string())
        }
    }
}

impl From<usize> for PropKey {
    fn from(i: usize) -> Self {
        match u32::try_from(i) {
            Ok(i) => PropKey::from(i),
            Err(_) => PropKey::from_str(&i.to_string()),
        }
    }
}

impl From<Symbol> for PropKey {
    fn from(sym: Symbol) -> Self {
        PropKey::Symbol(sym)
    }
}

impl From<&PropKey> for PropKey {
    fn from(key: &PropKey) -> Self {
        key.clone()
    }
}
