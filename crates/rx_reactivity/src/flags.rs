//! Reserved property names.

use rx_core::PropKey;

pub const SKIP: &str = "__v_skip";
pub const IS_REACTIVE: &str = "__v_isReactive";
pub const IS_READONLY: &str = "__v_isReadonly";
pub const IS_SHALLOW: &str = "__v_isShallow";
pub const RAW: &str = "__v_raw";

/// Metadata queries answered by proxies before any property lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactiveFlag {
    IsReactive,
    IsReadonly,
    IsShallow,
    Raw,
}

impl ReactiveFlag {
    pub fn from_key(key: &PropKey) -> Option<Self> {
        match key.as_str()? {
            IS_REACTIVE => Some(ReactiveFlag::IsReactive),
            IS_READONLY => Some(ReactiveFlag::IsReadonly),
            IS_SHALLOW => Some(ReactiveFlag::IsShallow),
            RAW => Some(ReactiveFlag::Raw),
            _ => None,
        }
    }
}

/// Internal escape hatches that are read without tracking.
pub fn is_non_trackable(key: &PropKey) -> bool {
    matches!(key.as_str(), Some("__proto__" | "__v_isRef" | "__isVue"))
}
