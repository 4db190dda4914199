//! Value comparison rules.
//!
//! Numbers compare as one numeric type regardless of int/float boxing and
//! strings compare by content; everything else compares by identity.

use crate::heap::Heap;
use crate::value::Value;

impl Heap {
    /// `SameValue`: `NaN` equals itself and `+0` differs from `-0`.
    pub fn same_value(&self, a: Value, b: Value) -> bool {
        if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
            if x.is_nan() && y.is_nan() {
                return true;
            }
            return x == y && x.is_sign_negative() == y.is_sign_negative();
        }
        self.same_reference_or_text(a, b)
    }

    /// `SameValueZero`: like `same_value`, but `+0` equals `-0`.
    pub fn same_value_zero(&self, a: Value, b: Value) -> bool {
        if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
            return (x.is_nan() && y.is_nan()) || x == y;
        }
        self.same_reference_or_text(a, b)
    }

    /// Strict equality: `NaN` never equals anything.
    pub fn strict_equals(&self, a: Value, b: Value) -> bool {
        if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
            return x == y;
        }
        self.same_reference_or_text(a, b)
    }

    /// Whether a write of `new` over `old` counts as a change.
    pub fn has_changed(&self, new: Value, old: Value) -> bool {
        !self.same_value(new, old)
    }

    fn same_reference_or_text(&self, a: Value, b: Value) -> bool {
        if a == b {
            return true;
        }
        match (self.str_of(a), self.str_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}
