//! Core types for the rx object model.
//!
//! This crate contains the data side of the runtime, independent of any
//! dependency tracking:
//! - `Value` - NaN-boxed runtime value representation
//! - `PropKey` / `Symbol` - property keys
//! - `Heap` - arena of objects addressed by `ObjectId`, with own-property
//!   operations and mark/sweep collection
//! - `NativeFn` - identities of the built-in methods

pub mod equality;
pub mod error;
pub mod heap;
pub mod key;
pub mod native;
pub mod value;

pub use error::{Error, Result};
pub use heap::{
    DictInstance, FastHashMap, Heap, ListInstance, MAX_DENSE_LENGTH, ManagedObject, ObjectFlags,
    ObjectId, PropMap, ProxyInstance, ProxyVariant, RefInstance, fast_hasher, fast_map_new,
    prop_map_new, prop_map_with_capacity,
};
pub use key::{ITERATE_KEY, MAX_INDEX, PropKey, Symbol};
pub use native::{ArrayMethod, NativeFn};
pub use value::Value;
