//! Observable proxies over the rx object model.
//!
//! - `runtime` - the `Runtime` and its dispatching property operations
//! - `base_handlers` - proxy traps for objects and arrays
//! - `instrumentations` - array method replacements used by mutable proxies
//! - `effect` - dependency tracking and effect scheduling
//! - `reactive` / `refs` - proxy factory and ref boxes

#![allow(clippy::collapsible_if)]

pub mod base_handlers;
pub mod config;
pub mod effect;
pub mod flags;
mod gc;
mod instrumentations;
mod natives;
pub mod operations;
mod reactive;
mod reflect;
mod refs;
mod runtime;
mod warning;

pub use base_handlers::{ProxyHandlers, handlers_for, variant_handlers};
pub use config::RuntimeConfig;
pub use effect::{
    DebugOp, DebuggerEvent, EffectFn, EffectId, EffectOptions, PauseGuard, SchedulerFn,
    TrackingState,
};
pub use operations::{TrackOp, TriggerOp};
pub use runtime::Runtime;

pub use rx_core::{Error, PropKey, ProxyVariant, Result, Symbol, Value};
