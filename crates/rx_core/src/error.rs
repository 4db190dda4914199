//! Errors raised by structural operations.

use crate::heap::ObjectId;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("cannot {op} property '{key}' of {found}")]
    NotAnObject {
        op: &'static str,
        key: String,
        found: &'static str,
    },

    #[error("object {0:?} was garbage collected")]
    Collected(ObjectId),

    #[error("invalid array length: {0}")]
    InvalidArrayLength(String),

    #[error("array length {0} exceeds the dense storage limit")]
    ArrayTooLong(u64),

    #[error("cannot convert {0} to a property key")]
    InvalidKey(&'static str),

    #[error("{0} is not a function")]
    NotCallable(String),

    #[error("cannot {op} property '{key}': the write was refused")]
    WriteRefused { op: &'static str, key: String },

    #[error("{method} called on incompatible receiver {found}")]
    IncompatibleReceiver {
        method: &'static str,
        found: &'static str,
    },
}
