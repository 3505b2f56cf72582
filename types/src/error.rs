//! Errors raised while constructing or interning types.

use thiserror::Error;

/// Error returned by type constructors and [`TypeContext::intern`](crate::TypeContext::intern).
///
/// Interning a well-formed key can only fail by running out of memory;
/// every other variant is raised by a façade before the key reaches the
/// context's table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A dimension is negative and not the dynamic sentinel.
    #[error("invalid extent {value} at dimension {index}: expected >= 0 or -1 (dynamic)")]
    InvalidDim { index: usize, value: i64 },

    /// A level of detail is empty or not a non-decreasing offset table.
    #[error("invalid level of detail at level {level}: {reason}")]
    InvalidLod { level: usize, reason: &'static str },

    /// The context's arena or table could not grow.
    #[error("resource exhausted while allocating {resource}")]
    ResourceExhausted { resource: Resource },
}

/// What was being allocated when memory ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Storage or key payload in a shard arena.
    Arena,
    /// Slots in a shard's lookup table.
    Table,
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Resource::Arena => write!(f, "type storage"),
            Resource::Table => write!(f, "table slots"),
        }
    }
}

pub type Result<T, E = TypeError> = core::result::Result<T, E>;
