//! Configuration options for a type context.

/// Configuration for a [`TypeContext`](crate::TypeContext).
///
/// # Example
///
/// ```
/// use carve_types::{ContextOptions, TypeContext};
///
/// let ctx = TypeContext::with_options(ContextOptions {
///     shard_count: 4,
///     ..ContextOptions::default()
/// });
/// assert_eq!(ctx.stats().shards, 4);
/// ```
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Number of independently locked shards.
    ///
    /// Rounded up to a power of two; zero is treated as one.
    ///
    /// Default: 16
    pub shard_count: usize,

    /// Bytes reserved up front in each shard's arena.
    ///
    /// Default: 0 (the first chunk is allocated on first use)
    pub arena_chunk_capacity: usize,

    /// Upper bound on bytes each shard's arena may allocate.
    ///
    /// When reached, interning a new type fails with
    /// [`TypeError::ResourceExhausted`](crate::TypeError::ResourceExhausted).
    ///
    /// Default: None (unbounded)
    pub allocation_limit: Option<usize>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            shard_count: 16,
            arena_chunk_capacity: 0,
            allocation_limit: None,
        }
    }
}

impl ContextOptions {
    /// Options for a context that is only ever used from one thread.
    pub fn single_threaded() -> Self {
        Self {
            shard_count: 1,
            ..Self::default()
        }
    }

    pub(crate) fn effective_shard_count(&self) -> usize {
        self.shard_count.max(1).next_power_of_two()
    }
}
