//! The uniquing context: owner of every type storage.
//!
//! A [`TypeContext`] hash-conses [`StorageKey`]s into [`TypeStorage`]s, so
//! that structurally equal keys always yield the same [`TypeHandle`].
//!
//! Storages live in per-shard `Bump` arenas and are indexed by a per-shard
//! `HashTable`. A key's hash picks its shard; the whole lookup-or-insert runs
//! under that shard's lock, so two threads interning the same key can never
//! create two storages. Entries are never removed: everything is released at
//! once when the context is dropped, and the `'ctx` borrow on every handle
//! guarantees no handle survives that.

use crate::error::{Resource, Result, TypeError};
use crate::ir::{StorageKey, TypeHandle, TypeStorage};
use crate::options::ContextOptions;
use bumpalo::Bump;
use core::fmt;
use core::hash::BuildHasher;
use core::sync::atomic::{AtomicU64, Ordering};
use hashbrown::{DefaultHashBuilder, HashTable};
use parking_lot::Mutex;
use smallvec::SmallVec;
use static_assertions::assert_impl_all;
use tracing::{debug, trace, warn};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a [`TypeContext`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextId(u64);

impl ContextId {
    fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Snapshot of a context's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextStats {
    /// Number of distinct storages.
    pub storages: usize,
    pub shards: usize,
    /// Bytes held by all shard arenas, including unused chunk space.
    pub allocated_bytes: usize,
}

struct Shard {
    // Entries point into `arena`. Their `'static` is a lie that never
    // escapes: handles re-borrow them for the lifetime of `&TypeContext`.
    table: HashTable<&'static TypeStorage<'static>>,
    arena: Bump,
}

impl Shard {
    fn new(options: &ContextOptions) -> Self {
        let arena = Bump::with_capacity(options.arena_chunk_capacity);
        arena.set_allocation_limit(options.allocation_limit);
        Self {
            table: HashTable::new(),
            arena,
        }
    }

    fn find(&self, hash: u64, key: &StorageKey<'_>) -> Option<&'static TypeStorage<'static>> {
        self.table
            .find(hash, |storage| *key == storage.key())
            .copied()
    }

    /// Copies `key` into the arena and records it in the table.
    ///
    /// All vector elements of `key` must belong to the context `id`.
    fn insert(
        &mut self,
        hash: u64,
        key: &StorageKey<'_>,
        id: ContextId,
    ) -> Result<&'static TypeStorage<'static>> {
        let Shard { table, arena } = self;

        // Reserve first so a full table never strands a fresh storage.
        table
            .try_reserve(1, |storage| storage.hash_value())
            .map_err(|_| TypeError::ResourceExhausted {
                resource: Resource::Table,
            })?;

        let exhausted = |_| TypeError::ResourceExhausted {
            resource: Resource::Arena,
        };
        let key = key.copy_into(arena).map_err(exhausted)?;
        let storage: &TypeStorage<'_> = arena
            .try_alloc(TypeStorage::new(hash, key, id))
            .map_err(exhausted)?;

        // SAFETY: `storage` and every slice it references were allocated in
        // `arena`, which never moves or frees individual allocations and is
        // dropped only together with the owning context. Vector elements
        // point into the same context. The erased lifetime is narrowed back
        // to the `&TypeContext` borrow before any handle is handed out.
        let storage = unsafe {
            core::mem::transmute::<&TypeStorage<'_>, &'static TypeStorage<'static>>(storage)
        };
        table.insert_unique(hash, storage, |storage| storage.hash_value());
        Ok(storage)
    }
}

/// Session-scoped owner of all interned types.
///
/// # Example
///
/// ```
/// use carve_types::{DataLayout, DenseTensorType, ElementKind, TypeContext, DYNAMIC};
///
/// let ctx = TypeContext::new();
/// let a = DenseTensorType::get(&ctx, ElementKind::Float32, &[4, DYNAMIC], DataLayout::RowMajor, &[] as &[&[usize]], 0)?;
/// let b = DenseTensorType::get(&ctx, ElementKind::Float32, &[4, DYNAMIC], DataLayout::RowMajor, &[] as &[&[usize]], 0)?;
/// assert_eq!(a, b);
/// assert_eq!(ctx.len(), 1);
/// # Ok::<(), carve_types::TypeError>(())
/// ```
pub struct TypeContext {
    id: ContextId,
    hasher: DefaultHashBuilder,
    shards: Box<[Mutex<Shard>]>,
}

assert_impl_all!(TypeContext: Send, Sync);

impl TypeContext {
    pub fn new() -> Self {
        Self::with_options(ContextOptions::default())
    }

    pub fn with_options(options: ContextOptions) -> Self {
        let id = ContextId::next();
        let shards: Box<[Mutex<Shard>]> = (0..options.effective_shard_count())
            .map(|_| Mutex::new(Shard::new(&options)))
            .collect();
        debug!(
            context = id.get(),
            shards = shards.len(),
            limit = ?options.allocation_limit,
            "created type context"
        );
        Self {
            id,
            hasher: DefaultHashBuilder::default(),
            shards,
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Returns the canonical handle for `key`, creating its storage on first use.
    ///
    /// Repeated calls with equal keys, from any thread, return equal handles.
    /// Vector elements from another context are adopted into this one first.
    ///
    /// Fails with `InvalidDim`/`InvalidLod` for a malformed key, or with
    /// `ResourceExhausted` when the shard's arena or table is out of memory.
    /// Nothing is recorded on failure.
    pub fn intern(&self, key: StorageKey<'_>) -> Result<TypeHandle<'_>> {
        key.validate()?;
        if let StorageKey::Vector(elements) = key {
            if elements.iter().any(|elem| elem.storage().context() != self.id) {
                let adopted = elements
                    .iter()
                    .map(|elem| self.adopt(*elem))
                    .collect::<Result<SmallVec<[TypeHandle<'_>; 8]>>>()?;
                return self.intern_owned(StorageKey::Vector(&adopted));
            }
        }
        self.intern_owned(key)
    }

    /// Re-interns a handle from any context into this one.
    ///
    /// For a handle that already belongs to this context the result is the
    /// same handle.
    pub fn adopt(&self, handle: TypeHandle<'_>) -> Result<TypeHandle<'_>> {
        self.intern(handle.key())
    }

    // Every vector element in `key` belongs to this context.
    fn intern_owned(&self, key: StorageKey<'_>) -> Result<TypeHandle<'_>> {
        let hash = self.hasher.hash_one(key);
        let index = self.shard_index(hash);
        let mut shard = self.shards[index].lock();

        if let Some(storage) = shard.find(hash, &key) {
            return Ok(TypeHandle::new(storage));
        }

        match shard.insert(hash, &key, self.id) {
            Ok(storage) => {
                trace!(
                    context = self.id.get(),
                    shard = index,
                    kind = ?key.kind(),
                    hash,
                    "interned new type storage"
                );
                Ok(TypeHandle::new(storage))
            }
            Err(err) => {
                warn!(context = self.id.get(), shard = index, %err, "type interning failed");
                Err(err)
            }
        }
    }

    fn shard_index(&self, hash: u64) -> usize {
        // Shard count is a power of two. hashbrown takes its bucket index
        // from the low bits and its 7-bit control tag from the top ones, so
        // the shard comes from the bits just below the tag.
        let bits = self.shards.len().trailing_zeros();
        if bits == 0 {
            0
        } else {
            ((hash << 7) >> (u64::BITS - bits)) as usize
        }
    }

    /// Number of distinct types interned so far.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().table.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> ContextStats {
        let mut stats = ContextStats {
            storages: 0,
            shards: self.shards.len(),
            allocated_bytes: 0,
        };
        for shard in self.shards.iter() {
            let shard = shard.lock();
            stats.storages += shard.table.len();
            stats.allocated_bytes += shard.arena.allocated_bytes();
        }
        stats
    }
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeContext")
            .field("id", &self.id)
            .field("shards", &self.shards.len())
            .finish_non_exhaustive()
    }
}

impl Drop for TypeContext {
    fn drop(&mut self) {
        let (mut storages, mut allocated_bytes) = (0, 0);
        for shard in self.shards.iter_mut() {
            let shard = shard.get_mut();
            storages += shard.table.len();
            allocated_bytes += shard.arena.allocated_bytes();
        }
        debug!(
            context = self.id.get(),
            storages,
            allocated_bytes,
            "dropping type context"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{DataLayout, DenseTensorKey, ElementKind};
    use crate::test_utils::init_test_logging;

    fn tensor(dims: &[i64]) -> StorageKey<'_> {
        StorageKey::DenseTensor(DenseTensorKey {
            dtype: ElementKind::Float32,
            dims,
            layout: DataLayout::RowMajor,
            lod: &[],
            offset: 0,
        })
    }

    #[test]
    fn test_interning() {
        init_test_logging();
        let ctx = TypeContext::new();

        let a = ctx.intern(tensor(&[2, 3])).unwrap();
        let b = ctx.intern(tensor(&[2, 3])).unwrap();
        let c = ctx.intern(tensor(&[3, 2])).unwrap();

        assert!(core::ptr::eq(a.storage(), b.storage()));
        assert!(!core::ptr::eq(a.storage(), c.storage()));
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_key_kinds_are_isolated() {
        let ctx = TypeContext::with_options(ContextOptions::single_threaded());
        let scalar = ctx.intern(StorageKey::Scalar(ElementKind::Float32)).unwrap();
        let empty_vector = ctx.intern(StorageKey::Vector(&[])).unwrap();
        let rank0 = ctx.intern(tensor(&[])).unwrap();

        assert_ne!(scalar, empty_vector);
        assert_ne!(scalar, rank0);
        assert_ne!(empty_vector, rank0);
        assert_eq!(ctx.len(), 3);
    }

    #[test]
    fn test_single_shard_holds_everything() {
        let ctx = TypeContext::with_options(ContextOptions::single_threaded());
        for n in 0..100 {
            ctx.intern(tensor(&[n])).unwrap();
        }
        assert_eq!(ctx.shard_index(u64::MAX), 0);
        assert_eq!(ctx.stats().storages, 100);
    }

    #[test]
    fn test_shard_index_in_range() {
        let ctx = TypeContext::with_options(ContextOptions {
            shard_count: 8,
            ..ContextOptions::default()
        });
        assert_eq!(ctx.shard_index(0), 0);
        assert_eq!(ctx.shard_index(u64::MAX), 7);
    }

    #[test]
    fn test_shard_index_skips_control_tag_bits() {
        let ctx = TypeContext::with_options(ContextOptions {
            shard_count: 8,
            ..ContextOptions::default()
        });
        // The top 7 bits belong to the table's control tag.
        assert_eq!(ctx.shard_index(0x7f << 57), 0);
        assert_eq!(ctx.shard_index(u64::MAX >> 7), 7);
        assert_eq!(ctx.shard_index(1 << 56), 4);
        assert_eq!(ctx.shard_index(1 << 54), 1);
    }

    #[test]
    fn test_colliding_hashes_stay_distinct() {
        let id = ContextId::next();
        let mut shard = Shard::new(&ContextOptions::single_threaded());
        let a = tensor(&[2, 3]);
        let b = tensor(&[3, 2]);

        let stored_a = shard.insert(0, &a, id).unwrap();
        assert!(shard.find(0, &b).is_none());

        let stored_b = shard.insert(0, &b, id).unwrap();
        assert!(!core::ptr::eq(stored_a, stored_b));
        assert!(core::ptr::eq(shard.find(0, &a).unwrap(), stored_a));
        assert!(core::ptr::eq(shard.find(0, &b).unwrap(), stored_b));
        assert_eq!(shard.table.len(), 2);
    }

    #[test]
    fn test_drop_after_interning() {
        init_test_logging();
        let ctx = TypeContext::new();
        for n in 0..32 {
            ctx.intern(tensor(&[n])).unwrap();
        }
        assert_eq!(ctx.len(), 32);
        drop(ctx);
    }

    #[test]
    fn test_malformed_key_is_rejected_before_lookup() {
        let ctx = TypeContext::new();
        let err = ctx.intern(tensor(&[-5, -9])).unwrap_err();
        assert_eq!(err, TypeError::InvalidDim { index: 0, value: -5 });
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_allocation_limit_surfaces_as_error() {
        init_test_logging();
        let ctx = TypeContext::with_options(ContextOptions {
            shard_count: 1,
            allocation_limit: Some(0),
            ..ContextOptions::default()
        });

        let err = ctx.intern(tensor(&[1, 2, 3])).unwrap_err();
        assert_eq!(
            err,
            TypeError::ResourceExhausted {
                resource: Resource::Arena
            }
        );
        // Nothing half-built was recorded.
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_context_ids_are_unique() {
        let a = TypeContext::new();
        let b = TypeContext::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_stats_track_arena_growth() {
        let ctx = TypeContext::with_options(ContextOptions::single_threaded());
        assert_eq!(ctx.stats().storages, 0);
        ctx.intern(tensor(&[1, 2, 3, 4])).unwrap();
        let stats = ctx.stats();
        assert_eq!(stats.storages, 1);
        assert_eq!(stats.shards, 1);
        assert!(stats.allocated_bytes > 0);
    }
}
