use super::{StorageKey, TypeKindTag, DYNAMIC};
use crate::context::ContextId;
use bitflags::bitflags;
use static_assertions::const_assert;

bitflags! {
    /// Properties of a type computed once when it is interned.
    ///
    /// Caching these avoids walking dims, levels of detail, or vector
    /// elements every time a pass asks.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct TypeFlags: u8 {
        /// At least one extent is [`DYNAMIC`].
        const HAS_DYNAMIC_DIM = 1;
        /// Carries ragged-sequence metadata.
        const HAS_LOD = 1 << 1;
    }
}

/// Canonical, arena-resident state of one distinct type.
///
/// Created exactly once per distinct key by a
/// [`TypeContext`](crate::TypeContext); never mutated, moved, or dropped
/// individually. All slices in `key` point into the same arena as the
/// storage itself.
#[derive(Debug)]
pub struct TypeStorage<'ctx> {
    hash: u64,
    flags: TypeFlags,
    context: ContextId,
    key: StorageKey<'ctx>,
}

// The arena never runs destructors.
const_assert!(!core::mem::needs_drop::<TypeStorage<'static>>());

impl<'ctx> TypeStorage<'ctx> {
    pub(crate) fn new(hash: u64, key: StorageKey<'ctx>, context: ContextId) -> Self {
        Self {
            hash,
            flags: compute_flags(&key),
            context,
            key,
        }
    }

    /// Hash of the key, as computed by the owning context.
    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    pub fn key(&self) -> StorageKey<'ctx> {
        self.key
    }

    pub fn kind(&self) -> TypeKindTag {
        self.key.kind()
    }

    /// Identifier of the context that owns this storage.
    pub fn context(&self) -> ContextId {
        self.context
    }
}

fn compute_flags(key: &StorageKey<'_>) -> TypeFlags {
    match key {
        StorageKey::Scalar(_) => TypeFlags::empty(),
        StorageKey::DenseTensor(tensor) => {
            let mut flags = TypeFlags::empty();
            if tensor.dims.contains(&DYNAMIC) {
                flags |= TypeFlags::HAS_DYNAMIC_DIM;
            }
            if !tensor.lod.is_empty() {
                flags |= TypeFlags::HAS_LOD;
            }
            flags
        }
        // Vectors inherit from their elements.
        StorageKey::Vector(elements) => elements
            .iter()
            .fold(TypeFlags::empty(), |flags, elem| flags | elem.storage().flags()),
    }
}
