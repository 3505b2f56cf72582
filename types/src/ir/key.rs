//! Structural keys identifying a distinct type.
//!
//! A [`StorageKey`] is a borrowed, `Copy` description of a type's content.
//! Lookups are done with keys that borrow caller memory; on a miss the key is
//! copied into the context arena and becomes the permanent state of a
//! [`TypeStorage`](super::TypeStorage).
//!
//! Every key starts with its kind discriminator, so keys of different kinds
//! never compare equal even when their payloads happen to overlap.

use super::{DYNAMIC, DataLayout, ElementKind, TypeHandle};
use crate::error::TypeError;
use bumpalo::{AllocErr, Bump};
use smallvec::SmallVec;

/// Discriminator of the type family a key belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeKindTag {
    Scalar,
    DenseTensor,
    Vector,
}

/// Structural content of a type.
///
/// Equality and hashing are deep over every field. Vector elements are
/// themselves canonical handles, so comparing them by identity is deep
/// comparison.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StorageKey<'a> {
    /// A builtin scalar type such as `f32`.
    Scalar(ElementKind),

    /// A dense tensor with shape, layout and ragged-sequence metadata.
    DenseTensor(DenseTensorKey<'a>),

    /// An ordered list of other types from the same context.
    Vector(&'a [TypeHandle<'a>]),
}

/// Fields of a dense tensor type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DenseTensorKey<'a> {
    pub dtype: ElementKind,
    /// Extents per axis; [`DYNAMIC`](super::DYNAMIC) marks an unknown extent.
    pub dims: &'a [i64],
    pub layout: DataLayout,
    /// Levels of detail: one offset table per nesting level.
    pub lod: &'a [&'a [usize]],
    /// Element offset into the backing buffer.
    pub offset: usize,
}

impl<'a> StorageKey<'a> {
    pub fn kind(&self) -> TypeKindTag {
        match self {
            StorageKey::Scalar(_) => TypeKindTag::Scalar,
            StorageKey::DenseTensor(_) => TypeKindTag::DenseTensor,
            StorageKey::Vector(_) => TypeKindTag::Vector,
        }
    }

    /// Rejects keys that do not describe a well-formed type.
    ///
    /// Scalars are always valid and vector elements were checked when they
    /// were interned, so only dense tensors have anything to verify.
    pub(crate) fn validate(&self) -> Result<(), TypeError> {
        match self {
            StorageKey::DenseTensor(key) => key.validate(),
            StorageKey::Scalar(_) | StorageKey::Vector(_) => Ok(()),
        }
    }

    /// Copies every borrowed slice of this key into `arena`.
    ///
    /// The returned key is structurally equal to `self` but only borrows
    /// from the arena. Fails if the arena refuses the allocation.
    pub(crate) fn copy_into<'b>(&self, arena: &'b Bump) -> Result<StorageKey<'b>, AllocErr>
    where
        'a: 'b,
    {
        Ok(match *self {
            StorageKey::Scalar(kind) => StorageKey::Scalar(kind),
            StorageKey::DenseTensor(key) => StorageKey::DenseTensor(key.copy_into(arena)?),
            StorageKey::Vector(elements) => {
                let elements: &'b [TypeHandle<'b>] = elements;
                StorageKey::Vector(arena.try_alloc_slice_copy(elements)?)
            }
        })
    }
}

impl<'a> DenseTensorKey<'a> {
    /// Every extent is non-negative or [`DYNAMIC`], and the levels of detail
    /// are consistent offset tables.
    pub(crate) fn validate(&self) -> Result<(), TypeError> {
        for (index, &value) in self.dims.iter().enumerate() {
            if value < 0 && value != DYNAMIC {
                return Err(TypeError::InvalidDim { index, value });
            }
        }
        validate_lod(self.lod, self.dims.first().copied())
    }

    fn copy_into<'b>(&self, arena: &'b Bump) -> Result<DenseTensorKey<'b>, AllocErr> {
        let dims = arena.try_alloc_slice_copy(self.dims)?;

        let mut levels: SmallVec<[&'b [usize]; 4]> = SmallVec::with_capacity(self.lod.len());
        for level in self.lod {
            levels.push(arena.try_alloc_slice_copy(*level)?);
        }
        let lod = arena.try_alloc_slice_copy(levels.as_slice())?;

        Ok(DenseTensorKey {
            dtype: self.dtype,
            dims,
            layout: self.layout,
            lod,
            offset: self.offset,
        })
    }
}

fn validate_lod(lod: &[&[usize]], height: Option<i64>) -> Result<(), TypeError> {
    let invalid = |level, reason| Err(TypeError::InvalidLod { level, reason });

    for (level, offsets) in lod.iter().enumerate() {
        if offsets.len() < 2 {
            return invalid(level, "expected at least two offsets");
        }
        if offsets[0] != 0 {
            return invalid(level, "first offset must be 0");
        }
        if offsets.windows(2).any(|pair| pair[0] > pair[1]) {
            return invalid(level, "offsets must be non-decreasing");
        }
    }

    // Each level's last offset counts the sequences of the level below it.
    for (level, pair) in lod.windows(2).enumerate() {
        let (outer, inner) = (pair[0], pair[1]);
        if outer[outer.len() - 1] != inner.len() - 1 {
            return invalid(level, "last offset must equal the sequence count of the next level");
        }
    }

    // The innermost level covers every row when the leading extent is known.
    if let (Some(innermost), Some(height)) = (lod.last(), height) {
        if height > 0 && innermost[innermost.len() - 1] as i64 != height {
            return invalid(lod.len() - 1, "last offset must equal the leading extent");
        }
    }

    Ok(())
}
