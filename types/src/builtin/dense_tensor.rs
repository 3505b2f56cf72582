//! Dense tensor types.
//!
//! A dense tensor type records the element kind, the shape (where
//! [`DYNAMIC`](crate::DYNAMIC) marks extents unknown until runtime), the data layout, the
//! levels of detail describing ragged sequences, and an element offset into
//! the backing buffer.
//!
//! Levels of detail are offset tables, outermost level first. For example
//! `[[0, 2, 3], [0, 2, 5, 6]]` describes two outer sequences holding 2 and 1
//! inner sequences, whose inner sequences hold 2, 3 and 1 rows.

use crate::context::TypeContext;
use crate::error::Result;
use crate::ir::handle::sealed::Sealed;
use crate::ir::{
    DataLayout, DenseTensorKey, ElementKind, StorageKey, TypeFacade, TypeFlags, TypeHandle,
    TypeKindTag,
};
use core::fmt;
use smallvec::SmallVec;

/// Levels of detail of a tensor that is not ragged.
pub const NO_LOD: &[&[usize]] = &[];

/// Façade over an interned dense tensor type.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct DenseTensorType<'ctx> {
    handle: TypeHandle<'ctx>,
}

impl<'ctx> DenseTensorType<'ctx> {
    /// Validates the fields and returns the canonical tensor type for them.
    ///
    /// # Example
    ///
    /// ```
    /// use carve_types::{DataLayout, DenseTensorType, ElementKind, TypeContext, NO_LOD, DYNAMIC};
    ///
    /// let ctx = TypeContext::new();
    /// let ty = DenseTensorType::get(&ctx, ElementKind::Float32, &[4, DYNAMIC, 8], DataLayout::RowMajor, NO_LOD, 0)?;
    /// assert_eq!(ty.dim(), &[4, DYNAMIC, 8]);
    /// assert!(ty.is_dynamic());
    /// # Ok::<(), carve_types::TypeError>(())
    /// ```
    pub fn get<L: AsRef<[usize]>>(
        ctx: &'ctx TypeContext,
        dtype: ElementKind,
        dims: &[i64],
        layout: DataLayout,
        lod: &[L],
        offset: usize,
    ) -> Result<Self> {
        let levels: SmallVec<[&[usize]; 4]> = lod.iter().map(AsRef::as_ref).collect();
        Self::from_key(
            ctx,
            DenseTensorKey {
                dtype,
                dims,
                layout,
                lod: &levels,
                offset,
            },
        )
    }

    /// Interns an already assembled key. The key is validated like any
    /// other interned key.
    pub fn from_key(ctx: &'ctx TypeContext, key: DenseTensorKey<'_>) -> Result<Self> {
        Ok(Self {
            handle: ctx.intern(StorageKey::DenseTensor(key))?,
        })
    }

    fn key(&self) -> DenseTensorKey<'ctx> {
        match self.handle.key() {
            StorageKey::DenseTensor(key) => key,
            other => unreachable!("DenseTensorType wraps a {:?} key", other.kind()),
        }
    }

    pub fn dtype(&self) -> ElementKind {
        self.key().dtype
    }

    pub fn dim(&self) -> &'ctx [i64] {
        self.key().dims
    }

    pub fn data_layout(&self) -> DataLayout {
        self.key().layout
    }

    pub fn lod(&self) -> &'ctx [&'ctx [usize]] {
        self.key().lod
    }

    pub fn offset(&self) -> usize {
        self.key().offset
    }

    pub fn rank(&self) -> usize {
        self.dim().len()
    }

    /// Returns true if any extent is [`DYNAMIC`](crate::DYNAMIC).
    pub fn is_dynamic(&self) -> bool {
        self.handle.flags().contains(TypeFlags::HAS_DYNAMIC_DIM)
    }

    pub fn has_lod(&self) -> bool {
        self.handle.flags().contains(TypeFlags::HAS_LOD)
    }

    /// Total number of elements, or `None` if the shape is dynamic or the
    /// count overflows.
    pub fn num_elements(&self) -> Option<i64> {
        if self.is_dynamic() {
            return None;
        }
        self.dim()
            .iter()
            .try_fold(1i64, |acc, &extent| acc.checked_mul(extent))
    }
}

impl<'ctx> Sealed<'ctx> for DenseTensorType<'ctx> {
    fn from_handle_unchecked(handle: TypeHandle<'ctx>) -> Self {
        Self { handle }
    }
}

impl<'ctx> TypeFacade<'ctx> for DenseTensorType<'ctx> {
    const KIND: TypeKindTag = TypeKindTag::DenseTensor;

    fn handle(&self) -> TypeHandle<'ctx> {
        self.handle
    }
}

impl<'ctx> From<DenseTensorType<'ctx>> for TypeHandle<'ctx> {
    fn from(ty: DenseTensorType<'ctx>) -> Self {
        ty.handle
    }
}

impl fmt::Debug for DenseTensorType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.key();
        f.debug_struct("DenseTensorType")
            .field("dtype", &key.dtype)
            .field("dims", &key.dims)
            .field("layout", &key.layout)
            .field("lod", &key.lod)
            .field("offset", &key.offset)
            .finish()
    }
}
