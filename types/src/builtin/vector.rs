use crate::context::TypeContext;
use crate::error::Result;
use crate::ir::handle::sealed::Sealed;
use crate::ir::{StorageKey, TypeFacade, TypeHandle, TypeKindTag};
use core::fmt;
use core::iter::Copied;
use core::slice;

/// An ordered list of types, e.g. the result types of a multi-result op.
///
/// Elements are canonical handles, so two vector types are equal exactly
/// when their elements are pairwise identical.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct VectorType<'ctx> {
    handle: TypeHandle<'ctx>,
}

impl<'ctx> VectorType<'ctx> {
    /// Elements from another context are adopted into `ctx`.
    pub fn get(ctx: &'ctx TypeContext, elements: &[TypeHandle<'_>]) -> Result<Self> {
        Ok(Self {
            handle: ctx.intern(StorageKey::Vector(elements))?,
        })
    }

    pub fn data(&self) -> &'ctx [TypeHandle<'ctx>] {
        match self.handle.key() {
            StorageKey::Vector(elements) => elements,
            other => unreachable!("VectorType wraps a {:?} key", other.kind()),
        }
    }

    pub fn len(&self) -> usize {
        self.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    pub fn at(&self, index: usize) -> Option<TypeHandle<'ctx>> {
        self.data().get(index).copied()
    }

    pub fn iter(&self) -> Copied<slice::Iter<'ctx, TypeHandle<'ctx>>> {
        self.data().iter().copied()
    }
}

impl<'ctx> Sealed<'ctx> for VectorType<'ctx> {
    fn from_handle_unchecked(handle: TypeHandle<'ctx>) -> Self {
        Self { handle }
    }
}

impl<'ctx> TypeFacade<'ctx> for VectorType<'ctx> {
    const KIND: TypeKindTag = TypeKindTag::Vector;

    fn handle(&self) -> TypeHandle<'ctx> {
        self.handle
    }
}

impl<'ctx> From<VectorType<'ctx>> for TypeHandle<'ctx> {
    fn from(ty: VectorType<'ctx>) -> Self {
        ty.handle
    }
}

impl fmt::Debug for VectorType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
