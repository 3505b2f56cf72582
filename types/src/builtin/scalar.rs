use crate::context::TypeContext;
use crate::error::Result;
use crate::ir::handle::sealed::Sealed;
use crate::ir::{ElementKind, StorageKey, TypeFacade, TypeHandle, TypeKindTag};
use core::fmt;

/// A builtin scalar type such as `f32` or `bool`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScalarType<'ctx> {
    handle: TypeHandle<'ctx>,
}

impl<'ctx> ScalarType<'ctx> {
    pub fn get(ctx: &'ctx TypeContext, kind: ElementKind) -> Result<Self> {
        Ok(Self {
            handle: ctx.intern(StorageKey::Scalar(kind))?,
        })
    }

    pub fn kind(&self) -> ElementKind {
        match self.handle.key() {
            StorageKey::Scalar(kind) => kind,
            other => unreachable!("ScalarType wraps a {:?} key", other.kind()),
        }
    }
}

impl<'ctx> Sealed<'ctx> for ScalarType<'ctx> {
    fn from_handle_unchecked(handle: TypeHandle<'ctx>) -> Self {
        Self { handle }
    }
}

impl<'ctx> TypeFacade<'ctx> for ScalarType<'ctx> {
    const KIND: TypeKindTag = TypeKindTag::Scalar;

    fn handle(&self) -> TypeHandle<'ctx> {
        self.handle
    }
}

impl<'ctx> From<ScalarType<'ctx>> for TypeHandle<'ctx> {
    fn from(ty: ScalarType<'ctx>) -> Self {
        ty.handle
    }
}

impl fmt::Debug for ScalarType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScalarType({})", self.kind())
    }
}
