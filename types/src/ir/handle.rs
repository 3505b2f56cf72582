//! Identity handles to interned types.

use super::{StorageKey, TypeFlags, TypeKindTag, TypeStorage};
use core::fmt;
use core::hash::{Hash, Hasher};
use static_assertions::assert_eq_size;

/// Lightweight reference to a [`TypeStorage`] owned by a
/// [`TypeContext`](crate::TypeContext).
///
/// Because storages are hash-consed, two handles from the same context are
/// equal exactly when their keys are equal, so `==` and `Hash` only look at
/// the address. The `'ctx` borrow ties every handle to its context: a handle
/// cannot outlive the context that produced it.
///
/// Handles from different contexts must not be compared. Debug builds catch
/// it with an assertion; release builds simply report them unequal.
#[derive(Copy, Clone)]
pub struct TypeHandle<'ctx> {
    storage: &'ctx TypeStorage<'ctx>,
}

assert_eq_size!(TypeHandle<'static>, *const TypeStorage<'static>);

impl<'ctx> TypeHandle<'ctx> {
    pub(crate) fn new(storage: &'ctx TypeStorage<'ctx>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &'ctx TypeStorage<'ctx> {
        self.storage
    }

    pub fn key(&self) -> StorageKey<'ctx> {
        self.storage.key()
    }

    pub fn kind(&self) -> TypeKindTag {
        self.storage.kind()
    }

    pub fn flags(&self) -> TypeFlags {
        self.storage.flags()
    }

    /// Address of the underlying storage.
    pub fn as_ptr(&self) -> *const TypeStorage<'ctx> {
        self.storage
    }

    /// Returns true if this handle denotes a type of façade kind `T`.
    pub fn isa<T: TypeFacade<'ctx>>(&self) -> bool {
        T::classof(*self)
    }

    /// Views this handle as façade `T` if it has the matching kind.
    pub fn dyn_cast<T: TypeFacade<'ctx>>(&self) -> Option<T> {
        if T::classof(*self) {
            Some(T::from_handle_unchecked(*self))
        } else {
            None
        }
    }
}

impl PartialEq for TypeHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        debug_assert_eq!(
            self.storage.context(),
            other.storage.context(),
            "compared type handles from different contexts"
        );
        core::ptr::eq(self.storage, other.storage)
    }
}

impl Eq for TypeHandle<'_> {}

impl Hash for TypeHandle<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::ptr::hash(self.storage, state)
    }
}

impl fmt::Debug for TypeHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHandle({:p}, {:?})", self.storage, self.storage.key())
    }
}

pub(crate) mod sealed {
    use super::TypeHandle;

    /// Façades are only built by this crate, after a kind check.
    pub trait Sealed<'ctx> {
        /// Wraps `handle` without checking its kind.
        ///
        /// Accessors on the result panic if the kinds do not match.
        fn from_handle_unchecked(handle: TypeHandle<'ctx>) -> Self;
    }
}

/// A typed view over a [`TypeHandle`] of one particular kind.
///
/// Façades are `Copy` newtypes; equality goes through the wrapped handle.
/// The trait is sealed: [`TypeHandle::dyn_cast`] is the way to turn a
/// handle into a façade.
///
/// ```compile_fail
/// use carve_types::{ElementKind, ScalarType, TypeContext, TypeFacade};
///
/// let ctx = TypeContext::new();
/// let handle = ScalarType::get(&ctx, ElementKind::Bool).unwrap().handle();
/// let _ = ScalarType::from_handle_unchecked(handle);
/// ```
pub trait TypeFacade<'ctx>: sealed::Sealed<'ctx> + Copy + Eq + fmt::Debug {
    /// Kind of key this façade wraps.
    const KIND: TypeKindTag;

    /// Returns true if `handle` can be viewed as this façade.
    fn classof(handle: TypeHandle<'ctx>) -> bool {
        handle.kind() == Self::KIND
    }

    fn handle(&self) -> TypeHandle<'ctx>;
}
